use crate::core::channels::QuantumChannel;
use crate::core::errors::{ChannelError, GateError, MeasurementError, StateError};
use crate::core::gates::Gate;
use crate::core::measurements::Measurement;
use crate::core::utils::{self, dagger, extract_bits, find_duplicate, trace};
use ndarray::{Array1, Array2};
use num_complex::Complex64;

/// Density matrix of an `num_qubits`-qubit register. Wire 0 is the leftmost tensor factor.
#[derive(Clone, Debug)]
pub struct QuantumState {
    pub density_matrix: Array2<Complex64>,
    pub num_qubits: usize,
}

impl QuantumState {
    /// Creates a new quantum state initialized to |0...0>.
    pub fn new(num_qubits: usize) -> Self {
        let dim = 1 << num_qubits;
        let mut density_matrix = Array2::<Complex64>::zeros((dim, dim));
        density_matrix[[0, 0]] = Complex64::new(1.0, 0.0);

        Self {
            density_matrix,
            num_qubits,
        }
    }

    /// The maximally mixed state I / 2^n.
    pub fn maximally_mixed(num_qubits: usize) -> Self {
        let dim = 1 << num_qubits;
        let weight = Complex64::new(1.0 / dim as f64, 0.0);

        Self {
            density_matrix: Array2::<Complex64>::eye(dim).mapv(|v| v * weight),
            num_qubits,
        }
    }

    /// Validates that the input vector is a valid quantum state.
    fn check_vector_state(vector: &Array1<Complex64>) -> Result<(), StateError> {
        if !vector.len().is_power_of_two() {
            return Err(StateError::InvalidDimensions);
        }

        let norm_sqr: f64 = vector.iter().map(|c| c.norm_sqr()).sum();

        if (norm_sqr - 1.0).abs() > 1e-9 {
            return Err(StateError::NotNormalized(norm_sqr));
        }

        Ok(())
    }

    /// Checks the validity of a density matrix
    fn check_density_matrix(matrix: &Array2<Complex64>) -> Result<(), StateError> {
        let (rows, cols) = matrix.dim();

        if rows != cols {
            return Err(StateError::DimensionMismatch {
                expected: rows,
                got_rows: rows,
                got_cols: cols,
            });
        }
        if !rows.is_power_of_two() {
            return Err(StateError::InvalidDimensions);
        }

        let tr = trace(matrix);
        if (tr - Complex64::new(1.0, 0.0)).norm() > 1e-9 {
            return Err(StateError::InvalidTrace(tr));
        }

        Ok(())
    }

    /// Checks if a given wire is within the register's range
    fn validate_qubit_index(&self, index: usize) -> Result<(), StateError> {
        if index >= self.num_qubits {
            return Err(StateError::IndexOutOfBounds {
                index,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    /// Creates a QuantumState from a pure state vector.
    pub fn from_state_vector(vector: Array1<Complex64>) -> Result<Self, StateError> {
        Self::check_vector_state(&vector)?;

        let num_qubits = vector.len().trailing_zeros() as usize;

        // rho = |psi><psi|
        Ok(Self {
            density_matrix: utils::outer_product(&vector, &vector),
            num_qubits,
        })
    }

    /// Creates a QuantumState from a generic density matrix.
    pub fn from_density_matrix(matrix: Array2<Complex64>) -> Result<Self, StateError> {
        Self::check_density_matrix(&matrix)?;
        let num_qubits = matrix.nrows().trailing_zeros() as usize;

        Ok(Self {
            density_matrix: matrix,
            num_qubits,
        })
    }

    /// Checks if a QuantumState is valid.
    pub fn is_valid(&self) -> Result<(), StateError> {
        Self::check_density_matrix(&self.density_matrix)
    }

    pub fn trace(&self) -> f64 {
        trace(&self.density_matrix).re
    }

    /// Purity tr(ρ²); 1 for pure states, 1/2^n for the maximally mixed state.
    pub fn purity(&self) -> f64 {
        // tr(ρ²) = Σ_ij ρ_ij ρ_ji = Σ_ij |ρ_ij|² for Hermitian ρ
        self.density_matrix.iter().map(|c| c.norm_sqr()).sum()
    }

    /// Tensor product `self ⊗ other`, with `self` on the leading wires.
    pub fn tensor(&self, other: &QuantumState) -> QuantumState {
        QuantumState {
            density_matrix: utils::kronecker_product(&self.density_matrix, &other.density_matrix),
            num_qubits: self.num_qubits + other.num_qubits,
        }
    }

    /// Conjugates the whole register by an already expanded operator: ρ -> OρO†.
    ///
    /// No unitarity check is made, so this also applies the non-unitary
    /// single-qubit maps produced by timbit gates.
    pub fn apply_operator(&mut self, op: &Array2<Complex64>) -> Result<(), StateError> {
        let (rows, cols) = op.dim();
        let dim = 1 << self.num_qubits;

        if rows != dim || cols != dim {
            return Err(StateError::DimensionMismatch {
                expected: dim,
                got_rows: rows,
                got_cols: cols,
            });
        }

        self.density_matrix = op.dot(&self.density_matrix).dot(&dagger(op));

        Ok(())
    }

    /// Applies non controlled quantum gate
    pub fn apply(&mut self, gate: &Gate, target_qubits: &[usize]) -> Result<(), StateError> {
        self.apply_controlled(gate, target_qubits, None)
    }

    /// Applies generic quantum gate
    pub fn apply_controlled(
        &mut self,
        gate: &Gate,
        target_qubits: &[usize],
        control_qubits: Option<&[usize]>,
    ) -> Result<(), StateError> {
        if gate.num_qubits != target_qubits.len() {
            return Err(StateError::DimensionMismatch {
                expected: gate.num_qubits,
                got_rows: target_qubits.len(),
                got_cols: 0,
            });
        }

        for &q in target_qubits {
            self.validate_qubit_index(q)?;
        }

        match control_qubits {
            Some(controls) if !controls.is_empty() => {
                for &q in controls {
                    self.validate_qubit_index(q)?;
                }
                let full = Gate::expand_gate(self.num_qubits, gate, target_qubits, controls)?;
                self.apply_operator(&full.matrix)
            }
            _ => {
                if let Some(dup) = find_duplicate(target_qubits) {
                    return Err(StateError::GateError(GateError::DuplicateQubit(dup)));
                }
                self.conjugate_local(&gate.matrix, &gate.matrix, target_qubits);
                Ok(())
            }
        }
    }

    /// Computational-basis probabilities of `wires`, first wire most significant.
    pub fn probabilities(&self, wires: &[usize]) -> Result<Vec<f64>, StateError> {
        let reduced = self.partial_trace(wires)?;
        Ok(reduced
            .density_matrix
            .diag()
            .iter()
            .map(|p| p.re.max(0.0))
            .collect())
    }

    /// Reduced state on the kept wires, in the order given.
    pub fn partial_trace(&self, keep: &[usize]) -> Result<QuantumState, StateError> {
        for &q in keep {
            self.validate_qubit_index(q)?;
        }
        if let Some(dup) = find_duplicate(keep) {
            return Err(StateError::MeasurementError(
                MeasurementError::DuplicateQubit(dup),
            ));
        }

        let n = self.num_qubits;
        let traced: Vec<usize> = (0..n).filter(|w| !keep.contains(w)).collect();
        let reduced_dim = 1 << keep.len();
        let mut reduced = Array2::<Complex64>::zeros((reduced_dim, reduced_dim));

        // Sum over equal assignments of the traced wires
        for env in 0..(1usize << traced.len()) {
            let env_bits = utils::deposit_bits(n, env, &traced);
            for r in 0..reduced_dim {
                let row = env_bits | utils::deposit_bits(n, r, keep);
                for c in 0..reduced_dim {
                    let col = env_bits | utils::deposit_bits(n, c, keep);
                    reduced[[r, c]] += self.density_matrix[[row, col]];
                }
            }
        }

        Ok(QuantumState {
            density_matrix: reduced,
            num_qubits: keep.len(),
        })
    }

    /// Returns the probability of each operator expanded to the whole system
    pub fn set_measurement(
        &self,
        measurement: &Measurement,
        target_qubits: &[usize],
    ) -> Result<(Vec<f64>, Vec<Array2<Complex64>>), StateError> {
        for &q in target_qubits {
            self.validate_qubit_index(q)?;
        }

        if let Some(dup) = find_duplicate(target_qubits) {
            return Err(StateError::MeasurementError(
                MeasurementError::DuplicateQubit(dup),
            ));
        }

        let expanded_ops = measurement.get_expanded_operators(self.num_qubits, target_qubits)?;

        let mut probs: Vec<f64> = expanded_ops
            .iter()
            .map(|op| {
                let unnormalized = op.dot(&self.density_matrix).dot(&dagger(op));
                trace(&unnormalized).re.max(0.0)
            })
            .collect();

        // Renormalize against rounding so the outcomes stay a distribution
        let sum_probs: f64 = probs.iter().sum();
        for p in &mut probs {
            *p /= sum_probs;
        }

        Ok((probs, expanded_ops))
    }

    /// Apply QuantumChannel to QuantumState
    pub fn apply_channel(
        &mut self,
        channel: &QuantumChannel,
        target_qubits: &[usize],
    ) -> Result<(), StateError> {
        if let Some(dup) = find_duplicate(target_qubits) {
            return Err(StateError::ChannelError(ChannelError::DuplicateQubit(dup)));
        }
        if target_qubits.len() != channel.num_qubits {
            return Err(StateError::ChannelError(ChannelError::InvalidDimensions));
        }
        for &q in target_qubits {
            self.validate_qubit_index(q)?;
        }

        let original = self.density_matrix.clone();
        let dim = original.nrows();
        let mut new_rho = Array2::<Complex64>::zeros((dim, dim));

        // Σ_k K ρ K†, each term applied locally on the targets
        for k in &channel.kraus_ops {
            self.density_matrix = original.clone();
            self.conjugate_local(k, k, target_qubits);
            new_rho += &self.density_matrix;
        }

        self.density_matrix = new_rho;

        Ok(())
    }

    /// ρ -> L ρ R† with `left` and `right` acting on `targets` only.
    ///
    /// Costs O(4^n · 2^k) instead of the O(8^n) of expanding to the full register.
    fn conjugate_local(
        &mut self,
        left: &Array2<Complex64>,
        right: &Array2<Complex64>,
        targets: &[usize],
    ) {
        let n = self.num_qubits;
        let dim = self.density_matrix.nrows();
        let local_dim = left.nrows();
        let target_mask = targets
            .iter()
            .fold(0usize, |mask, &t| mask | utils::wire_bit(n, t));

        let mut rows = Array2::<Complex64>::zeros((dim, dim));
        for r in 0..dim {
            let base = r & !target_mask;
            let local_r = extract_bits(n, r, targets);
            for k in 0..local_dim {
                let coeff = left[[local_r, k]];
                if coeff.norm_sqr() == 0.0 {
                    continue;
                }
                let src = base | utils::deposit_bits(n, k, targets);
                for c in 0..dim {
                    rows[[r, c]] += coeff * self.density_matrix[[src, c]];
                }
            }
        }

        let mut result = Array2::<Complex64>::zeros((dim, dim));
        for c in 0..dim {
            let base = c & !target_mask;
            let local_c = extract_bits(n, c, targets);
            for k in 0..local_dim {
                let coeff = right[[local_c, k]].conj();
                if coeff.norm_sqr() == 0.0 {
                    continue;
                }
                let src = base | utils::deposit_bits(n, k, targets);
                for r in 0..dim {
                    result[[r, c]] += rows[[r, src]] * coeff;
                }
            }
        }

        self.density_matrix = result;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn bell() -> QuantumState {
        let amp = Complex64::new(1.0 / 2.0_f64.sqrt(), 0.0);
        let zero = Complex64::new(0.0, 0.0);
        QuantumState::from_state_vector(array![amp, zero, zero, amp]).unwrap()
    }

    #[test]
    fn hadamard_then_cnot_builds_bell_state() {
        let mut state = QuantumState::new(2);
        state.apply(&Gate::h(), &[0]).unwrap();
        state.apply(&Gate::x(), &[1]).unwrap();
        state.apply(&Gate::x(), &[1]).unwrap();
        state.apply(&Gate::cnot(), &[0, 1]).unwrap();

        assert!(utils::max_abs_diff(&state.density_matrix, &bell().density_matrix) < 1e-12);
    }

    #[test]
    fn local_application_matches_expanded_gate() {
        let mut local = bell();
        local.apply(&Gate::y(), &[1]).unwrap();
        let h_s = Gate::h().tensor(&Gate::s());
        local.apply(&h_s, &[1, 0]).unwrap();

        let mut expanded = bell();
        let y = Gate::expand_gate(2, &Gate::y(), &[1], &[]).unwrap();
        expanded.apply_operator(&y.matrix).unwrap();
        let h_s = Gate::expand_gate(2, &h_s, &[1, 0], &[]).unwrap();
        expanded.apply_operator(&h_s.matrix).unwrap();

        assert!(utils::max_abs_diff(&local.density_matrix, &expanded.density_matrix) < 1e-12);
    }

    #[test]
    fn partial_trace_of_bell_state_is_maximally_mixed() {
        let reduced = bell().partial_trace(&[1]).unwrap();
        assert_eq!(reduced.num_qubits, 1);
        assert_relative_eq!(reduced.purity(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(reduced.trace(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn partial_trace_keeps_requested_order() {
        let mut state = QuantumState::new(3);
        state.apply(&Gate::x(), &[2]).unwrap();

        // |001> read as (wire 2, wire 0) is |10>
        let probs = state.probabilities(&[2, 0]).unwrap();
        assert_eq!(probs, vec![0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn channel_preserves_trace() {
        let mut state = bell();
        let channel = QuantumChannel::depolarizing(0.4).unwrap();
        state.apply_channel(&channel, &[0]).unwrap();
        state.apply_channel(&channel, &[1]).unwrap();

        assert_relative_eq!(state.trace(), 1.0, epsilon = 1e-12);
        assert!(state.is_valid().is_ok());
    }

    #[test]
    fn measurement_probabilities_of_plus_state() {
        let mut state = QuantumState::new(1);
        state.apply(&Gate::h(), &[0]).unwrap();

        let (probs, _) = state.set_measurement(&Measurement::z_basis(), &[0]).unwrap();
        assert_relative_eq!(probs[0], 0.5, epsilon = 1e-12);

        let (probs, _) = state.set_measurement(&Measurement::x_basis(), &[0]).unwrap();
        assert_relative_eq!(probs[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_out_of_range_wire() {
        let mut state = QuantumState::new(1);
        assert!(matches!(
            state.apply(&Gate::x(), &[1]),
            Err(StateError::IndexOutOfBounds { index: 1, num_qubits: 1 })
        ));
    }

    #[test]
    fn rejects_unnormalized_vector() {
        let v = array![Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0)];
        assert!(matches!(
            QuantumState::from_state_vector(v),
            Err(StateError::NotNormalized(_))
        ));
    }
}
