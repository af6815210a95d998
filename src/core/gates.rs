use crate::core::errors::GateError;
use crate::core::utils;
use ndarray::{Array2, arr2};
use num_complex::Complex64;

/// Represents a quantum gate.
///
/// A gate is defined by its unitary matrix and the number of qubits it acts on.
#[derive(Clone, Debug)]
pub struct Gate {
    /// The unitary matrix of the gate.
    pub matrix: Array2<Complex64>,
    /// The number of qubits the gate acts on.
    pub num_qubits: usize,
}

impl Gate {
    /// Creates a new `Gate` from a unitary matrix.
    ///
    /// # Arguments
    ///
    /// * `matrix` - A square, unitary `Array2<Complex64>`.
    ///
    /// # Errors
    ///
    /// Returns a `GateError` if:
    /// - The matrix is not square.
    /// - The matrix dimensions are not a power of 2.
    /// - The matrix is not unitary.
    pub fn new(matrix: Array2<Complex64>) -> Result<Self, GateError> {
        let (rows, cols) = matrix.dim();

        if rows != cols {
            return Err(GateError::NotSquareMatrix);
        }

        if !rows.is_power_of_two() {
            return Err(GateError::InvalidDimensions);
        }

        if !Self::check_unitary(&matrix) {
            return Err(GateError::NonUnitary);
        }

        let num_qubits = rows.trailing_zeros() as usize;

        Ok(Self { matrix, num_qubits })
    }

    /// Builds a gate from a real-valued matrix literal, as challenge inputs are usually given.
    pub fn from_real(rows: &[Vec<f64>]) -> Result<Self, GateError> {
        let n = rows.len();
        if rows.iter().any(|r| r.len() != n) {
            return Err(GateError::NotSquareMatrix);
        }
        Self::new(Array2::from_shape_fn((n, n), |(r, c)| {
            Complex64::new(rows[r][c], 0.0)
        }))
    }

    /// Checks if a given matrix is unitary
    fn check_unitary(matrix: &Array2<Complex64>) -> bool {
        let (rows, _) = matrix.dim();
        let eye = Array2::<Complex64>::eye(rows);

        let product = matrix.dot(&utils::dagger(matrix));

        product
            .iter()
            .zip(eye.iter())
            .all(|(a, b)| (*a - *b).norm() < 1e-6)
    }

    /// Expands a gate to act on a larger system of qubits.
    ///
    /// This function creates a new gate that acts on `num_total_qubits` by applying the original `gate`
    /// to the specified `targets` and `controls` (if any), and Identity on the rest.
    ///
    /// # Errors
    ///
    /// Returns `GateError` if:
    /// - A wire index does not exist in the larger system.
    /// - Duplicate indices are found in `targets` or `controls`.
    /// - A wire is used as both control and target.
    pub fn expand_gate(
        num_total_qubits: usize,
        gate: &Gate,
        targets: &[usize],
        controls: &[usize],
    ) -> Result<Gate, GateError> {
        if targets.len() != gate.num_qubits {
            return Err(GateError::InvalidDimensions);
        }

        if let Some(&index) = targets
            .iter()
            .chain(controls)
            .find(|&&w| w >= num_total_qubits)
        {
            return Err(GateError::IndexOutOfBounds {
                index,
                num_qubits: num_total_qubits,
            });
        }

        if let Some(dup) = utils::find_duplicate(targets) {
            return Err(GateError::DuplicateQubit(dup));
        }

        if let Some(dup) = utils::find_duplicate(controls) {
            return Err(GateError::DuplicateQubit(dup));
        }

        for &c in controls {
            if targets.contains(&c) {
                return Err(GateError::ControlTargetOverlap(c));
            }
        }

        Ok(Gate {
            matrix: utils::expand_operator(num_total_qubits, &gate.matrix, targets, controls),
            num_qubits: num_total_qubits,
        })
    }

    /// Tensor product `self ⊗ other`, with `self` on the leading wires.
    pub fn tensor(&self, other: &Gate) -> Gate {
        Gate {
            matrix: utils::kronecker_product(&self.matrix, &other.matrix),
            num_qubits: self.num_qubits + other.num_qubits,
        }
    }

    /// Gate equivalent to applying `self` and then `next`.
    pub fn then(&self, next: &Gate) -> Result<Gate, GateError> {
        if self.num_qubits != next.num_qubits {
            return Err(GateError::InvalidDimensions);
        }
        Ok(Gate {
            matrix: next.matrix.dot(&self.matrix),
            num_qubits: self.num_qubits,
        })
    }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> Gate {
        Gate {
            matrix: utils::dagger(&self.matrix),
            num_qubits: self.num_qubits,
        }
    }

    /// Plain transpose; the transpose of a unitary is unitary.
    pub fn transpose(&self) -> Gate {
        Gate {
            matrix: self.matrix.t().to_owned(),
            num_qubits: self.num_qubits,
        }
    }

    // --- Standard Gates ---

    /// Creates an Identity gate.
    pub fn i() -> Gate {
        Gate::new(arr2(&[
            [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
            [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
        ]))
        .unwrap()
    }

    /// Creates a Pauli-X gate (NOT gate).
    pub fn x() -> Gate {
        Gate::new(arr2(&[
            [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
            [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
        ]))
        .unwrap()
    }

    /// Creates a Pauli-Y gate.
    pub fn y() -> Gate {
        Gate::new(arr2(&[
            [Complex64::new(0.0, 0.0), Complex64::new(0.0, -1.0)],
            [Complex64::new(0.0, 1.0), Complex64::new(0.0, 0.0)],
        ]))
        .unwrap()
    }

    /// Creates a Pauli-Z gate.
    pub fn z() -> Gate {
        Gate::new(arr2(&[
            [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
            [Complex64::new(0.0, 0.0), Complex64::new(-1.0, 0.0)],
        ]))
        .unwrap()
    }

    /// Creates a Hadamard gate.
    pub fn h() -> Gate {
        let factor = 1.0 / 2.0_f64.sqrt();
        Gate::new(arr2(&[
            [Complex64::new(factor, 0.0), Complex64::new(factor, 0.0)],
            [Complex64::new(factor, 0.0), Complex64::new(-factor, 0.0)],
        ]))
        .unwrap()
    }

    /// Creates an S gate (Phase gate, Z^1/2).
    pub fn s() -> Gate {
        Gate::new(arr2(&[
            [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
            [Complex64::new(0.0, 0.0), Complex64::new(0.0, 1.0)],
        ]))
        .unwrap()
    }

    /// X rotation, RX(θ) = exp(-iθX/2).
    pub fn rx(theta: f64) -> Gate {
        let (s, c) = (theta / 2.0).sin_cos();
        Gate::new(arr2(&[
            [Complex64::new(c, 0.0), Complex64::new(0.0, -s)],
            [Complex64::new(0.0, -s), Complex64::new(c, 0.0)],
        ]))
        .unwrap()
    }

    /// Creates a CNOT (Controlled-NOT) gate, control on wire 0.
    pub fn cnot() -> Gate {
        Gate::expand_gate(2, &Gate::x(), &[1], &[0]).unwrap()
    }
}
