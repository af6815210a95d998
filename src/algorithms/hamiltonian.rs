//! Pauli-sum Hamiltonians and their expectation values.

use crate::core::errors::{AlgorithmError, PauliError};
use crate::core::utils::trace;
use crate::{Pauli, PauliWord, QuantumState};
use ndarray::{Array1, Array2};
use num_complex::Complex64;

/// A real linear combination of Pauli words on a fixed number of qubits.
#[derive(Clone, Debug)]
pub struct Hamiltonian {
    terms: Vec<(f64, PauliWord)>,
    num_qubits: usize,
}

impl Hamiltonian {
    pub fn new(num_qubits: usize) -> Self {
        Self {
            terms: Vec::new(),
            num_qubits,
        }
    }

    /// Adds `coefficient * word`; the word must span every qubit.
    pub fn add_term(&mut self, coefficient: f64, word: PauliWord) -> Result<(), PauliError> {
        if word.num_qubits() != self.num_qubits {
            return Err(PauliError::LengthMismatch {
                word: word.num_qubits(),
                state: self.num_qubits,
            });
        }
        self.terms.push((coefficient, word));
        Ok(())
    }

    pub fn terms(&self) -> &[(f64, PauliWord)] {
        &self.terms
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Dense matrix $\sum_k c_k P_k$.
    pub fn matrix(&self) -> Array2<Complex64> {
        let dim = 1 << self.num_qubits;
        self.terms
            .iter()
            .fold(Array2::<Complex64>::zeros((dim, dim)), |acc, (coefficient, word)| {
                acc + word.matrix().mapv(|v| v * *coefficient)
            })
    }

    /// $\langle\psi|H|\psi\rangle$ term by term, without the dense matrix.
    pub fn expectation(&self, state: &Array1<Complex64>) -> Result<f64, PauliError> {
        self.terms
            .iter()
            .map(|(coefficient, word)| Ok::<_, PauliError>(coefficient * word.expectation(state)?))
            .sum()
    }

    /// $\mathrm{tr}(\rho H)$ for a density matrix.
    pub fn expectation_mixed(&self, state: &QuantumState) -> Result<f64, PauliError> {
        if state.num_qubits != self.num_qubits {
            return Err(PauliError::LengthMismatch {
                word: self.num_qubits,
                state: state.num_qubits,
            });
        }
        Ok(trace(&state.density_matrix.dot(&self.matrix())).re)
    }
}

/// $H = \frac{1}{3}\sum_{i<j} X_i X_j - \sum_k Z_k$ on `num_wires` qubits.
pub fn pair_hamiltonian(num_wires: usize) -> Result<Hamiltonian, PauliError> {
    let mut hamiltonian = Hamiltonian::new(num_wires);

    for j in 0..num_wires {
        for i in 0..j {
            hamiltonian.add_term(1.0 / 3.0, PauliWord::on_wires(num_wires, Pauli::X, &[i, j])?)?;
        }
    }
    for k in 0..num_wires {
        hamiltonian.add_term(-1.0, PauliWord::on_wires(num_wires, Pauli::Z, &[k])?)?;
    }

    Ok(hamiltonian)
}

/// $|+\rangle^{\otimes n}$ as a state vector.
pub fn plus_state(num_wires: usize) -> Array1<Complex64> {
    let dim = 1usize << num_wires;
    Array1::from_elem(dim, Complex64::new(1.0 / (dim as f64).sqrt(), 0.0))
}

/// Expectation of [`pair_hamiltonian`] after a Hadamard on every wire of |0…0>.
pub fn expectation_value(num_wires: usize) -> Result<f64, AlgorithmError> {
    let hamiltonian = pair_hamiltonian(num_wires)?;
    let value = hamiltonian.expectation(&plus_state(num_wires))?;

    log::debug!(
        "<H> over {} wires ({} terms): {}",
        num_wires,
        hamiltonian.terms().len(),
        value
    );
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Gate;
    use approx::assert_relative_eq;

    #[test]
    fn pair_hamiltonian_has_all_terms() {
        let h = pair_hamiltonian(4).unwrap();
        assert_eq!(h.terms().len(), 6 + 4);
        assert_eq!(h.terms()[0].1.to_string(), "XXII");
        assert_eq!(h.terms()[9].1.to_string(), "IIIZ");
    }

    #[test]
    fn only_xx_pairs_contribute_on_plus_states() {
        // Each <X_i X_j> is 1 and each <Z_k> vanishes
        for n in 1..=5 {
            let pairs = (n * (n - 1) / 2) as f64;
            assert_relative_eq!(expectation_value(n).unwrap(), pairs / 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn density_matrix_path_agrees() {
        let h = pair_hamiltonian(3).unwrap();
        let mut rho = QuantumState::new(3);
        for w in 0..3 {
            rho.apply(&Gate::h(), &[w]).unwrap();
        }
        assert_relative_eq!(
            h.expectation_mixed(&rho).unwrap(),
            expectation_value(3).unwrap(),
            epsilon = 1e-12
        );

        // |000> only sees the field term
        assert_relative_eq!(
            h.expectation_mixed(&QuantumState::new(3)).unwrap(),
            -3.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn rejects_words_of_wrong_width() {
        let mut h = Hamiltonian::new(2);
        let err = h.add_term(1.0, "XYZ".parse().unwrap());
        assert_eq!(err, Err(PauliError::LengthMismatch { word: 3, state: 2 }));
    }
}
