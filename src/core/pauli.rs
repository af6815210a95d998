//! Pauli words: tensor products of single-qubit Pauli operators.

use crate::core::Gate;
use crate::core::errors::PauliError;
use crate::core::utils;
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

impl Pauli {
    pub fn gate(self) -> Gate {
        match self {
            Pauli::I => Gate::i(),
            Pauli::X => Gate::x(),
            Pauli::Y => Gate::y(),
            Pauli::Z => Gate::z(),
        }
    }

    /// Image of the basis state `bit` as (phase, flipped bit).
    fn act(self, bit: bool) -> (Complex64, bool) {
        match (self, bit) {
            (Pauli::I, b) => (Complex64::new(1.0, 0.0), b),
            (Pauli::X, b) => (Complex64::new(1.0, 0.0), !b),
            (Pauli::Y, false) => (Complex64::new(0.0, 1.0), true),
            (Pauli::Y, true) => (Complex64::new(0.0, -1.0), false),
            (Pauli::Z, false) => (Complex64::new(1.0, 0.0), false),
            (Pauli::Z, true) => (Complex64::new(-1.0, 0.0), true),
        }
    }

    fn letter(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }
}

/// A string over {I, X, Y, Z}, one letter per wire, wire 0 first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PauliWord {
    letters: Vec<Pauli>,
}

impl PauliWord {
    pub fn new(letters: Vec<Pauli>) -> Result<Self, PauliError> {
        if letters.is_empty() {
            return Err(PauliError::Empty);
        }
        Ok(Self { letters })
    }

    /// Word with `pauli` on the given wires and identity elsewhere.
    pub fn on_wires(num_qubits: usize, pauli: Pauli, wires: &[usize]) -> Result<Self, PauliError> {
        let mut letters = vec![Pauli::I; num_qubits];
        for &w in wires {
            let Some(slot) = letters.get_mut(w) else {
                return Err(PauliError::LengthMismatch {
                    word: w + 1,
                    state: num_qubits,
                });
            };
            *slot = pauli;
        }
        Self::new(letters)
    }

    pub fn letters(&self) -> &[Pauli] {
        &self.letters
    }

    pub fn num_qubits(&self) -> usize {
        self.letters.len()
    }

    /// Number of non-identity letters, |P|.
    pub fn weight(&self) -> usize {
        self.letters.iter().filter(|&&p| p != Pauli::I).count()
    }

    /// Dense $2^n \times 2^n$ matrix of the word.
    pub fn matrix(&self) -> Array2<Complex64> {
        self.letters
            .iter()
            .map(|p| p.gate().matrix)
            .reduce(|acc, m| utils::kronecker_product(&acc, &m))
            .unwrap_or_else(|| Array2::eye(1))
    }

    /// Computes $P|\psi\rangle$ without building the dense matrix.
    pub fn apply_to_vector(&self, state: &Array1<Complex64>) -> Result<Array1<Complex64>, PauliError> {
        let n = self.num_qubits();
        if state.len() != 1 << n {
            return Err(PauliError::LengthMismatch {
                word: n,
                state: state.len().trailing_zeros() as usize,
            });
        }

        let mut out = Array1::<Complex64>::zeros(state.len());
        for (index, &amp) in state.iter().enumerate() {
            let mut phase = Complex64::new(1.0, 0.0);
            let mut image = index;
            for (wire, &p) in self.letters.iter().enumerate() {
                let mask = utils::wire_bit(n, wire);
                let (factor, bit) = p.act(index & mask != 0);
                phase *= factor;
                image = if bit { image | mask } else { image & !mask };
            }
            out[image] += phase * amp;
        }
        Ok(out)
    }

    /// Expectation value $\langle\psi|P|\psi\rangle$ of a pure state.
    pub fn expectation(&self, state: &Array1<Complex64>) -> Result<f64, PauliError> {
        let image = self.apply_to_vector(state)?;
        let value: Complex64 = state
            .iter()
            .zip(image.iter())
            .map(|(a, b)| a.conj() * b)
            .sum();
        Ok(value.re)
    }
}

impl FromStr for PauliWord {
    type Err = PauliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let letters = s
            .chars()
            .enumerate()
            .map(|(position, letter)| match letter {
                'I' => Ok(Pauli::I),
                'X' => Ok(Pauli::X),
                'Y' => Ok(Pauli::Y),
                'Z' => Ok(Pauli::Z),
                _ => Err(PauliError::InvalidLetter { letter, position }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(letters)
    }
}

impl fmt::Display for PauliWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.letters
            .iter()
            .try_for_each(|p| write!(f, "{}", p.letter()))
    }
}
