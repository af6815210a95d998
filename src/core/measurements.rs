use crate::core::errors::MeasurementError;
use crate::core::utils;
use ndarray::{Array1, Array2, array};
use num_complex::Complex64;

/// A generalized measurement given by Kraus operators and the value attached to each outcome.
#[derive(Clone, Debug)]
pub struct Measurement {
    /// List of measurement operators
    pub operators: Vec<Array2<Complex64>>,
    /// Value reported for each outcome
    pub values: Vec<f64>,
    /// Number of qubits the measurement acts on
    pub num_qubits: usize,
}

impl Measurement {
    pub fn new(
        operators: Vec<Array2<Complex64>>,
        values: Vec<f64>,
    ) -> Result<Self, MeasurementError> {
        let num_qubits = Self::check_shape(&operators, &values)?;

        if !utils::check_completeness(&operators, 1 << num_qubits) {
            return Err(MeasurementError::NotComplete);
        }

        Ok(Self {
            operators,
            values,
            num_qubits,
        })
    }

    /// Checks counts and dimensions, returning the number of qubits.
    fn check_shape(
        operators: &[Array2<Complex64>],
        values: &[f64],
    ) -> Result<usize, MeasurementError> {
        if operators.len() != values.len() {
            return Err(MeasurementError::CountMismatch {
                ops: operators.len(),
                vals: values.len(),
            });
        }

        let Some(first) = operators.first() else {
            return Err(MeasurementError::InvalidDimensions);
        };

        let (rows, cols) = first.dim();
        if rows != cols || !rows.is_power_of_two() {
            return Err(MeasurementError::InvalidDimensions);
        }

        if operators.iter().any(|op| op.dim() != (rows, cols)) {
            return Err(MeasurementError::InvalidDimensions);
        }

        Ok(rows.trailing_zeros() as usize)
    }

    /// Expands measurement operators to a larger system
    pub fn get_expanded_operators(
        &self,
        num_total_qubits: usize,
        targets: &[usize],
    ) -> Result<Vec<Array2<Complex64>>, MeasurementError> {
        if targets.len() != self.num_qubits {
            return Err(MeasurementError::InvalidDimensions);
        }

        Ok(self
            .operators
            .iter()
            .map(|op| utils::expand_operator(num_total_qubits, op, targets, &[]))
            .collect())
    }

    /// Computational basis on `num_qubits` wires; outcome `k` reports value `k`.
    pub fn computational(num_qubits: usize) -> Measurement {
        let dim = 1 << num_qubits;
        let operators = (0..dim)
            .map(|k| {
                let mut proj = Array2::<Complex64>::zeros((dim, dim));
                proj[[k, k]] = Complex64::new(1.0, 0.0);
                proj
            })
            .collect();
        let values = (0..dim).map(|k| k as f64).collect();

        Measurement {
            operators,
            values,
            num_qubits,
        }
    }

    /// Z basis (Computational) -> {|0>, |1>}.
    pub fn z_basis() -> Measurement {
        Self::computational(1)
    }

    /// X basis (Hadamard) -> {|+>, |->}.
    pub fn x_basis() -> Measurement {
        let inv_sqrt2 = Complex64::new(1.0 / 2.0_f64.sqrt(), 0.0);

        let v_plus: Array1<Complex64> = array![inv_sqrt2, inv_sqrt2];
        let v_minus: Array1<Complex64> = array![inv_sqrt2, -inv_sqrt2];

        let p_plus = utils::outer_product(&v_plus, &v_plus);
        let p_minus = utils::outer_product(&v_minus, &v_minus);

        Measurement::new(vec![p_plus, p_minus], vec![0.0, 1.0]).expect("Error in basis X")
    }
}
