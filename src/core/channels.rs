use crate::core::errors::ChannelError;
use crate::core::utils;
use ndarray::{Array2, array};
use num_complex::Complex64;

/// A completely positive, trace-preserving map given by its Kraus operators.
#[derive(Clone, Debug)]
pub struct QuantumChannel {
    pub kraus_ops: Vec<Array2<Complex64>>,
    pub num_qubits: usize,
}

impl QuantumChannel {
    pub fn new(kraus_ops: Vec<Array2<Complex64>>) -> Result<Self, ChannelError> {
        if kraus_ops.is_empty() {
            return Err(ChannelError::Empty);
        }

        let (rows, cols) = kraus_ops[0].dim();

        if rows != cols || !rows.is_power_of_two() {
            return Err(ChannelError::InvalidDimensions);
        }

        // log_2
        let num_qubits = rows.trailing_zeros() as usize;

        for op in &kraus_ops {
            if op.dim() != (rows, cols) {
                return Err(ChannelError::OperatorSizeMismatch);
            }
        }

        if !utils::check_completeness(&kraus_ops, rows) {
            return Err(ChannelError::NotComplete);
        }

        Ok(Self {
            kraus_ops,
            num_qubits,
        })
    }

    /// Bit Flip Channel -> X
    pub fn bit_flip(p: f64) -> Result<QuantumChannel, ChannelError> {
        validate_prob(p)?;

        let p_stay = (1.0 - p).sqrt();
        let p_flip = p.sqrt();

        let k0 = array![
            [Complex64::new(p_stay, 0.0), Complex64::new(0.0, 0.0)],
            [Complex64::new(0.0, 0.0), Complex64::new(p_stay, 0.0)]
        ];

        let k1 = array![
            [Complex64::new(0.0, 0.0), Complex64::new(p_flip, 0.0)],
            [Complex64::new(p_flip, 0.0), Complex64::new(0.0, 0.0)]
        ];

        QuantumChannel::new(vec![k0, k1])
    }

    /// Depolarizing Channel
    ///
    /// With probability `p` one of X, Y, Z is applied, each with probability p/3.
    /// A non-identity Pauli component of the state shrinks by 1 - 4p/3.
    pub fn depolarizing(p: f64) -> Result<QuantumChannel, ChannelError> {
        validate_prob(p)?;

        let weight_i = (1.0 - p).sqrt();
        let weight_xyz = (p / 3.0).sqrt();

        let k0 = array![
            // ~ I
            [Complex64::new(weight_i, 0.0), Complex64::new(0.0, 0.0)],
            [Complex64::new(0.0, 0.0), Complex64::new(weight_i, 0.0)]
        ];

        let k1 = array![
            // ~ X
            [Complex64::new(0.0, 0.0), Complex64::new(weight_xyz, 0.0)],
            [Complex64::new(weight_xyz, 0.0), Complex64::new(0.0, 0.0)]
        ];

        let k2 = array![
            // ~ Y
            [Complex64::new(0.0, 0.0), Complex64::new(0.0, -weight_xyz)],
            [Complex64::new(0.0, weight_xyz), Complex64::new(0.0, 0.0)]
        ];

        let k3 = array![
            // ~ Z
            [Complex64::new(weight_xyz, 0.0), Complex64::new(0.0, 0.0)],
            [Complex64::new(0.0, 0.0), Complex64::new(-weight_xyz, 0.0)]
        ];

        QuantumChannel::new(vec![k0, k1, k2, k3])
    }

    /// Amplitude Damping -> T1 relaxation
    pub fn amplitude_damping(gamma: f64) -> Result<QuantumChannel, ChannelError> {
        Self::generalized_amplitude_damping(gamma, 1.0)
    }

    /// Generalized Amplitude Damping -> T1 relaxation towards a thermal state
    ///
    /// `gamma` is the energy exchange probability, `p` the probability that the
    /// exchange is a de-excitation. The fixed point has population `p` in |0>.
    pub fn generalized_amplitude_damping(gamma: f64, p: f64) -> Result<QuantumChannel, ChannelError> {
        validate_prob(gamma)?;
        validate_prob(p)?;

        let g_sqrt = gamma.sqrt();
        let one_minus_g_sqrt = (1.0 - gamma).sqrt();
        let down = Complex64::new(p.sqrt(), 0.0);
        let up = Complex64::new((1.0 - p).sqrt(), 0.0);

        let k0 = array![
            [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
            [Complex64::new(0.0, 0.0), Complex64::new(one_minus_g_sqrt, 0.0)]
        ] * down;

        let k1 = array![
            [Complex64::new(0.0, 0.0), Complex64::new(g_sqrt, 0.0)],
            [Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0)]
        ] * down;

        let k2 = array![
            [Complex64::new(one_minus_g_sqrt, 0.0), Complex64::new(0.0, 0.0)],
            [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)]
        ] * up;

        let k3 = array![
            [Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0)],
            [Complex64::new(g_sqrt, 0.0), Complex64::new(0.0, 0.0)]
        ] * up;

        // Drop the vanishing half so plain amplitude damping keeps two operators
        let kraus_ops = [k0, k1, k2, k3]
            .into_iter()
            .filter(|op| op.iter().any(|v| v.norm_sqr() > 0.0))
            .collect();

        QuantumChannel::new(kraus_ops)
    }
}

/// Validate probability parameter
pub(crate) fn validate_prob(p: f64) -> Result<(), ChannelError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(ChannelError::InvalidProbability(p));
    }
    Ok(())
}
