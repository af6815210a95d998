//! Probabilistic implementation of αU + βV with one auxiliary qubit.
//!
//! Wire 0 is the auxiliary qubit, wire 1 the target. Conditioned on reading 0
//! on wire 0, the target holds $(\alpha U + \beta V)|0\rangle$ up to
//! normalization.

use crate::core::errors::AlgorithmError;
use crate::{Gate, QuantumState};
use ndarray::{Array2, array};
use num_complex::Complex64;

fn validate(alpha: f64, beta: f64) -> Result<(), AlgorithmError> {
    for (name, value) in [("alpha", alpha), ("beta", beta)] {
        if !(value >= 0.0) {
            return Err(AlgorithmError::InvalidParameter { name, value });
        }
    }
    if alpha + beta == 0.0 {
        return Err(AlgorithmError::InvalidParameter {
            name: "alpha + beta",
            value: 0.0,
        });
    }
    Ok(())
}

/// $W = \frac{1}{\sqrt{\alpha + \beta}}\begin{pmatrix}\sqrt\alpha & -\sqrt\beta \\ \sqrt\beta & \sqrt\alpha\end{pmatrix}$
pub fn w_matrix(alpha: f64, beta: f64) -> Result<Gate, AlgorithmError> {
    validate(alpha, beta)?;

    let norm = (alpha + beta).sqrt();
    let (a, b) = (alpha.sqrt() / norm, beta.sqrt() / norm);
    Ok(Gate::new(array![
        [Complex64::new(a, 0.0), Complex64::new(-b, 0.0)],
        [Complex64::new(b, 0.0), Complex64::new(a, 0.0)]
    ])?)
}

/// Runs the LCU circuit on |00> and returns the probability of reading 0 on the auxiliary wire.
pub fn linear_combination(u: &Gate, v: &Gate, alpha: f64, beta: f64) -> Result<f64, AlgorithmError> {
    let w = w_matrix(alpha, beta)?;
    let mut state = QuantumState::new(2);

    state.apply(&w, &[0])?;
    state.apply(&Gate::x(), &[0])?;
    state.apply_controlled(u, &[1], Some(&[0]))?;
    state.apply(&Gate::x(), &[0])?;
    state.apply_controlled(v, &[1], Some(&[0]))?;
    state.apply(&w.transpose(), &[0])?;

    let probs = state.probabilities(&[0])?;
    log::debug!("LCU auxiliary readout: {:?}", probs);
    Ok(probs[0])
}

/// The operator $(\alpha U + \beta V)/(\alpha + \beta)$ the circuit applies on success.
pub fn combined_operator(
    u: &Gate,
    v: &Gate,
    alpha: f64,
    beta: f64,
) -> Result<Array2<Complex64>, AlgorithmError> {
    validate(alpha, beta)?;
    let scale = 1.0 / (alpha + beta);
    Ok((&u.matrix * (alpha * scale)) + (&v.matrix * (beta * scale)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn w_is_a_rotation() {
        let w = w_matrix(1.0, 3.0).unwrap();
        assert_relative_eq!(w.matrix[[0, 0]].re, 0.5, epsilon = 1e-12);
        assert_relative_eq!(w.matrix[[1, 0]].re, 3.0f64.sqrt() / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn success_probability_matches_combined_operator() {
        let (alpha, beta) = (2.0, 0.5);
        let (u, v) = (Gate::s(), Gate::h());

        let op = combined_operator(&u, &v, alpha, beta).unwrap();
        // ‖M|0>‖² with M = (αU + βV)/(α + β)
        let expected = op[[0, 0]].norm_sqr() + op[[1, 0]].norm_sqr();

        let p0 = linear_combination(&u, &v, alpha, beta).unwrap();
        assert_relative_eq!(p0, expected, epsilon = 1e-12);
    }

    #[test]
    fn equal_unitaries_always_succeed() {
        let p0 = linear_combination(&Gate::y(), &Gate::y(), 0.3, 0.7).unwrap();
        assert_relative_eq!(p0, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_degenerate_weights() {
        assert!(matches!(
            w_matrix(-1.0, 2.0),
            Err(AlgorithmError::InvalidParameter { name: "alpha", .. })
        ));
        assert!(matches!(
            w_matrix(0.0, 0.0),
            Err(AlgorithmError::InvalidParameter { .. })
        ));
    }
}
