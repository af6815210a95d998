//! How fast depolarizing noise washes out a Pauli-word state.
//!
//! The state $(I + P)/2^n$ sits at trace distance ½ from the maximally mixed
//! state. Depolarizing every qubit with probability λ shrinks the Pauli
//! component by $(1 - 4\lambda/3)^{|P|}$, which is dominated by
//! $(1 - \lambda)^{|P|}$ for $\lambda \le 3/4$; [`bound_verifier`] reports
//! the slack.

use crate::core::errors::{AlgorithmError, PauliError};
use crate::core::utils::{abs_matrix, trace_norm};
use crate::{PauliWord, QuantumChannel, QuantumState};
use ndarray::Array2;
use num_complex::Complex64;

/// Number of non-identity letters in the word.
pub fn word_dist(word: &PauliWord) -> usize {
    word.weight()
}

/// $(I + P)/2^n$ with depolarizing noise of strength `lambda` on every qubit.
pub fn noisy_pauli_density(word: &PauliWord, lambda: f64) -> Result<QuantumState, AlgorithmError> {
    if word.weight() == 0 {
        return Err(PauliError::Identity.into());
    }

    let n = word.num_qubits();
    let dim = 1usize << n;
    let scale = Complex64::new(1.0 / dim as f64, 0.0);
    let density = (Array2::<Complex64>::eye(dim) + word.matrix()).mapv(|v| v * scale);

    let mut state = QuantumState::from_density_matrix(density)?;
    let channel = QuantumChannel::depolarizing(lambda)?;
    for wire in 0..n {
        state.apply_channel(&channel, &[wire])?;
    }

    Ok(state)
}

/// Positive part $|\rho - \sigma|$ of the difference of two density matrices.
pub fn abs_dist(rho: &QuantumState, sigma: &QuantumState) -> Array2<Complex64> {
    abs_matrix(&(&rho.density_matrix - &sigma.density_matrix))
}

/// Trace distance $\frac{1}{2}\mathrm{tr}|\rho - \sigma|$.
pub fn trace_distance(rho: &QuantumState, sigma: &QuantumState) -> f64 {
    0.5 * trace_norm(&(&rho.density_matrix - &sigma.density_matrix))
}

/// Trace distance between the noisy Pauli density and the maximally mixed state.
pub fn maxmix_trace_dist(word: &PauliWord, lambda: f64) -> Result<f64, AlgorithmError> {
    let rho = noisy_pauli_density(word, lambda)?;
    let sigma = QuantumState::maximally_mixed(word.num_qubits());
    let dist = trace_distance(&rho, &sigma);

    log::debug!("T(rho_{}({}), I/2^n) = {:.8}", word, lambda, dist);
    Ok(dist)
}

/// $(1 - \lambda)^{|P|} - T(\rho_P(\lambda), I/2^n)$, non-negative for every word when λ ≤ 3/4.
pub fn bound_verifier(word: &PauliWord, lambda: f64) -> Result<f64, AlgorithmError> {
    let bound = (1.0 - lambda).powi(word_dist(word) as i32);
    Ok(bound - maxmix_trace_dist(word, lambda)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::utils::trace;
    use approx::assert_relative_eq;

    fn word(s: &str) -> PauliWord {
        s.parse().unwrap()
    }

    #[test]
    fn counts_non_identity_letters() {
        assert_eq!(word_dist(&word("XXI")), 2);
        assert_eq!(word_dist(&word("IIII")), 0);
        assert_eq!(word_dist(&word("YZXZ")), 4);
    }

    #[test]
    fn noiseless_distance_is_one_half() {
        let dist = maxmix_trace_dist(&word("XIZ"), 0.0).unwrap();
        assert_relative_eq!(dist, 0.5, epsilon = 1e-10);
    }

    #[test]
    fn distance_follows_pauli_shrinking() {
        let lambda: f64 = 0.25;
        let dist = maxmix_trace_dist(&word("YZ"), lambda).unwrap();
        let expected = 0.5 * (1.0 - 4.0 * lambda / 3.0).powi(2);
        assert_relative_eq!(dist, expected, epsilon = 1e-10);
    }

    #[test]
    fn polar_factor_agrees_with_trace_norm() {
        let rho = noisy_pauli_density(&word("XZY"), 0.2).unwrap();
        let sigma = QuantumState::maximally_mixed(3);
        let via_polar = 0.5 * trace(&abs_dist(&rho, &sigma)).re;
        assert_relative_eq!(via_polar, trace_distance(&rho, &sigma), epsilon = 1e-8);
    }

    #[test]
    fn rejects_identity_word_and_bad_noise() {
        assert!(matches!(
            noisy_pauli_density(&word("II"), 0.1),
            Err(AlgorithmError::PauliError(PauliError::Identity))
        ));
        assert!(matches!(
            bound_verifier(&word("XI"), 1.3),
            Err(AlgorithmError::ChannelError(_))
        ));
    }
}
