// tests/noise_tests.rs

use approx::{assert_abs_diff_eq, assert_relative_eq};
use qchallenge::PauliWord;
use qchallenge::algorithms::relaxation::{RelaxationConfig, analytic_half_life, half_life};
use qchallenge::algorithms::trace_distance::{bound_verifier, maxmix_trace_dist};
use qchallenge::errors::{AlgorithmError, PauliError};

fn word(s: &str) -> PauliWord {
    s.parse().unwrap()
}

#[test]
fn test_bound_reference_values() -> Result<(), AlgorithmError> {
    let cases = [
        ("XXI", 0.7, 0.0877777777777777),
        ("XXIZ", 0.1, 0.4035185185185186),
        ("YIZ", 0.3, 0.31),
        ("ZZZZZZZXXX", 0.1, 0.22914458207245006),
    ];

    for (w, lambda, expected) in cases {
        let slack = bound_verifier(&word(w), lambda)?;
        assert_relative_eq!(slack, expected, max_relative = 1e-4);
    }
    Ok(())
}

#[test]
fn test_bound_holds_up_to_full_depolarization() -> Result<(), AlgorithmError> {
    for w in ["X", "YZ", "ZIX", "XYZY"] {
        for lambda in [0.0, 0.05, 0.3, 0.5, 0.7, 0.75] {
            let slack = bound_verifier(&word(w), lambda)?;
            assert!(slack >= -1e-12, "bound violated for {} at {}: {}", w, lambda, slack);
        }
    }
    Ok(())
}

#[test]
fn test_bound_fails_beyond_three_quarters() -> Result<(), AlgorithmError> {
    // Full depolarization overshoots: the Pauli component flips sign to -1/3
    assert_relative_eq!(bound_verifier(&word("X"), 1.0)?, -1.0 / 6.0, epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_distance_decreases_with_noise() -> Result<(), AlgorithmError> {
    let w = word("XZ");
    let mut previous = f64::INFINITY;
    for lambda in [0.0, 0.1, 0.2, 0.4, 0.6] {
        let dist = maxmix_trace_dist(&w, lambda)?;
        assert!(dist < previous);
        previous = dist;
    }
    Ok(())
}

#[test]
fn test_invalid_words_are_rejected() {
    assert_eq!(
        "XQZ".parse::<PauliWord>().unwrap_err(),
        PauliError::InvalidLetter {
            letter: 'Q',
            position: 1
        }
    );
    assert_eq!("".parse::<PauliWord>().unwrap_err(), PauliError::Empty);
}

#[test]
fn test_half_life_reference_values() -> Result<(), AlgorithmError> {
    let config = RelaxationConfig::default();
    assert_abs_diff_eq!(half_life(0.1, 0.92, &config)?, 9.05, epsilon = 0.2);
    assert_abs_diff_eq!(half_life(0.2, 0.83, &config)?, 7.09, epsilon = 0.2);
    Ok(())
}

#[test]
fn test_half_life_tracks_analytic_solution() -> Result<(), AlgorithmError> {
    let config = RelaxationConfig::default();
    for (gamma, p) in [(0.1, 0.92), (0.2, 0.83), (0.5, 0.99)] {
        let discrete = half_life(gamma, p, &config)?;
        let exact = analytic_half_life(gamma, p)?;
        assert_abs_diff_eq!(discrete, exact, epsilon = 0.05);
    }
    Ok(())
}

#[test]
fn test_half_life_shrinks_with_coupling() -> Result<(), AlgorithmError> {
    let config = RelaxationConfig::default();
    let times: Vec<f64> = [0.05, 0.1, 0.2, 0.4, 0.8]
        .iter()
        .map(|&gamma| half_life(gamma, 0.9, &config))
        .collect::<Result<_, _>>()?;

    assert!(times.windows(2).all(|w| w[1] <= w[0]), "{:?}", times);
    Ok(())
}
