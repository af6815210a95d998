// tests/circuit_tests.rs

use approx::{assert_abs_diff_eq, assert_relative_eq};
use ndarray::Array1;
use num_complex::Complex64;
use qchallenge::algorithms::product_state::{Separability, is_product};
use qchallenge::algorithms::{ansatz, dense_coding, hamiltonian, lcu};
use qchallenge::Gate;
use qchallenge::errors::AlgorithmError;

fn real(values: &[f64]) -> Array1<Complex64> {
    values.iter().map(|&v| Complex64::new(v, 0.0)).collect()
}

#[test]
fn test_bell_state_is_entangled() -> Result<(), AlgorithmError> {
    let state = real(&[0.707107, 0.0, 0.0, 0.707107]);
    let answer = is_product(&state, &[0], &[0, 1])?;
    assert_eq!(answer, Separability::Entangled);
    assert_eq!(answer.to_string(), "no");
    Ok(())
}

#[test]
fn test_basis_state_is_product() -> Result<(), AlgorithmError> {
    let state = real(&[1.0, 0.0, 0.0, 0.0]);
    let answer = is_product(&state, &[0], &[0, 1])?;
    assert_eq!(answer, Separability::Product);
    assert_eq!(answer.to_string(), "yes");
    Ok(())
}

#[test]
fn test_global_phase_does_not_matter() -> Result<(), AlgorithmError> {
    let phase = Complex64::from_polar(1.0, 0.83);
    for state in [
        real(&[0.707107, 0.0, 0.0, 0.707107]),
        real(&[0.6, 0.8, 0.0, 0.0]),
    ] {
        let rotated = state.mapv(|c| c * phase);
        assert_eq!(
            is_product(&state, &[1], &[0, 1])?,
            is_product(&rotated, &[1], &[0, 1])?
        );
    }
    Ok(())
}

#[test]
fn test_ghz_is_entangled_across_every_cut() -> Result<(), AlgorithmError> {
    let s = 0.5f64.sqrt();
    let mut state = Array1::<Complex64>::zeros(8);
    state[0] = Complex64::new(s, 0.0);
    state[7] = Complex64::new(0.0, s);

    for subsystem in [vec![0], vec![1], vec![2], vec![0, 2]] {
        assert_eq!(is_product(&state, &subsystem, &[0, 1, 2])?, Separability::Entangled);
    }
    Ok(())
}

#[test]
fn test_pair_hamiltonian_on_eight_wires() -> Result<(), AlgorithmError> {
    let value = hamiltonian::expectation_value(8)?;
    assert_relative_eq!(value, 9.33333, max_relative = 1e-4);
    Ok(())
}

#[test]
fn test_dense_coding_all_messages() -> Result<(), AlgorithmError> {
    for i in [false, true] {
        for j in [false, true] {
            for k in [false, true] {
                let probs = dense_coding::run(i, j, k)?;
                let index = dense_coding::message_index(i, j, k);
                assert_abs_diff_eq!(probs[index], 1.0, epsilon = 1e-10);
                assert_abs_diff_eq!(probs.iter().sum::<f64>(), 1.0, epsilon = 1e-10);
            }
        }
    }
    Ok(())
}

#[test]
fn test_dense_coding_encoding_is_local() {
    // Every encoding is a tensor product of single-qubit Paulis, up to sign
    for index in 0..8 {
        let gate = dense_coding::encode(index & 4 != 0, index & 2 != 0, index & 1 != 0);
        assert_eq!(gate.num_qubits, 2);
        assert!(gate
            .matrix
            .iter()
            .all(|v| v.norm() < 1e-12 || (v.norm() - 1.0).abs() < 1e-12));
    }
}

#[test]
fn test_lcu_reference_value() -> Result<(), AlgorithmError> {
    let u = Gate::from_real(&[vec![0.70710678, 0.70710678], vec![0.70710678, -0.70710678]])?;
    let v = Gate::from_real(&[vec![1.0, 0.0], vec![0.0, -1.0]])?;

    let p0 = lcu::linear_combination(&u, &v, 1.0, 3.0)?;
    assert_relative_eq!(p0, 0.8901650422902458, max_relative = 1e-4);
    Ok(())
}

#[test]
fn test_lcu_with_single_term() -> Result<(), AlgorithmError> {
    // beta = 0 leaves U alone, which never fails
    let p0 = lcu::linear_combination(&Gate::h(), &Gate::x(), 2.0, 0.0)?;
    assert_relative_eq!(p0, 1.0, epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_ansatz_reaches_every_basis_state() -> Result<(), AlgorithmError> {
    let coefficients = ansatz::generate_coefficients();
    assert_eq!(coefficients.len(), 8);

    for (index, &alpha) in coefficients.iter().enumerate() {
        let probs = ansatz::model(alpha)?;
        assert_abs_diff_eq!(probs[index], 1.0, epsilon = 1e-10);
    }
    Ok(())
}

#[test]
fn test_ansatz_is_continuous() -> Result<(), AlgorithmError> {
    let mut point = -1.0;
    while point <= 8.0 {
        assert!(
            ansatz::is_continuous_at(point, 1e-6, 1e-3)?,
            "jump at alpha = {}",
            point
        );
        point += 0.125;
    }
    Ok(())
}

#[test]
fn test_ansatz_clamps_out_of_range() -> Result<(), AlgorithmError> {
    assert_eq!(ansatz::model(-3.0)?, ansatz::model(0.0)?);
    assert_eq!(ansatz::model(11.5)?, ansatz::model(7.0)?);

    let probs = ansatz::model(2.5)?;
    // 2 = 010 and 3 = 011 share the first two bits
    assert_abs_diff_eq!(probs[2] + probs[3], 1.0, epsilon = 1e-12);
    Ok(())
}
