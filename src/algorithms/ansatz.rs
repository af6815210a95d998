//! A continuous one-parameter circuit that visits every 3-qubit basis state.

use crate::core::errors::AlgorithmError;
use crate::{Gate, QuantumState};
use std::f64::consts::PI;

pub const NUM_WIRES: usize = 3;

const MAX_ALPHA: f64 = ((1 << NUM_WIRES) - 1) as f64;

fn bit(value: usize, wire: usize) -> f64 {
    ((value >> (NUM_WIRES - 1 - wire)) & 1) as f64
}

/// Rotation fraction of `wire`: its bit in the binary expansion of `alpha`,
/// interpolated linearly between neighbouring integers.
fn rotation_fraction(alpha: f64, wire: usize) -> f64 {
    let alpha = alpha.clamp(0.0, MAX_ALPHA);
    let lower = alpha.floor();
    let frac = alpha - lower;

    let lower = lower as usize;
    let upper = (lower + 1).min(MAX_ALPHA as usize);
    (1.0 - frac) * bit(lower, wire) + frac * bit(upper, wire)
}

/// Probabilities of the eight basis states after RX(π·fₖ(α)) on each wire k.
///
/// Values of `alpha` outside [0, 7] are clamped, so the model is continuous on
/// the whole real line and `model(c)` for an integer `c` in range is the basis
/// state |c>.
pub fn model(alpha: f64) -> Result<Vec<f64>, AlgorithmError> {
    if alpha.is_nan() {
        return Err(AlgorithmError::InvalidParameter {
            name: "alpha",
            value: alpha,
        });
    }

    let mut state = QuantumState::new(NUM_WIRES);
    for wire in 0..NUM_WIRES {
        state.apply(&Gate::rx(PI * rotation_fraction(alpha, wire)), &[wire])?;
    }

    let wires: Vec<usize> = (0..NUM_WIRES).collect();
    Ok(state.probabilities(&wires)?)
}

/// Parameters producing |000>, |001>, …, |111> in order.
pub fn generate_coefficients() -> Vec<f64> {
    (0..1 << NUM_WIRES).map(|c| c as f64).collect()
}

/// Whether the output distribution moves by less than `epsilon` (L1) within `delta` of `point`.
pub fn is_continuous_at(point: f64, delta: f64, epsilon: f64) -> Result<bool, AlgorithmError> {
    let centre = model(point)?;
    for neighbour in [point - delta, point + delta] {
        let distance: f64 = model(neighbour)?
            .iter()
            .zip(&centre)
            .map(|(a, b)| (a - b).abs())
            .sum();
        if distance >= epsilon {
            return Ok(false);
        }
    }
    Ok(true)
}
