//! Product-state test for pure states across a bipartition.

use crate::QuantumState;
use crate::core::errors::{AlgorithmError, StateError};
use crate::core::utils::find_duplicate;
use ndarray::Array1;
use num_complex::Complex64;
use std::fmt;

/// Purity deficit below which a reduced state counts as pure.
const PURITY_TOLERANCE: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Separability {
    Product,
    Entangled,
}

impl fmt::Display for Separability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Separability::Product => write!(f, "yes"),
            Separability::Entangled => write!(f, "no"),
        }
    }
}

/// Decides whether `state` factors as (state of `subsystem`) ⊗ (state of the rest).
///
/// `wires` labels the qubits of `state` in order, and the labels in
/// `subsystem` are looked up there. Labels must be distinct in both lists. The vector is normalized first, so only
/// its direction matters.
///
/// A pure state is a product across the cut exactly when its reduced state on
/// either side is pure.
pub fn is_product(
    state: &Array1<Complex64>,
    subsystem: &[usize],
    wires: &[usize],
) -> Result<Separability, AlgorithmError> {
    if let Some(label) = find_duplicate(wires).or_else(|| find_duplicate(subsystem)) {
        return Err(AlgorithmError::DuplicateWire(label));
    }

    let expected = u32::try_from(wires.len())
        .ok()
        .and_then(|n| 1usize.checked_shl(n))
        .ok_or(AlgorithmError::InvalidParameter {
            name: "wires",
            value: wires.len() as f64,
        })?;
    if state.len() != expected {
        return Err(StateError::DimensionMismatch {
            expected,
            got_rows: state.len(),
            got_cols: 1,
        }
        .into());
    }

    let positions = subsystem
        .iter()
        .map(|label| {
            wires
                .iter()
                .position(|w| w == label)
                .ok_or(AlgorithmError::UnknownWire(*label))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let norm = state.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt();
    if norm == 0.0 {
        return Err(AlgorithmError::ZeroVector);
    }
    let normalized = state.mapv(|c| c / norm);

    let reduced = QuantumState::from_state_vector(normalized)?.partial_trace(&positions)?;
    let purity = reduced.purity();

    log::debug!("purity of subsystem {:?}: {:.8}", subsystem, purity);

    if purity >= 1.0 - PURITY_TOLERANCE {
        Ok(Separability::Product)
    } else {
        Ok(Separability::Entangled)
    }
}
