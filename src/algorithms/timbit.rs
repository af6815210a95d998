//! Timbits: fixed points of a two-qubit channel, used as a non-linear gate.
//!
//! For a two-qubit unitary `U` and a carrier state ρ₀ on wire 0, the map
//!
//! $$C[\rho] = \mathrm{Tr}_0\left[U (\rho_0 \otimes \rho) U^\dagger\right]$$
//!
//! acts on the single-qubit state ρ of wire 1. A *timbit* is a fixed point of
//! `C`. The timbit gate sends ρ₀ to the complementary reduction
//! $\mathrm{Tr}_1[U (\rho_0 \otimes \rho^*) U^\dagger]$, which depends on ρ₀
//! through the fixed point ρ* and is therefore non-linear in ρ₀.
//!
//! [`sat`] iterates that gate on the output wire of a Boolean oracle to bias
//! the readout towards 1 when the function has a satisfying input.

use crate::core::errors::{AlgorithmError, GateError, StateError};
use crate::core::utils::max_abs_diff;
use crate::{Gate, QuantumState};
use ndarray::Array2;
use num_complex::Complex64;

/// The fixed permutation |00>→|00>, |01>→|10>, |10>→|11>, |11>→|01> used by [`sat`].
pub const U_NP: [[f64; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
];

/// [`U_NP`] as a gate.
pub fn u_np() -> Gate {
    Gate::new(Array2::from_shape_fn((4, 4), |(r, c)| {
        Complex64::new(U_NP[r][c], 0.0)
    }))
    .unwrap()
}

/// Which side of the joint state the unitary multiplies first.
///
/// Two readings of the construction exist: `Forward` evolves the joint state
/// as U ρ U†, `Adjoint` as U† ρ U. Only `Forward` reproduces the reference
/// SAT probabilities, so it is the default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Conjugation {
    #[default]
    Forward,
    Adjoint,
}

/// Stopping rule for the fixed-point iteration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedPointSolver {
    /// Iteration budget before giving up.
    pub max_iterations: usize,
    /// Largest element-wise change between iterates accepted as converged.
    pub tolerance: f64,
}

impl Default for FixedPointSolver {
    fn default() -> Self {
        Self {
            max_iterations: 1_000,
            tolerance: 1e-12,
        }
    }
}

/// A converged timbit together with how it was reached.
#[derive(Clone, Debug)]
pub struct FixedPoint {
    pub timbit: QuantumState,
    pub iterations: usize,
    pub residual: f64,
}

impl FixedPointSolver {
    pub fn new(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Iterates `C` from `guess` until successive iterates agree within `tolerance`.
    ///
    /// After every step the last three iterates are also extrapolated element
    /// by element (Aitken's Δ²). `C` is affine, so each entry approaches its
    /// limit geometrically and the extrapolation lands on the fixed point even
    /// when plain iteration oscillates (a period-2 cycle extrapolates to the
    /// midpoint) or contracts too slowly for the budget. A candidate is only
    /// accepted when one more application of `C` moves it by at most `tolerance`.
    ///
    /// # Errors
    ///
    /// `AlgorithmError::NotConverged` when the budget runs out, and dimension
    /// errors when `u` is not a two-qubit gate or the states are not single-qubit.
    pub fn solve(
        &self,
        u: &Gate,
        rho_0: &QuantumState,
        guess: &QuantumState,
        conjugation: Conjugation,
    ) -> Result<FixedPoint, AlgorithmError> {
        let mut previous: Option<QuantumState> = None;
        let mut timbit = guess.clone();
        let mut residual = f64::INFINITY;

        for iteration in 1..=self.max_iterations {
            let next = timbit_step(u, rho_0, &timbit, conjugation)?;
            residual = max_abs_diff(&next.density_matrix, &timbit.density_matrix);

            log::trace!("timbit iteration {}: residual {:e}", iteration, residual);

            if residual <= self.tolerance {
                log::debug!(
                    "timbit converged after {} iterations (residual {:e})",
                    iteration,
                    residual
                );
                return Ok(FixedPoint {
                    timbit: next,
                    iterations: iteration,
                    residual,
                });
            }

            if let Some(before) = &previous {
                let candidate = QuantumState {
                    density_matrix: extrapolate(
                        &before.density_matrix,
                        &timbit.density_matrix,
                        &next.density_matrix,
                    ),
                    num_qubits: 1,
                };
                let moved = timbit_step(u, rho_0, &candidate, conjugation)?;
                let candidate_residual =
                    max_abs_diff(&moved.density_matrix, &candidate.density_matrix);

                if candidate_residual <= self.tolerance {
                    log::debug!(
                        "timbit extrapolated after {} iterations (residual {:e})",
                        iteration,
                        candidate_residual
                    );
                    return Ok(FixedPoint {
                        timbit: candidate,
                        iterations: iteration,
                        residual: candidate_residual,
                    });
                }
            }

            previous = Some(std::mem::replace(&mut timbit, next));
        }

        log::warn!(
            "timbit did not converge in {} iterations (residual {:e})",
            self.max_iterations,
            residual
        );
        Err(AlgorithmError::NotConverged {
            iterations: self.max_iterations,
            residual,
        })
    }
}

/// Aitken's Δ² on the real and imaginary part of every entry of three consecutive iterates.
fn extrapolate(
    x0: &Array2<Complex64>,
    x1: &Array2<Complex64>,
    x2: &Array2<Complex64>,
) -> Array2<Complex64> {
    let component = |a: f64, b: f64, c: f64| {
        let (d1, d2) = (b - a, c - b);
        let curvature = d2 - d1;
        if curvature == 0.0 {
            c
        } else {
            c - d2 * d2 / curvature
        }
    };

    Array2::from_shape_fn(x2.dim(), |ix| {
        let (a, b, c) = (x0[ix], x1[ix], x2[ix]);
        Complex64::new(component(a.re, b.re, c.re), component(a.im, b.im, c.im))
    })
}

/// Settings for the timbit pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimbitConfig {
    pub conjugation: Conjugation,
    pub solver: FixedPointSolver,
}

impl TimbitConfig {
    pub fn with_conjugation(mut self, conjugation: Conjugation) -> Self {
        self.conjugation = conjugation;
        self
    }

    pub fn with_solver(mut self, solver: FixedPointSolver) -> Self {
        self.solver = solver;
        self
    }
}

/// U (ρ₀ ⊗ ρ) U† (or the adjoint ordering) on two wires.
fn joint_state(
    u: &Gate,
    rho_0: &QuantumState,
    rho: &QuantumState,
    conjugation: Conjugation,
) -> Result<QuantumState, AlgorithmError> {
    if u.num_qubits != 2 {
        return Err(AlgorithmError::GateError(GateError::InvalidDimensions));
    }
    for state in [rho_0, rho] {
        if state.num_qubits != 1 {
            return Err(AlgorithmError::StateError(StateError::DimensionMismatch {
                expected: 2,
                got_rows: state.density_matrix.nrows(),
                got_cols: state.density_matrix.ncols(),
            }));
        }
    }

    let mut joint = rho_0.tensor(rho);
    match conjugation {
        Conjugation::Forward => joint.apply_operator(&u.matrix)?,
        Conjugation::Adjoint => joint.apply_operator(&u.adjoint().matrix)?,
    }
    Ok(joint)
}

/// One application of `C`: the state left on wire 1.
pub fn timbit_step(
    u: &Gate,
    rho_0: &QuantumState,
    rho: &QuantumState,
    conjugation: Conjugation,
) -> Result<QuantumState, AlgorithmError> {
    Ok(joint_state(u, rho_0, rho, conjugation)?.partial_trace(&[1])?)
}

/// Applies `C` exactly `n_iters` times to the guess `rho`, without a convergence check.
///
/// `n_iters = 0` returns the guess unchanged.
pub fn calculate_timbit(
    u: &Gate,
    rho_0: &QuantumState,
    rho: &QuantumState,
    n_iters: usize,
    conjugation: Conjugation,
) -> Result<QuantumState, AlgorithmError> {
    (0..n_iters).try_fold(rho.clone(), |timbit, _| {
        timbit_step(u, rho_0, &timbit, conjugation)
    })
}

/// Output of the timbit gate for the carrier ρ₀: the state left on wire 0.
pub fn apply_timbit_gate(
    u: &Gate,
    rho_0: &QuantumState,
    timbit: &QuantumState,
    conjugation: Conjugation,
) -> Result<QuantumState, AlgorithmError> {
    Ok(joint_state(u, rho_0, timbit, conjugation)?.partial_trace(&[0])?)
}

/// Solves for the timbit of ρ₀ starting at `guess` and applies the gate.
pub fn timbit_output(
    u: &Gate,
    rho_0: &QuantumState,
    guess: &QuantumState,
    config: &TimbitConfig,
) -> Result<QuantumState, AlgorithmError> {
    let fixed = config.solver.solve(u, rho_0, guess, config.conjugation)?;
    apply_timbit_gate(u, rho_0, &fixed.timbit, config.conjugation)
}

/// Reduced state of the oracle's output wire after querying it on a uniform superposition.
///
/// The oracle acts on `k + 1` wires: wires `0..k` are the input bits and the
/// last wire receives the function value.
pub fn oracle_output_state(oracle: &Gate) -> Result<QuantumState, AlgorithmError> {
    let num_wires = oracle.num_qubits;
    if num_wires < 2 {
        return Err(AlgorithmError::GateError(GateError::InvalidDimensions));
    }
    let output = num_wires - 1;

    let mut register = QuantumState::new(num_wires);
    for wire in 0..output {
        register.apply(&Gate::h(), &[wire])?;
    }
    let wires: Vec<usize> = (0..num_wires).collect();
    register.apply(oracle, &wires)?;

    Ok(register.partial_trace(&[output])?)
}

/// Timbit-based guess of whether the oracle's Boolean function ever outputs 1.
///
/// Applies the timbit gate of [`U_NP`] `q` times to the oracle's output wire,
/// re-solving the fixed point (from `guess`) for the current state each
/// round, and returns the probabilities of reading 0 and 1.
pub fn sat(
    oracle: &Gate,
    q: usize,
    guess: &QuantumState,
    config: &TimbitConfig,
) -> Result<[f64; 2], AlgorithmError> {
    let u = u_np();
    let mut output = oracle_output_state(oracle)?;

    for round in 0..q {
        output = timbit_output(&u, &output, guess, config)?;
        log::debug!(
            "sat round {}: p1 = {:.6}",
            round + 1,
            output.density_matrix[[1, 1]].re
        );
    }

    let probs = output.probabilities(&[0])?;
    Ok([probs[0], probs[1]])
}
