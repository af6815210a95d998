//! Relaxation of a qubit that exchanges energy with a thermal environment.

use crate::core::errors::AlgorithmError;
use crate::{Gate, QuantumChannel, QuantumState};

/// Ground-state population that marks the half-life.
pub const THRESHOLD: f64 = 0.75;

/// Time discretization for [`half_life`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelaxationConfig {
    /// Duration of one generalized amplitude damping step.
    pub time_step: f64,
    /// Evolution stops with an error after this much time.
    pub max_time: f64,
}

impl Default for RelaxationConfig {
    fn default() -> Self {
        Self {
            time_step: 0.01,
            max_time: 1_000.0,
        }
    }
}

impl RelaxationConfig {
    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    pub fn with_max_time(mut self, max_time: f64) -> Self {
        self.max_time = max_time;
        self
    }
}

fn validate(gamma: f64, p: f64) -> Result<(), AlgorithmError> {
    if !(gamma > 0.0) {
        return Err(AlgorithmError::InvalidParameter {
            name: "gamma",
            value: gamma,
        });
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(AlgorithmError::InvalidParameter { name: "p", value: p });
    }
    // The ground population tends to p, so it never reaches the threshold otherwise
    if p <= THRESHOLD {
        return Err(AlgorithmError::ThresholdUnreachable(p));
    }
    Ok(())
}

/// First time at which a qubit prepared in |+> has ground population of at least 3/4.
///
/// `gamma` is the energy exchange rate per unit time and `p` the probability
/// that an exchange is a de-excitation. Every step of `config.time_step`
/// applies a generalized amplitude damping channel with parameters
/// `(gamma * time_step, p)`.
pub fn half_life(gamma: f64, p: f64, config: &RelaxationConfig) -> Result<f64, AlgorithmError> {
    validate(gamma, p)?;

    let dt = config.time_step;
    if !(dt > 0.0) || gamma * dt > 1.0 {
        return Err(AlgorithmError::InvalidParameter {
            name: "time_step",
            value: dt,
        });
    }

    let channel = QuantumChannel::generalized_amplitude_damping(gamma * dt, p)?;
    let mut state = QuantumState::new(1);
    state.apply(&Gate::h(), &[0])?;

    let mut steps = 0usize;
    loop {
        steps += 1;
        let time = steps as f64 * dt;
        if time > config.max_time {
            return Err(AlgorithmError::TimeLimitExceeded(config.max_time));
        }

        state.apply_channel(&channel, &[0])?;
        let ground = state.density_matrix[[0, 0]].re;

        log::trace!("t = {:.4}: P(0) = {:.6}", time, ground);

        if ground >= THRESHOLD {
            log::debug!(
                "half-life for gamma = {}, p = {}: {} ({} steps)",
                gamma,
                p,
                time,
                steps
            );
            return Ok(time);
        }
    }
}

/// Continuous-time half-life $\ln\frac{p - 1/2}{p - 3/4} / \gamma$.
///
/// The ground population relaxes as $p - (p - \frac{1}{2})e^{-\gamma t}$, so
/// [`half_life`] approaches this value as the time step shrinks.
pub fn analytic_half_life(gamma: f64, p: f64) -> Result<f64, AlgorithmError> {
    validate(gamma, p)?;
    Ok(((p - 0.5) / (p - THRESHOLD)).ln() / gamma)
}
