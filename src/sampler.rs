use crate::{Measurement, QuantumChannel, QuantumState, errors::StateError};
use rand::Rng;

/// Shot-based readout of quantum states.
///
/// The `Sampler` draws a finite number of measurement outcomes from a state,
/// optionally passing it through a channel first. It stands in for the
/// statistics a physical device would report instead of exact probabilities.
#[derive(Debug, Clone, Default)]
pub struct Sampler {
    /// Optional noise applied to the measured wires before readout.
    pub channel: Option<QuantumChannel>,
}

impl Sampler {
    /// Creates a new `Sampler` instance with no channel (noise-free).
    pub fn new() -> Self {
        Self { channel: None }
    }

    /// Sets the quantum channel for the sampler.
    ///
    /// A single-qubit channel acts on every measured wire separately; a wider
    /// channel must match the number of measured wires.
    pub fn with_channel(mut self, channel: QuantumChannel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Samples `num_shots` outcomes with the thread-local RNG.
    ///
    /// Returns the number of times each outcome index of `measurement` occurred.
    pub fn run(
        &self,
        state: &QuantumState,
        measurement: &Measurement,
        targets: &[usize],
        num_shots: usize,
    ) -> Result<Vec<usize>, StateError> {
        self.run_with_rng(state, measurement, targets, num_shots, &mut rand::rng())
    }

    /// Same as [`Sampler::run`] with a caller-supplied RNG, for reproducible runs.
    pub fn run_with_rng<R: Rng>(
        &self,
        state: &QuantumState,
        measurement: &Measurement,
        targets: &[usize],
        num_shots: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>, StateError> {
        let mut state_copy = state.clone();

        if let Some(chan) = &self.channel {
            if chan.num_qubits == 1 {
                for &t in targets {
                    state_copy.apply_channel(chan, &[t])?;
                }
            } else {
                state_copy.apply_channel(chan, targets)?;
            }
        }

        let (probs, _) = state_copy.set_measurement(measurement, targets)?;

        let cdf: Vec<f64> = probs
            .iter()
            .scan(0.0, |acc, &p| {
                *acc += p;
                Some(*acc)
            })
            .collect();

        let mut counts = vec![0usize; probs.len()];
        for _ in 0..num_shots {
            let r: f64 = rng.random();
            // Rounding can leave the last cumulative value just under 1
            let outcome_idx = cdf
                .iter()
                .position(|&cumulative| r < cumulative)
                .unwrap_or(probs.len() - 1);
            counts[outcome_idx] += 1;
        }

        log::debug!(
            "sampled {} shots over {} outcomes: {:?}",
            num_shots,
            probs.len(),
            counts
        );

        Ok(counts)
    }

    /// Empirical probability vector from `num_shots` samples.
    pub fn estimate_probabilities<R: Rng>(
        &self,
        state: &QuantumState,
        measurement: &Measurement,
        targets: &[usize],
        num_shots: usize,
        rng: &mut R,
    ) -> Result<Vec<f64>, StateError> {
        let counts = self.run_with_rng(state, measurement, targets, num_shots, rng)?;
        let total = num_shots.max(1) as f64;
        Ok(counts.into_iter().map(|c| c as f64 / total).collect())
    }
}
