//! Superdense coding of three classical bits over a shared GHZ state.
//!
//! The sender holds wires 0 and 1 of $(|000\rangle + |111\rangle)/\sqrt{2}$,
//! the receiver holds wire 2. A two-qubit Pauli on the sender's side maps the
//! GHZ state onto one of eight orthogonal GHZ-basis states, which the receiver
//! distinguishes after reversing the preparation circuit.

use crate::core::errors::{AlgorithmError, StateError};
use crate::{Gate, Measurement, QuantumState, Sampler};
use rand::Rng;

/// (|000> + |111>)/√2.
pub fn ghz_state() -> Result<QuantumState, StateError> {
    let mut state = QuantumState::new(3);
    state.apply(&Gate::h(), &[0])?;
    state.apply(&Gate::cnot(), &[0, 1])?;
    state.apply(&Gate::cnot(), &[0, 2])?;
    Ok(state)
}

/// Sender's unitary on wires 0 and 1 for the message `(i, j, k)`.
///
/// Bits `j` and `k` choose which wires are flipped, so that the receiver's
/// parities land on them; bit `i` adds a relative phase through Z on wire 0.
pub fn encode(i: bool, j: bool, k: bool) -> Gate {
    let (flip_0, flip_1) = match (j, k) {
        (false, false) => (false, false),
        (true, false) => (false, true),
        (true, true) => (true, false),
        (false, true) => (true, true),
    };
    let pick = |flag: bool, gate: Gate| if flag { gate } else { Gate::i() };

    let flips = pick(flip_0, Gate::x()).tensor(&pick(flip_1, Gate::x()));
    let phase = pick(i, Gate::z()).tensor(&Gate::i());

    // Products of Paulis stay unitary
    flips.then(&phase).unwrap()
}

/// Receiver's circuit: CNOT(0→2), CNOT(0→1), then H on wire 0.
pub fn decode(state: &mut QuantumState) -> Result<(), StateError> {
    state.apply_controlled(&Gate::x(), &[2], Some(&[0]))?;
    state.apply_controlled(&Gate::x(), &[1], Some(&[0]))?;
    state.apply(&Gate::h(), &[0])
}

/// Basis index `4i + 2j + k` of a message.
pub fn message_index(i: bool, j: bool, k: bool) -> usize {
    (usize::from(i) << 2) | (usize::from(j) << 1) | usize::from(k)
}

/// Decoded register right before readout.
pub fn transmit(i: bool, j: bool, k: bool) -> Result<QuantumState, AlgorithmError> {
    let mut state = ghz_state()?;
    state.apply(&encode(i, j, k), &[0, 1])?;
    decode(&mut state)?;
    Ok(state)
}

/// Probabilities of the eight basis states after decoding; all weight sits on [`message_index`].
pub fn run(i: bool, j: bool, k: bool) -> Result<Vec<f64>, AlgorithmError> {
    Ok(transmit(i, j, k)?.probabilities(&[0, 1, 2])?)
}

/// Reads a decoded register with `num_shots` measurements and returns the most frequent message.
pub fn receive<R: Rng>(
    state: &QuantumState,
    sampler: &Sampler,
    num_shots: usize,
    rng: &mut R,
) -> Result<(bool, bool, bool), AlgorithmError> {
    let counts = sampler.run_with_rng(
        state,
        &Measurement::computational(3),
        &[0, 1, 2],
        num_shots,
        rng,
    )?;

    let index = counts
        .iter()
        .enumerate()
        .max_by_key(|&(_, count)| *count)
        .map(|(index, _)| index)
        .unwrap_or(0);

    log::debug!("received message {:03b} from counts {:?}", index, counts);
    Ok((index & 4 != 0, index & 2 != 0, index & 1 != 0))
}
