mod core;
pub mod algorithms;
mod sampler;

pub use crate::core::{
    Gate, Measurement, Pauli, PauliWord, QuantumChannel, QuantumState, errors, pauli, utils,
};
pub use crate::sampler::Sampler;
