mod channels;
pub mod errors;
mod gates;
mod measurements;
pub mod pauli;
mod state;
pub mod utils;

pub use channels::QuantumChannel;
pub use gates::Gate;
pub use measurements::Measurement;
pub use pauli::{Pauli, PauliWord};
pub use state::QuantumState;
