//! Quantum challenge algorithms.
//!
//! Each module solves one self-contained problem on top of the density-matrix
//! simulator in `core`. The timbit pipeline is the only one with iteration and
//! configurable numerics; the rest are short circuits with a closed-form check.

pub mod ansatz;
pub mod dense_coding;
pub mod hamiltonian;
pub mod lcu;
pub mod product_state;
pub mod relaxation;
pub mod timbit;
pub mod trace_distance;

pub use product_state::Separability;
pub use relaxation::RelaxationConfig;
pub use timbit::{Conjugation, FixedPoint, FixedPointSolver, TimbitConfig};
