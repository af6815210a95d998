use num_complex::Complex64;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum GateError {
    #[error("Matrix is not Unitary (U†U != I)")]
    NonUnitary,

    #[error("Matrix must be square")]
    NotSquareMatrix,

    #[error("Invalid Dimensions")]
    InvalidDimensions,

    #[error("Wire {0} cannot be both control and target")]
    ControlTargetOverlap(usize),

    #[error("Duplicate wire index found: {0}")]
    DuplicateQubit(usize),

    #[error("Wire {index} out of range for a {num_qubits}-qubit system")]
    IndexOutOfBounds { index: usize, num_qubits: usize },
}

#[derive(Error, Debug, Clone)]
pub enum MeasurementError {
    #[error("Number of operators ({ops}) does not match number of values ({vals})")]
    CountMismatch { ops: usize, vals: usize },

    #[error("Measurement operators do not sum to Identity (Completeness relation failed)")]
    NotComplete,

    #[error("Invalid operator dimensions")]
    InvalidDimensions,

    #[error("Operator expansion failed: {0}")]
    ExpansionError(#[from] GateError),

    #[error("Duplicate wire index found: {0}")]
    DuplicateQubit(usize),
}

#[derive(Error, Debug, Clone)]
pub enum StateError {
    #[error("Trace is not unity: {0}")]
    InvalidTrace(Complex64),

    #[error("Vector is not normalized. Norm squared: {0}")]
    NotNormalized(f64),

    #[error("Invalid dimensions")]
    InvalidDimensions,

    #[error("Dimension mismatch: expected {expected}, got {got_rows}x{got_cols}")]
    DimensionMismatch {
        expected: usize,
        got_rows: usize,
        got_cols: usize,
    },

    #[error("Wire {index} out of bounds for {num_qubits} qubits")]
    IndexOutOfBounds { index: usize, num_qubits: usize },

    #[error("Measurement error: {0}")]
    MeasurementError(#[from] MeasurementError),

    #[error("Gate error: {0}")]
    GateError(#[from] GateError),

    #[error("Channel error: {0}")]
    ChannelError(#[from] ChannelError),
}

#[derive(Error, Debug, Clone)]
pub enum ChannelError {
    #[error("Channel must have at least one Kraus operator")]
    Empty,

    #[error("Kraus operators do not sum to Identity (Trace preserving relation failed)")]
    NotComplete,

    #[error("Invalid operator dimensions: Matrices must be square and 2^n")]
    InvalidDimensions,

    #[error("Dimension mismatch: All Kraus operators must have the same size")]
    OperatorSizeMismatch,

    #[error("Invalid probability: {0}. Must be between 0.0 and 1.0")]
    InvalidProbability(f64),

    #[error("Duplicate wire index found: {0}")]
    DuplicateQubit(usize),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PauliError {
    #[error("Pauli word must contain at least one letter")]
    Empty,

    #[error("Invalid Pauli letter '{letter}' at position {position}")]
    InvalidLetter { letter: char, position: usize },

    #[error("Pauli word has no non-identity letter")]
    Identity,

    #[error("Pauli word acts on {word} qubits but the state has {state}")]
    LengthMismatch { word: usize, state: usize },
}

#[derive(Error, Debug, Clone)]
pub enum AlgorithmError {
    #[error("State error: {0}")]
    StateError(#[from] StateError),

    #[error("Gate error: {0}")]
    GateError(#[from] GateError),

    #[error("Channel error: {0}")]
    ChannelError(#[from] ChannelError),

    #[error("Pauli error: {0}")]
    PauliError(#[from] PauliError),

    #[error("Fixed point not reached after {iterations} iterations (residual {residual:e})")]
    NotConverged { iterations: usize, residual: f64 },

    #[error("Invalid value {value} for parameter `{name}`")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Excited population never relaxes below the threshold for p = {0}")]
    ThresholdUnreachable(f64),

    #[error("No relaxation within the time limit of {0}")]
    TimeLimitExceeded(f64),

    #[error("Wire label {0} is not part of the register")]
    UnknownWire(usize),

    #[error("Wire label {0} appears more than once")]
    DuplicateWire(usize),

    #[error("State vector is zero")]
    ZeroVector,
}
