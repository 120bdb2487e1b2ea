use thiserror::Error;

pub type Result<T> = std::result::Result<T, KspError>;

/// Caller mistakes caught before any computation starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("edge {edge} has negative weight {weight}")]
    NegativeWeight { edge: usize, weight: i64 },

    #[error("edge {edge} weight {weight} does not fit in 32 bits")]
    WeightOverflow { edge: usize, weight: i64 },

    #[error("vertex {vertex} out of range for graph with {n} vertices")]
    VertexOutOfRange { vertex: u32, n: u32 },

    #[error("sidetrack {origin}->{target} via edge {edge} is not an arc of the graph")]
    UnknownSidetrack { origin: u32, target: u32, edge: u32 },

    #[error("k must be at least 1")]
    ZeroK,

    #[error("malformed CSR graph: {0}")]
    MalformedCsr(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KspError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl KspError {
    /// Negative status code used by the C ABI.
    pub fn code(&self) -> i32 {
        match self {
            KspError::InvalidInput(InvalidInput::VertexOutOfRange { .. }) => -2,
            KspError::InvalidInput(InvalidInput::ZeroK) => -4,
            KspError::InvalidInput(_) => -5,
            KspError::Config(_) => -6,
            KspError::InvariantViolation(_) => -7,
        }
    }
}
