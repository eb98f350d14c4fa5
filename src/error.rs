use thiserror::Error;

/// Result type for placement operations
pub type Result<T> = std::result::Result<T, PlacementError>;

/// Errors raised while validating, modelling, solving, or reporting a placement run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    /// A record has the wrong shape or a non-integer rank/scale value
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// A scale indicator or scaling setting is out of range
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Aggregate demand exceeds aggregate supply in a dimension
    #[error("Capacity error: {0}")]
    Capacity(String),

    /// The backend proved infeasibility or failed while solving
    #[error("No feasible assignment: {0}")]
    NoFeasibleAssignment(String),

    /// Solved values violate the model invariants
    #[error("Model extraction error: {0}")]
    ModelExtraction(String),

    /// A solver backend could not be created or configured
    #[error("Solver backend error: {0}")]
    Backend(String),

    /// Reading input files or writing results failed
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for PlacementError {
    fn from(e: std::io::Error) -> Self {
        PlacementError::Io(e.to_string())
    }
}
