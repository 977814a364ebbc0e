use thiserror::Error;

/// Tracker error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UkfError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Augmented covariance is not positive definite")]
    NotPositiveDefinite,

    #[error("Innovation covariance is singular")]
    SingularInnovation,

    #[error("Degenerate geometry: range {range:.3e} below guard {min_range:.3e}")]
    DegenerateGeometry { range: f64, min_range: f64 },

    #[error("Measurement dimension mismatch: expected {expected} values, got {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Timestamp difference overflows: previous {previous} us, current {current} us")]
    TimestampOverflow { previous: i64, current: i64 },

    #[error("Evaluation error: {0}")]
    Evaluation(String),
}

/// Result type for filter operations
pub type UkfResult<T> = Result<T, UkfError>;

/// Errors raised while reading a measurement log
#[derive(Error, Debug)]
pub enum SensorLogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record on line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}
