use thiserror::Error;

/// Top-level error type for Stride.
#[derive(Debug, Error)]
pub enum StrideError {
    /// Rejected input: bad date, empty task id, threshold below 1.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown user or unregistered messaging address.
    #[error("not found: {0}")]
    NotFound(String),

    /// Underlying persistence failure, surfaced untouched.
    #[error("storage error: {0}")]
    Storage(String),

    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
