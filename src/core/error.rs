use thiserror::Error;

/// Custom error types for the reward pipeline
#[derive(Error, Debug)]
pub enum RewardError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Batch shape errors surfaced by the CLI layer
    #[error("Invalid batch: {0}")]
    BatchError(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),
}
