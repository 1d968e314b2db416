//! Error types for CloudTrack

use thiserror::Error;

/// Result type alias for CloudTrack operations
pub type Result<T> = std::result::Result<T, CloudtrackError>;

/// Main error type for the CloudTrack ingestion pipeline
#[derive(Error, Debug)]
pub enum CloudtrackError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cannot derive a cloud id from '{file_name}': {reason}")]
    IdentityExtraction { file_name: String, reason: String },

    #[error("Cannot parse field at column {column}: '{value}'")]
    FieldParse { column: usize, value: String },

    #[error("Invalid timestamp components: {0}")]
    Timestamp(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
