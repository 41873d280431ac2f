//! Error types for memoir-core

use thiserror::Error;

/// Result type alias using memoir-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in memoir-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error (media copy/delete/read)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog blob could not be serialized or deserialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Entry not found
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// No signed-in account (or the account state is restricted/undetermined)
    #[error("Remote account unavailable: {0}")]
    AccountUnavailable(String),

    /// Remote mirror network or service failure
    #[error("Remote service error: {0}")]
    Service(String),

    /// A batch within a larger mirror upload failed; remaining batches were aborted
    #[error("Partial batch failure: {0}")]
    PartialBatchFailure(String),

    /// External transcription call failed
    #[error("Transcription error: {0}")]
    Transcription(String),
}
