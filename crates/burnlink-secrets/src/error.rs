//! Error types for share operations.
//!
//! No variant ever carries a share id, key material, or plaintext: these
//! errors end up in logs and HTTP responses.

use thiserror::Error;

/// Errors that can occur during share operations.
#[derive(Debug, Error)]
pub enum ShareError {
    /// Never existed, already consumed, or expired. Callers cannot tell which.
    #[error("Share not found")]
    NotFound,

    /// The id is already taken. Recovered inside the service by drawing a new id.
    #[error("Share id already exists")]
    AlreadyExists,

    /// Authentication tag mismatch at decrypt time.
    #[error("Share failed integrity check")]
    IntegrityError,

    /// The OS random source could not be read. Creating a share must abort.
    #[error("Secure randomness unavailable")]
    EntropyUnavailable,

    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for ShareError {
    fn from(e: sqlx::Error) -> Self {
        ShareError::Storage(e.to_string())
    }
}

/// Convenience result alias for share operations.
pub type Result<T> = std::result::Result<T, ShareError>;
