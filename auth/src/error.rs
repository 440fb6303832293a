//! Error types for session operations.

use thiserror::Error;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Durable storage failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error: {0}")]
    Io(String),

    /// The backing file exists but does not hold a key/value map.
    #[error("Storage is corrupt: {0}")]
    Corrupt(String),
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

/// Session store failures.
///
/// Login and registration report their outcome through
/// [`LoginOutcome`](crate::LoginOutcome) instead, since every request
/// failure has already been shown to the user by the pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Durable storage could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The server reported success but the payload carried no usable user.
    #[error("Malformed login response: {0}")]
    MalformedResponse(String),
}

impl AuthError {
    /// Returns `true` if this error comes from local storage rather than
    /// the server.
    ///
    /// # Examples
    ///
    /// ```
    /// # use workdesk_auth::{AuthError, StorageError};
    /// assert!(AuthError::Storage(StorageError::Io("disk full".into())).is_storage());
    /// assert!(!AuthError::MalformedResponse("no user".into()).is_storage());
    /// ```
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}
