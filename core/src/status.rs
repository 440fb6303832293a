//! Business status codes.
//!
//! The server reports the outcome of every business operation with a
//! numeric code inside the response envelope, independent of the HTTP
//! status. The numeric values are a wire contract and must be preserved
//! exactly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Business status code carried in the `code` field of an [`Envelope`](crate::Envelope).
///
/// Known values map to named variants; anything else is kept verbatim in
/// [`StatusCode::Unknown`] so it can still be classified by band and
/// reported back without loss.
///
/// # Examples
///
/// ```
/// use workdesk_core::{StatusBand, StatusCode};
///
/// assert_eq!(StatusCode::from_code(40400), StatusCode::NotFound);
/// assert_eq!(StatusCode::from_code(40499).band(), StatusBand::Client);
/// assert_eq!(StatusCode::from_code(40499).as_i32(), 40499);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum StatusCode {
    /// The operation succeeded (`20000`).
    Success,

    /// Malformed or unacceptable request (`40000`).
    BadRequest,
    /// Missing or expired identity (`40100`).
    Unauthorized,
    /// Identity lacks the required privilege (`40300`).
    Forbidden,
    /// Requested resource does not exist (`40400`).
    NotFound,
    /// Request payload failed validation (`42200`).
    ValidationFailed,

    /// Unclassified server failure (`50000`).
    InternalError,
    /// Upstream workspace integration failed (`50001`).
    IntegrationError,
    /// Server-side storage failed (`50002`).
    StorageError,
    /// Workspace synchronisation failed (`50003`).
    SyncFailed,
    /// Server could not reach a dependency (`50004`).
    NetworkError,

    /// Any code outside the known set.
    ///
    /// Decoding only produces this for unrecognised values. A hand-built
    /// `Unknown` holding a known value still classifies by that value.
    Unknown(i32),
}

/// Coarse classification of a status code by numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusBand {
    /// Exactly the success sentinel.
    Success,
    /// `40000..=49999`
    Client,
    /// `50000..=59999`
    Server,
    /// Anything else.
    Unrecognized,
}

impl StatusCode {
    /// Raw value of [`StatusCode::Success`].
    pub const SUCCESS: i32 = 20000;
    /// Raw value of [`StatusCode::BadRequest`].
    pub const BAD_REQUEST: i32 = 40000;
    /// Raw value of [`StatusCode::Unauthorized`].
    pub const UNAUTHORIZED: i32 = 40100;
    /// Raw value of [`StatusCode::Forbidden`].
    pub const FORBIDDEN: i32 = 40300;
    /// Raw value of [`StatusCode::NotFound`].
    pub const NOT_FOUND: i32 = 40400;
    /// Raw value of [`StatusCode::ValidationFailed`].
    pub const VALIDATION_FAILED: i32 = 42200;
    /// Raw value of [`StatusCode::InternalError`].
    pub const INTERNAL_ERROR: i32 = 50000;
    /// Raw value of [`StatusCode::IntegrationError`].
    pub const INTEGRATION_ERROR: i32 = 50001;
    /// Raw value of [`StatusCode::StorageError`].
    pub const STORAGE_ERROR: i32 = 50002;
    /// Raw value of [`StatusCode::SyncFailed`].
    pub const SYNC_FAILED: i32 = 50003;
    /// Raw value of [`StatusCode::NetworkError`].
    pub const NETWORK_ERROR: i32 = 50004;

    /// Classify a raw code.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            Self::SUCCESS => Self::Success,
            Self::BAD_REQUEST => Self::BadRequest,
            Self::UNAUTHORIZED => Self::Unauthorized,
            Self::FORBIDDEN => Self::Forbidden,
            Self::NOT_FOUND => Self::NotFound,
            Self::VALIDATION_FAILED => Self::ValidationFailed,
            Self::INTERNAL_ERROR => Self::InternalError,
            Self::INTEGRATION_ERROR => Self::IntegrationError,
            Self::STORAGE_ERROR => Self::StorageError,
            Self::SYNC_FAILED => Self::SyncFailed,
            Self::NETWORK_ERROR => Self::NetworkError,
            other => Self::Unknown(other),
        }
    }

    /// The raw wire value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::Success => Self::SUCCESS,
            Self::BadRequest => Self::BAD_REQUEST,
            Self::Unauthorized => Self::UNAUTHORIZED,
            Self::Forbidden => Self::FORBIDDEN,
            Self::NotFound => Self::NOT_FOUND,
            Self::ValidationFailed => Self::VALIDATION_FAILED,
            Self::InternalError => Self::INTERNAL_ERROR,
            Self::IntegrationError => Self::INTEGRATION_ERROR,
            Self::StorageError => Self::STORAGE_ERROR,
            Self::SyncFailed => Self::SYNC_FAILED,
            Self::NetworkError => Self::NETWORK_ERROR,
            Self::Unknown(code) => code,
        }
    }

    /// Returns `true` only for the success sentinel.
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.as_i32() == Self::SUCCESS
    }

    /// Numeric band this code falls into.
    #[must_use]
    pub const fn band(self) -> StatusBand {
        match self.as_i32() {
            Self::SUCCESS => StatusBand::Success,
            40000..=49999 => StatusBand::Client,
            50000..=59999 => StatusBand::Server,
            _ => StatusBand::Unrecognized,
        }
    }

    /// Returns `true` if a response with this code must clear the local session.
    ///
    /// Covers the whole `401xx` band so that sub-codes the server may add
    /// later (expired, revoked, ...) still log the user out.
    ///
    /// # Examples
    ///
    /// ```
    /// use workdesk_core::StatusCode;
    ///
    /// assert!(StatusCode::Unauthorized.invalidates_session());
    /// assert!(StatusCode::from_code(40101).invalidates_session());
    /// assert!(!StatusCode::Forbidden.invalidates_session());
    /// ```
    #[must_use]
    pub const fn invalidates_session(self) -> bool {
        matches!(self.as_i32(), 40100..=40199)
    }

    /// Static fallback text used when the server supplies no message.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::BadRequest => "Bad request",
            Self::Unauthorized => "Session expired, please log in again",
            Self::Forbidden => "You do not have permission to perform this action",
            Self::NotFound => "The requested resource was not found",
            Self::ValidationFailed => "Validation failed",
            Self::InternalError => "Internal server error",
            Self::IntegrationError => "Workspace integration error",
            Self::StorageError => "Storage error",
            Self::SyncFailed => "Synchronisation failed",
            Self::NetworkError => "Server network error",
            Self::Unknown(_) => match self.band() {
                StatusBand::Client => "Request failed",
                StatusBand::Server => "Server error",
                StatusBand::Success | StatusBand::Unrecognized => "Unexpected response",
            },
        }
    }
}

impl From<i32> for StatusCode {
    fn from(code: i32) -> Self {
        Self::from_code(code)
    }
}

impl From<StatusCode> for i32 {
    fn from(code: StatusCode) -> Self {
        code.as_i32()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}
