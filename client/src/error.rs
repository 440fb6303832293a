//! Error types for the request pipeline

use std::fmt;
use thiserror::Error;
use workdesk_core::StatusCode;

/// Classification of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestErrorKind {
    /// No response within the configured timeout.
    Timeout,

    /// The request never produced a response (DNS, refused connection, TLS).
    Network,

    /// The server answered with a non-2xx HTTP status.
    Http(u16),

    /// The envelope carried a non-success business code.
    ///
    /// Only produced by the strict call forms; the default pipeline resolves
    /// business failures with the envelope.
    Business(StatusCode),

    /// A 2xx body that is not a valid envelope.
    Decode,
}

impl fmt::Display for RequestErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::Network => write!(f, "NETWORK"),
            Self::Http(status) => write!(f, "HTTP_{status}"),
            Self::Business(code) => write!(f, "BUSINESS_{code}"),
            Self::Decode => write!(f, "DECODE"),
        }
    }
}

/// A classified pipeline failure.
///
/// `message` is the user-facing text that was also sent to the notifier;
/// `raw` keeps the underlying transport error or response body for logs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct RequestError {
    /// Failure class
    pub kind: RequestErrorKind,

    /// User-facing message
    pub message: String,

    /// Raw error text or response body
    pub raw: Option<String>,
}

impl RequestError {
    /// Message used for [`RequestErrorKind::Timeout`].
    pub const TIMEOUT_MESSAGE: &'static str = "Request timed out, please try again";

    /// Message used for [`RequestErrorKind::Network`].
    pub const NETWORK_MESSAGE: &'static str = "Network error, please check your connection";

    /// Message used for [`RequestErrorKind::Decode`].
    pub const DECODE_MESSAGE: &'static str = "Unexpected response from server";

    /// Create a new error.
    #[must_use]
    pub fn new(kind: RequestErrorKind, message: impl Into<String>, raw: Option<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            raw,
        }
    }

    /// Transport timeout.
    #[must_use]
    pub fn timeout(raw: impl Into<String>) -> Self {
        Self::new(RequestErrorKind::Timeout, Self::TIMEOUT_MESSAGE, Some(raw.into()))
    }

    /// Transport failure without a response.
    #[must_use]
    pub fn network(raw: impl Into<String>) -> Self {
        Self::new(RequestErrorKind::Network, Self::NETWORK_MESSAGE, Some(raw.into()))
    }

    /// Malformed response body.
    #[must_use]
    pub fn decode(raw: impl Into<String>) -> Self {
        Self::new(RequestErrorKind::Decode, Self::DECODE_MESSAGE, Some(raw.into()))
    }

    /// Returns `true` for [`RequestErrorKind::Timeout`].
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self.kind, RequestErrorKind::Timeout)
    }

    /// Returns `true` for [`RequestErrorKind::Network`].
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self.kind, RequestErrorKind::Network)
    }

    /// Business code for [`RequestErrorKind::Business`] errors.
    #[must_use]
    pub const fn business_code(&self) -> Option<StatusCode> {
        match self.kind {
            RequestErrorKind::Business(code) => Some(code),
            _ => None,
        }
    }

    /// Metrics label for this failure class.
    #[must_use]
    pub const fn outcome_label(&self) -> &'static str {
        match self.kind {
            RequestErrorKind::Timeout => "timeout",
            RequestErrorKind::Network => "network",
            RequestErrorKind::Http(_) => "http_error",
            RequestErrorKind::Business(_) => "business_error",
            RequestErrorKind::Decode => "decode_error",
        }
    }
}

/// Errors raised while building the client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment value could not be parsed.
    #[error("Invalid value for {var}: {value}")]
    Invalid {
        /// Variable name
        var: String,
        /// Offending value
        value: String,
    },

    /// The underlying HTTP client could not be built.
    #[error("HTTP client initialisation failed: {0}")]
    HttpClient(String),
}
