//! The business response envelope.

use crate::status::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};

/// Structured body returned by the server for every business operation.
///
/// A transport-level success (HTTP 200) can still carry a failing `code`;
/// that case is a first-class failure path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = serde_json::Value> {
    /// Business status code.
    pub code: StatusCode,

    /// Human-readable message supplied by the server (may be empty).
    /// Missing and `null` both decode as an empty string.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,

    /// Operation payload. Missing and `null` both decode as `None`.
    pub data: Option<T>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A non-success envelope converted into an error value.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessFailure<T = serde_json::Value> {
    /// The failing code.
    pub code: StatusCode,
    /// Message shown to the user.
    pub message: String,
    /// Any payload the server attached to the failure.
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Create a success envelope carrying `data`.
    #[must_use]
    pub fn success(data: T) -> Self {
        Self {
            code: StatusCode::Success,
            message: String::new(),
            data: Some(data),
        }
    }

    /// Create a failure envelope with no payload.
    #[must_use]
    pub fn failure(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Returns `true` if the code is the success sentinel.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code.is_success()
    }

    /// Message to show the user: the server's text, or the code's fallback.
    #[must_use]
    pub fn user_message(&self) -> &str {
        let trimmed = self.message.trim();
        if trimmed.is_empty() {
            self.code.default_message()
        } else {
            trimmed
        }
    }

    /// Convert into a `Result`, rejecting any non-success code.
    ///
    /// # Errors
    ///
    /// Returns [`BusinessFailure`] when `code` is not [`StatusCode::Success`].
    pub fn into_result(self) -> Result<Option<T>, BusinessFailure<T>> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(BusinessFailure {
                code: self.code,
                message: self.user_message().to_string(),
                data: self.data,
            })
        }
    }
}
