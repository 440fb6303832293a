//! Notification value types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a notification.
///
/// Allocated from a counter owned by the queue, never from the clock, so
/// two notifications created in the same instant still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visual category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Positive confirmation.
    #[default]
    Success,
    /// Failure the user should know about.
    Error,
    /// Neutral information.
    Info,
    /// Something may need attention.
    Warning,
}

impl NotificationKind {
    /// Lowercase tag, used as a log and metrics label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

/// An ephemeral, user-facing message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Queue-unique identifier.
    pub id: NotificationId,

    /// Text shown to the user.
    pub message: String,

    /// Visual category.
    pub kind: NotificationKind,

    /// When the notification was queued.
    pub created_at: DateTime<Utc>,
}
