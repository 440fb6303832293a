//! Dependency injection traits.
//!
//! The pipeline, session store and router never look up their collaborators
//! at runtime. Each capability is a trait handed over at construction time,
//! with a production implementation and a test double.

use crate::notification::NotificationKind;
use chrono::{DateTime, Utc};

/// Clock trait - abstracts time operations for testability
///
/// # Examples
///
/// ```
/// use workdesk_core::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let before = clock.now();
/// assert!(clock.now() >= before);
/// ```
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Sink for user-facing feedback.
///
/// The request pipeline reports every classified failure through this
/// trait. Implementations must not panic or block.
pub trait Notifier: Send + Sync {
    /// Surface `message` to the user.
    fn notify(&self, message: &str, kind: NotificationKind);
}

/// Notifier that only writes a log line.
///
/// This is the pipeline's default until a real notification queue is wired
/// in, so a network call never fails because of startup order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Error | NotificationKind::Warning => {
                tracing::warn!(kind = kind.as_str(), text = message, "notification (no queue attached)");
            }
            NotificationKind::Success | NotificationKind::Info => {
                tracing::info!(kind = kind.as_str(), text = message, "notification (no queue attached)");
            }
        }
    }
}

/// Notifier that discards everything. Used for background telemetry.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _message: &str, _kind: NotificationKind) {}
}

/// Read access to the locally cached identity.
pub trait IdentitySource: Send + Sync {
    /// The current user id, if logged in.
    fn user_id(&self) -> Option<String>;
}

/// Reaction to an unauthorized response.
///
/// Implementations must be idempotent: several unauthorized responses may
/// arrive back to back for the same stale session.
pub trait SessionInvalidator: Send + Sync {
    /// Drop the local session.
    fn invalidate(&self, reason: &str);
}
