//! # Workdesk Testing
//!
//! Testing utilities and test doubles for the Workdesk client.
//!
//! This crate provides:
//! - Mock implementations of the `workdesk_core::environment` traits
//! - Envelope body fixtures for stubbing the backend
//! - A one-line tracing initialiser for tests
//!
//! ## Example
//!
//! ```
//! use workdesk_core::{NotificationKind, Notifier};
//! use workdesk_testing::RecordingNotifier;
//!
//! let notifier = RecordingNotifier::new();
//! notifier.notify("Request timed out", NotificationKind::Error);
//!
//! assert_eq!(notifier.messages(), vec!["Request timed out".to_string()]);
//! ```

use chrono::{DateTime, Utc};
use workdesk_core::environment::Clock;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex, PoisonError};
    use workdesk_core::{IdentitySource, NotificationKind, Notifier, SessionInvalidator};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use workdesk_testing::mocks::FixedClock;
    /// use workdesk_core::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::from_timestamp(1_735_689_600, 0).unwrap_or_default())
    }

    /// Notifier that records every notification it receives.
    ///
    /// Clones share the same record.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingNotifier {
        received: Arc<Mutex<Vec<(String, NotificationKind)>>>,
    }

    impl RecordingNotifier {
        /// Create an empty recorder.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Every `(message, kind)` pair, oldest first.
        #[must_use]
        pub fn received(&self) -> Vec<(String, NotificationKind)> {
            self.received
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Messages only, oldest first.
        #[must_use]
        pub fn messages(&self) -> Vec<String> {
            self.received().into_iter().map(|(m, _)| m).collect()
        }

        /// Number of notifications received.
        #[must_use]
        pub fn count(&self) -> usize {
            self.received
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str, kind: NotificationKind) {
            self.received
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((message.to_string(), kind));
        }
    }

    /// Invalidator that counts how often it was triggered.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingInvalidator {
        calls: Arc<AtomicUsize>,
        reasons: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingInvalidator {
        /// Create a recorder with no calls.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of invalidations.
        #[must_use]
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Reasons passed to each invalidation, oldest first.
        #[must_use]
        pub fn reasons(&self) -> Vec<String> {
            self.reasons
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl SessionInvalidator for RecordingInvalidator {
        fn invalidate(&self, reason: &str) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reasons
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(reason.to_string());
        }
    }

    /// Identity source returning a fixed user id.
    #[derive(Debug, Clone, Default)]
    pub struct StaticIdentity(pub Option<String>);

    impl StaticIdentity {
        /// A logged-in identity.
        #[must_use]
        pub fn user(id: impl Into<String>) -> Self {
            Self(Some(id.into()))
        }

        /// A logged-out identity.
        #[must_use]
        pub const fn anonymous() -> Self {
            Self(None)
        }
    }

    impl IdentitySource for StaticIdentity {
        fn user_id(&self) -> Option<String> {
            self.0.clone()
        }
    }
}

/// Envelope body fixtures for stubbing the backend.
pub mod fixtures {
    use serde::Serialize;
    use serde_json::{Value, json};
    use workdesk_core::StatusCode;

    /// Body of a successful response carrying `data`.
    #[must_use]
    pub fn success_body(data: impl Serialize) -> Value {
        json!({
            "code": StatusCode::SUCCESS,
            "message": "ok",
            "data": data,
        })
    }

    /// Body of a failed business response.
    #[must_use]
    pub fn failure_body(code: i32, message: &str) -> Value {
        json!({
            "code": code,
            "message": message,
            "data": null,
        })
    }

    /// Body returned by `/login` for a successful login.
    #[must_use]
    pub fn login_body(id: &str, role: &str, avatar: Option<&str>) -> Value {
        success_body(json!({
            "success": true,
            "user": {
                "id": id,
                "role": role,
                "avatar": avatar,
            }
        }))
    }
}

/// Install a test-friendly tracing subscriber.
///
/// Honours `RUST_LOG`; safe to call from many tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use fixtures::{failure_body, login_body, success_body};
pub use mocks::{
    FixedClock, RecordingInvalidator, RecordingNotifier, StaticIdentity, test_clock,
};

#[cfg(test)]
mod tests {
    use super::*;
    use workdesk_core::{NotificationKind, Notifier, SessionInvalidator};

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
        assert_eq!(time1.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_recording_notifier_shares_record_between_clones() {
        let notifier = RecordingNotifier::new();
        let clone = notifier.clone();

        clone.notify("hello", NotificationKind::Info);

        assert_eq!(notifier.count(), 1);
        assert_eq!(
            notifier.received(),
            vec![("hello".to_string(), NotificationKind::Info)]
        );
    }

    #[test]
    fn test_recording_invalidator() {
        let invalidator = RecordingInvalidator::new();
        invalidator.invalidate("expired");
        invalidator.invalidate("expired again");

        assert_eq!(invalidator.calls(), 2);
        assert_eq!(invalidator.reasons()[1], "expired again");
    }

    #[test]
    fn test_failure_body_shape() {
        let body = failure_body(40100, "session expired");
        assert_eq!(body["code"], 40100);
        assert_eq!(body["message"], "session expired");
    }
}
