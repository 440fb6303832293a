//! Notification queue configuration.

use std::time::Duration;
use workdesk_core::constants::DEFAULT_NOTIFICATION_DURATION;

/// Notification queue configuration.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// Lifetime applied by [`NotificationQueue::notify`](crate::NotificationQueue::notify).
    ///
    /// Default: 3 seconds
    pub default_duration: Duration,
}

impl NotificationConfig {
    /// Create a configuration with the given default lifetime.
    ///
    /// A zero duration makes notifications sticky until removed.
    #[must_use]
    pub const fn new(default_duration: Duration) -> Self {
        Self { default_duration }
    }

    /// Set the default lifetime.
    #[must_use]
    pub const fn with_default_duration(mut self, duration: Duration) -> Self {
        self.default_duration = duration;
        self
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_DURATION)
    }
}
