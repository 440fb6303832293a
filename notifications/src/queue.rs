//! The notification queue.

use crate::config::NotificationConfig;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use workdesk_core::{Clock, Notification, NotificationId, NotificationKind, Notifier, SystemClock};

/// A queued notification together with its pending expiry task.
struct Entry {
    notification: Notification,
    expiry: Option<AbortHandle>,
}

struct Inner {
    /// Display order: oldest first.
    entries: Mutex<VecDeque<Entry>>,
    next_id: AtomicU64,
    clock: Arc<dyn Clock>,
    config: NotificationConfig,
    /// Runtime that owns expiry timers, captured at construction.
    runtime: Option<Handle>,
    changes: watch::Sender<Vec<Notification>>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, VecDeque<Entry>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, entries: &VecDeque<Entry>) {
        self.changes
            .send_replace(entries.iter().map(|e| e.notification.clone()).collect());
    }

    fn take(&self, id: NotificationId) -> Option<Entry> {
        let mut entries = self.lock();
        let position = entries.iter().position(|e| e.notification.id == id)?;
        let entry = entries.remove(position);
        self.publish(&entries);
        entry
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let entries = self
            .entries
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);

        for entry in entries.drain(..) {
            if let Some(expiry) = entry.expiry {
                expiry.abort();
            }
        }
    }
}

/// Ordered collection of ephemeral notifications with auto-expiry.
///
/// Cloning is cheap and yields a handle to the same queue.
///
/// # Features
///
/// - Insertion order is display order; no severity reordering, no cap
/// - Ids come from a counter and never collide
/// - One independent expiry timer per notification
/// - Removal of an absent id is a no-op
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use workdesk_core::NotificationKind;
/// use workdesk_notifications::NotificationQueue;
///
/// let queue = NotificationQueue::default();
///
/// // Zero duration: sticky until removed, no runtime needed
/// let id = queue.notify_for("Sync paused", NotificationKind::Warning, Duration::ZERO);
///
/// assert_eq!(queue.snapshot()[0].message, "Sync paused");
/// assert!(queue.remove(id));
/// assert!(!queue.remove(id));
/// ```
#[derive(Clone)]
pub struct NotificationQueue {
    inner: Arc<Inner>,
}

impl NotificationQueue {
    /// Create an empty queue with the default configuration.
    #[must_use]
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self::with_config(clock, NotificationConfig::default())
    }

    /// Create an empty queue with a custom configuration.
    ///
    /// Expiry timers run on the Tokio runtime current at construction, so
    /// notifications raised later from non-runtime threads still expire.
    #[must_use]
    pub fn with_config(clock: impl Clock + 'static, config: NotificationConfig) -> Self {
        Self::build(clock, config, Handle::try_current().ok())
    }

    /// Create an empty queue whose expiry timers run on `runtime`.
    ///
    /// Use this when the queue is built outside any runtime.
    #[must_use]
    pub fn with_runtime(
        clock: impl Clock + 'static,
        config: NotificationConfig,
        runtime: Handle,
    ) -> Self {
        Self::build(clock, config, Some(runtime))
    }

    fn build(
        clock: impl Clock + 'static,
        config: NotificationConfig,
        runtime: Option<Handle>,
    ) -> Self {
        let (changes, _) = watch::channel(Vec::new());

        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(VecDeque::new()),
                next_id: AtomicU64::new(1),
                clock: Arc::new(clock),
                config,
                runtime,
                changes,
            }),
        }
    }

    /// Queue a notification with the configured default lifetime.
    ///
    /// Returns the assigned id synchronously.
    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) -> NotificationId {
        self.notify_for(message, kind, self.inner.config.default_duration)
    }

    /// Queue a notification that expires after `duration`.
    ///
    /// A zero `duration` keeps the notification until it is removed
    /// explicitly. Expiry runs on the queue's runtime, falling back to the
    /// caller's runtime. With neither, the notification is kept and a
    /// warning is logged.
    pub fn notify_for(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
        duration: Duration,
    ) -> NotificationId {
        let id = NotificationId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let notification = Notification {
            id,
            message: message.into(),
            kind,
            created_at: self.inner.clock.now(),
        };

        // Hold the lock across scheduling so the expiry task can never
        // observe the queue before the entry is in it.
        let mut entries = self.inner.lock();
        let expiry = if duration.is_zero() {
            None
        } else {
            self.schedule_expiry(id, duration)
        };
        entries.push_back(Entry {
            notification,
            expiry,
        });
        self.inner.publish(&entries);
        let queued = entries.len();
        drop(entries);

        metrics::counter!("notifications.emitted", "kind" => kind.as_str()).increment(1);
        tracing::debug!(
            notification_id = %id,
            kind = kind.as_str(),
            duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            queued,
            "Notification queued"
        );

        id
    }

    fn schedule_expiry(&self, id: NotificationId, duration: Duration) -> Option<AbortHandle> {
        let Some(runtime) = self
            .inner
            .runtime
            .clone()
            .or_else(|| Handle::try_current().ok())
        else {
            tracing::warn!(
                notification_id = %id,
                "No async runtime available, notification will not expire"
            );
            return None;
        };

        let queue: Weak<Inner> = Arc::downgrade(&self.inner);
        let task = runtime.spawn(async move {
            tokio::time::sleep(duration).await;

            if let Some(inner) = queue.upgrade() {
                if inner.take(id).is_some() {
                    tracing::trace!(notification_id = %id, "Notification expired");
                }
            }
        });

        Some(task.abort_handle())
    }

    /// Remove a notification by id, cancelling its expiry timer.
    ///
    /// Returns `true` if the notification was present. Removing an absent
    /// id (already dismissed or expired) is a no-op.
    pub fn remove(&self, id: NotificationId) -> bool {
        let Some(entry) = self.inner.take(id) else {
            return false;
        };

        if let Some(expiry) = entry.expiry {
            expiry.abort();
        }
        tracing::debug!(notification_id = %id, "Notification removed");
        true
    }

    /// Remove every notification and cancel all pending timers.
    pub fn clear(&self) {
        let mut entries = self.inner.lock();
        let count = entries.len();

        for entry in entries.drain(..) {
            if let Some(expiry) = entry.expiry {
                expiry.abort();
            }
        }
        self.inner.publish(&entries);
        drop(entries);

        tracing::debug!(count, "Notification queue cleared");
    }

    /// Current notifications in display order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .iter()
            .map(|e| e.notification.clone())
            .collect()
    }

    /// Look up a single notification.
    #[must_use]
    pub fn get(&self, id: NotificationId) -> Option<Notification> {
        self.inner
            .lock()
            .iter()
            .find(|e| e.notification.id == id)
            .map(|e| e.notification.clone())
    }

    /// Number of visible notifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if nothing is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Observe the queue. The receiver holds the latest snapshot and is
    /// marked changed after every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.inner.changes.subscribe()
    }

    /// Queue configuration.
    #[must_use]
    pub fn config(&self) -> &NotificationConfig {
        &self.inner.config
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl fmt::Debug for NotificationQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationQueue")
            .field("len", &self.len())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, message: &str, kind: NotificationKind) {
        self.notify_for(message, kind, self.inner.config.default_duration);
    }
}
