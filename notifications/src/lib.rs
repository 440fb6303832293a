//! # Workdesk Notifications
//!
//! Process-wide queue of ephemeral, user-facing messages.
//!
//! The queue is decoupled from any visual component: views observe it
//! through [`NotificationQueue::subscribe`], producers push through
//! [`NotificationQueue::notify`] or the [`Notifier`](workdesk_core::Notifier)
//! trait.
//!
//! ## Expiry
//!
//! Each notification with a positive duration gets its own Tokio task that
//! removes it once the duration elapses. The task's abort handle is stored
//! next to the entry, so an explicit [`NotificationQueue::remove`] cancels
//! the timer and dropping the queue cancels every pending timer.
//!
//! ## Example
//!
//! ```no_run
//! use workdesk_core::NotificationKind;
//! use workdesk_notifications::NotificationQueue;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let queue = NotificationQueue::default();
//! let id = queue.notify("Page saved", NotificationKind::Success);
//!
//! assert_eq!(queue.len(), 1);
//! queue.remove(id);
//! assert!(queue.is_empty());
//! # }
//! ```

pub mod config;
pub mod queue;

pub use config::NotificationConfig;
pub use queue::NotificationQueue;
