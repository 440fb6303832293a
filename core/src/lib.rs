//! # Workdesk Core
//!
//! Shared types and dependency traits for the Workdesk client.
//!
//! Every other crate in the workspace builds on the vocabulary defined here:
//!
//! - **Status codes**: the business status taxonomy returned by the server
//! - **Envelope**: the `{code, message, data}` body wrapping every response
//! - **Notifications**: ephemeral user-facing message values
//! - **Environment**: capabilities injected into the pipeline, session and router
//!
//! ## Control Flow
//!
//! ```text
//! view → SessionStore action → ApiClient → (Envelope | RequestError)
//!                                  │
//!                                  ├─→ Notifier (user-facing feedback)
//!                                  └─→ SessionInvalidator (unauthorized)
//!
//! navigation → Navigator → NavigationGuard(route, session snapshot)
//! ```
//!
//! ## Example
//!
//! ```
//! use workdesk_core::{Envelope, StatusCode};
//!
//! let envelope: Envelope = serde_json::from_str(
//!     r#"{"code": 40100, "message": "session expired", "data": null}"#,
//! ).unwrap();
//!
//! assert_eq!(envelope.code, StatusCode::Unauthorized);
//! assert!(envelope.code.invalidates_session());
//! assert_eq!(envelope.user_message(), "session expired");
//! ```

pub mod constants;
pub mod envelope;
pub mod environment;
pub mod notification;
pub mod status;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use envelope::{BusinessFailure, Envelope};
pub use environment::{
    Clock, IdentitySource, LogNotifier, Notifier, SessionInvalidator, SilentNotifier, SystemClock,
};
pub use notification::{Notification, NotificationId, NotificationKind};
pub use status::{StatusBand, StatusCode};
