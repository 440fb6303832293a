//! # Workdesk Auth
//!
//! The session store: who is logged in, with which role, persisted across
//! restarts in durable local storage.
//!
//! ## Architecture
//!
//! ```text
//! login/register ──► ApiClient ──► server
//!        │
//!        ▼
//!  SessionStore ──► SessionStorage (file / memory)
//!        │
//!        ├──► IdentitySource      (x-user-id header)
//!        └──► SessionInvalidator  (unauthorized responses)
//! ```
//!
//! The store is the only writer of the session. The request pipeline and
//! the router see it through the `workdesk_core` traits, never directly.
//!
//! ## Example
//!
//! ```no_run
//! use workdesk_auth::{FileStorage, SessionStore};
//! use workdesk_client::{ApiClient, ClientConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let session = SessionStore::init(FileStorage::open("session.json")?)?;
//! let client = ApiClient::new(ClientConfig::from_env()?)?
//!     .with_identity(session.clone())
//!     .with_invalidator(session.clone());
//!
//! let outcome = session.login(&client, "alice", "secret").await;
//! assert_eq!(outcome.success, session.is_authenticated());
//! # Ok(())
//! # }
//! ```

pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;
pub mod providers;
pub mod state;
pub mod store;

// Re-export main types for convenience
pub use error::{AuthError, Result, StorageError};
pub use providers::{FileStorage, SessionStorage};
pub use state::{LoginOutcome, Role, Session};
pub use store::{LOGIN_FAILED, REGISTRATION_FAILED, SessionStore};
