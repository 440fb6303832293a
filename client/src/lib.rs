//! # Workdesk Client
//!
//! The request pipeline every application → server call goes through.
//!
//! ## Example
//!
//! ```no_run
//! use workdesk_client::{ApiClient, ClientConfig};
//! use workdesk_core::StatusCode;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create client from WORKDESK_API_URL / WORKDESK_TIMEOUT_SECS
//!     let client = ApiClient::new(ClientConfig::from_env()?)?;
//!
//!     // Business failures resolve; the user has already been notified
//!     let envelope = client.get::<serde_json::Value>("/pages").await?;
//!     if envelope.code == StatusCode::Success {
//!         println!("Pages: {:?}", envelope.data);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - Fixed per-request timeout and base path
//! - Classification into timeout / network / HTTP / business failures
//! - Exactly one user notification per failed call
//! - Session invalidation on unauthorized responses
//! - Optional `x-user-id` header from the local identity
//! - Best-effort telemetry reporter

pub mod client;
pub mod config;
pub mod error;
pub mod monitoring;

// Re-export main types for convenience
pub use client::{ApiClient, RequestOptions};
pub use config::ClientConfig;
pub use error::{ConfigError, RequestError, RequestErrorKind};
pub use monitoring::{MonitoringKind, MonitoringReporter, PageLoadMetrics};
pub use reqwest::Method;
