//! # Workdesk Router
//!
//! Static route declarations and the session-aware navigation guard.
//!
//! Every transition is evaluated synchronously against the cached session:
//!
//! 1. Route requires auth and nobody is logged in → redirect to login
//! 2. Route requires admin and the role is not admin → redirect to landing
//! 3. Otherwise proceed
//!
//! [`NavigationGuard::evaluate`] is the pure decision; [`Navigator`] keeps
//! the current location, runs extra before-each hooks, and reacts to
//! unauthorized responses by sending the user back to login.

pub mod config;
pub mod error;
pub mod guard;
pub mod navigator;
pub mod route;

// Re-export main types for convenience
pub use config::RouterConfig;
pub use error::RouteError;
pub use guard::{GuardOutcome, NavigationGuard};
pub use navigator::{BeforeEach, Navigation, Navigator, Transition};
pub use route::{Route, RouteMatch, RouteRequirement, RouteTable};
