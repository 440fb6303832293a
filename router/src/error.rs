//! Navigation errors.

use thiserror::Error;

/// Navigation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// No route matches the path.
    #[error("No route matches {0}")]
    NotFound(String),

    /// A redirect target redirected again.
    #[error("Redirect loop: {from} redirected to {to}, which redirected again")]
    RedirectLoop {
        /// Path originally requested
        from: String,
        /// Redirect target that was itself rejected
        to: String,
    },
}
