//! The navigation guard.

use crate::config::RouterConfig;
use crate::route::RouteRequirement;
use std::fmt;
use workdesk_auth::Session;

/// Result of evaluating a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardOutcome {
    /// Allow the transition unmodified.
    Proceed,
    /// Abort and replace with the login route.
    RedirectToLogin,
    /// Abort and replace with the authenticated landing route.
    RedirectToLanding,
}

impl GuardOutcome {
    /// Metrics/log label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Proceed => "proceed",
            Self::RedirectToLogin => "login",
            Self::RedirectToLanding => "landing",
        }
    }

    /// Whether the transition is aborted.
    #[must_use]
    pub const fn is_redirect(self) -> bool {
        !matches!(self, Self::Proceed)
    }
}

impl fmt::Display for GuardOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gatekeeper evaluated before every route transition.
///
/// The guard never calls the server. It trusts the cached session, trading
/// staleness for an instant decision; a stale session is corrected by the
/// first unauthorized response.
#[derive(Debug, Clone, Default)]
pub struct NavigationGuard {
    config: RouterConfig,
}

impl NavigationGuard {
    /// Create a guard redirecting to the configured targets.
    #[must_use]
    pub const fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    /// Redirect targets.
    #[must_use]
    pub const fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Decide a transition. Pure: depends on nothing but its arguments.
    ///
    /// The auth check runs first, so an anonymous user hitting an admin-only
    /// route is sent to login, not to the landing page.
    ///
    /// # Examples
    ///
    /// ```
    /// use workdesk_auth::{Role, Session};
    /// use workdesk_router::{GuardOutcome, NavigationGuard, RouteRequirement};
    ///
    /// let member = Session::authenticated("u-1", Some(Role::Member), None);
    ///
    /// assert_eq!(
    ///     NavigationGuard::evaluate(&RouteRequirement::ADMIN, &Session::anonymous()),
    ///     GuardOutcome::RedirectToLogin
    /// );
    /// assert_eq!(
    ///     NavigationGuard::evaluate(&RouteRequirement::ADMIN, &member),
    ///     GuardOutcome::RedirectToLanding
    /// );
    /// ```
    #[must_use]
    pub fn evaluate(requirement: &RouteRequirement, session: &Session) -> GuardOutcome {
        if requirement.requires_auth && !session.is_authenticated() {
            GuardOutcome::RedirectToLogin
        } else if requirement.requires_admin && !session.is_admin() {
            GuardOutcome::RedirectToLanding
        } else {
            GuardOutcome::Proceed
        }
    }

    /// Path a redirect outcome leads to.
    #[must_use]
    pub fn target(&self, outcome: GuardOutcome) -> Option<&str> {
        match outcome {
            GuardOutcome::Proceed => None,
            GuardOutcome::RedirectToLogin => Some(&self.config.login_route),
            GuardOutcome::RedirectToLanding => Some(&self.config.landing_route),
        }
    }
}
