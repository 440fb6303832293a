//! Router configuration.

use workdesk_core::constants::routes;

/// Where the guard sends rejected navigations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Target for unauthenticated users.
    ///
    /// Default: "/login"
    pub login_route: String,

    /// Target for authenticated users lacking a privilege.
    ///
    /// Default: "/"
    pub landing_route: String,
}

impl RouterConfig {
    /// Create a configuration with explicit targets.
    #[must_use]
    pub fn new(login_route: impl Into<String>, landing_route: impl Into<String>) -> Self {
        Self {
            login_route: login_route.into(),
            landing_route: landing_route.into(),
        }
    }

    /// Set login route.
    #[must_use]
    pub fn with_login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = route.into();
        self
    }

    /// Set landing route.
    #[must_use]
    pub fn with_landing_route(mut self, route: impl Into<String>) -> Self {
        self.landing_route = route.into();
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new(routes::LOGIN, routes::DASHBOARD)
    }
}
