//! Static route declarations and path matching.

use std::collections::BTreeMap;
use workdesk_core::constants::routes;

/// Access prerequisites of a route. Declared once, never mutated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RouteRequirement {
    /// A logged-in user is required.
    pub requires_auth: bool,
    /// The admin role is required. Only checked once auth has passed.
    pub requires_admin: bool,
}

impl RouteRequirement {
    /// Open to everyone.
    pub const PUBLIC: Self = Self {
        requires_auth: false,
        requires_admin: false,
    };

    /// Any logged-in user.
    pub const AUTHENTICATED: Self = Self {
        requires_auth: true,
        requires_admin: false,
    };

    /// Logged-in admins only.
    pub const ADMIN: Self = Self {
        requires_auth: true,
        requires_admin: true,
    };
}

/// A navigable route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Route name, e.g. "data-view".
    pub name: String,
    /// Path pattern; `:name` segments capture a parameter.
    pub pattern: String,
    /// Access prerequisites.
    pub requirement: RouteRequirement,
}

impl Route {
    fn captures(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let pattern: Vec<&str> = segments(&self.pattern).collect();
        let actual: Vec<&str> = segments(path).collect();
        if pattern.len() != actual.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (expected, value) in pattern.into_iter().zip(actual) {
            match expected.strip_prefix(':') {
                Some(name) => {
                    params.insert(name.to_string(), value.to_string());
                }
                None if expected == value => {}
                None => return None,
            }
        }
        Some(params)
    }
}

/// A path resolved against the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Matched route.
    pub route: Route,
    /// Path as requested, query string included.
    pub path: String,
    /// Captured `:name` parameters.
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    /// Access prerequisites of the matched route.
    #[must_use]
    pub const fn requirement(&self) -> RouteRequirement {
        self.route.requirement
    }

    /// A captured parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// The set of navigable routes, matched in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Create an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// The application's routes.
    ///
    /// | Path                | Name        | Requirement     |
    /// |---------------------|-------------|-----------------|
    /// | `/login`            | login       | public          |
    /// | `/register`         | register    | public          |
    /// | `/`                 | dashboard   | authenticated   |
    /// | `/logs`             | logs        | authenticated   |
    /// | `/data/:databaseId` | data-view   | authenticated   |
    /// | `/workspace`        | workspace   | authenticated   |
    /// | `/permissions`      | permissions | admin           |
    #[must_use]
    pub fn default_routes() -> Self {
        Self::new()
            .with_route("login", routes::LOGIN, RouteRequirement::PUBLIC)
            .with_route("register", routes::REGISTER, RouteRequirement::PUBLIC)
            .with_route("dashboard", routes::DASHBOARD, RouteRequirement::AUTHENTICATED)
            .with_route("logs", routes::LOGS, RouteRequirement::AUTHENTICATED)
            .with_route("data-view", routes::DATA_VIEW, RouteRequirement::AUTHENTICATED)
            .with_route("workspace", routes::WORKSPACE, RouteRequirement::AUTHENTICATED)
            .with_route("permissions", routes::PERMISSIONS, RouteRequirement::ADMIN)
    }

    /// Add a route.
    #[must_use]
    pub fn with_route(
        mut self,
        name: impl Into<String>,
        pattern: impl Into<String>,
        requirement: RouteRequirement,
    ) -> Self {
        self.routes.push(Route {
            name: name.into(),
            pattern: pattern.into(),
            requirement,
        });
        self
    }

    /// All routes in declaration order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Resolve `path`. Query string, fragment and trailing slash are
    /// ignored for matching.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let matchable = strip_query(path);

        self.routes.iter().find_map(|route| {
            route.captures(matchable).map(|params| RouteMatch {
                route: route.clone(),
                path: path.to_string(),
                params,
            })
        })
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or_default()
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic
mod tests {
    use super::*;

    #[test]
    fn test_resolves_static_routes() {
        let table = RouteTable::default_routes();

        assert_eq!(table.resolve("/login").unwrap().route.name, "login");
        assert_eq!(table.resolve("/").unwrap().route.name, "dashboard");
        assert_eq!(
            table.resolve("/permissions").unwrap().requirement(),
            RouteRequirement::ADMIN
        );
    }

    #[test]
    fn test_captures_params() {
        let table = RouteTable::default_routes();
        let matched = table.resolve("/data/db-42").unwrap();

        assert_eq!(matched.route.name, "data-view");
        assert_eq!(matched.param("databaseId"), Some("db-42"));
        assert_eq!(matched.param("missing"), None);
    }

    #[test]
    fn test_ignores_query_and_trailing_slash() {
        let table = RouteTable::default_routes();

        let matched = table.resolve("/logs/?page=2#top").unwrap();
        assert_eq!(matched.route.name, "logs");
        assert_eq!(matched.path, "/logs/?page=2#top");

        assert_eq!(table.resolve("/?tab=recent").unwrap().route.name, "dashboard");
    }

    #[test]
    fn test_unknown_paths() {
        let table = RouteTable::default_routes();

        assert!(table.resolve("/nope").is_none());
        assert!(table.resolve("/data").is_none());
        assert!(table.resolve("/data/db-1/extra").is_none());
    }

    #[test]
    fn test_first_declared_route_wins() {
        let table = RouteTable::new()
            .with_route("new-page", "/pages/new", RouteRequirement::ADMIN)
            .with_route("page", "/pages/:id", RouteRequirement::AUTHENTICATED);

        assert_eq!(table.resolve("/pages/new").unwrap().route.name, "new-page");
        assert_eq!(table.resolve("/pages/7").unwrap().param("id"), Some("7"));
        assert_eq!(table.routes().len(), 2);
    }
}
