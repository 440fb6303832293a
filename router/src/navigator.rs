//! Navigation state and before-each hooks.

use crate::config::RouterConfig;
use crate::error::RouteError;
use crate::guard::NavigationGuard;
use crate::route::{RouteMatch, RouteTable};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use workdesk_auth::{Session, SessionStore};
use workdesk_core::SessionInvalidator;

/// Decision of a before-each hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Let the next hook decide, or commit if this was the last one.
    Proceed,
    /// Abort and replace with this path.
    Redirect(String),
}

/// Hook run before every transition, after the guard.
pub type BeforeEach = dyn Fn(&RouteMatch, &Session) -> Transition + Send + Sync;

/// A committed transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Final path, as requested or as redirected to.
    pub path: String,
    /// Name of the final route.
    pub route: String,
    /// Parameters captured from the final path.
    pub params: BTreeMap<String, String>,
    /// The path originally requested, when a hook redirected.
    pub redirected_from: Option<String>,
}

impl Navigation {
    fn commit(matched: RouteMatch, redirected_from: Option<String>) -> Self {
        Self {
            path: matched.path,
            route: matched.route.name,
            params: matched.params,
            redirected_from,
        }
    }

    /// Whether a hook replaced the requested path.
    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        self.redirected_from.is_some()
    }
}

struct Inner {
    table: RouteTable,
    guard: NavigationGuard,
    session: SessionStore,
    hooks: RwLock<Vec<Arc<BeforeEach>>>,
    current: RwLock<Option<Navigation>>,
}

/// Client-side navigation.
///
/// Every transition resolves the path, runs the guard and then each
/// registered hook in order, and commits the final destination. A redirect
/// target is evaluated once; if it is rejected again the navigation fails
/// with [`RouteError::RedirectLoop`] instead of bouncing forever.
///
/// Cloning is cheap; clones share location and hooks.
///
/// # Example
///
/// ```
/// use workdesk_auth::SessionStore;
/// use workdesk_auth::mocks::MemoryStorage;
/// use workdesk_router::Navigator;
///
/// let session = SessionStore::init(MemoryStorage::new())?;
/// let navigator = Navigator::new(session);
///
/// let navigation = navigator.navigate("/workspace")?;
/// assert_eq!(navigation.path, "/login");
/// assert_eq!(navigation.redirected_from.as_deref(), Some("/workspace"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct Navigator {
    inner: Arc<Inner>,
}

impl Navigator {
    /// Create a navigator over the default routes and redirect targets.
    #[must_use]
    pub fn new(session: SessionStore) -> Self {
        Self::with_table(session, RouteTable::default_routes(), RouterConfig::default())
    }

    /// Create a navigator over a custom route table.
    #[must_use]
    pub fn with_table(session: SessionStore, table: RouteTable, config: RouterConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                table,
                guard: NavigationGuard::new(config),
                session,
                hooks: RwLock::new(Vec::new()),
                current: RwLock::new(None),
            }),
        }
    }

    /// Register a hook run after the guard on every transition.
    pub fn before_each<F>(&self, hook: F)
    where
        F: Fn(&RouteMatch, &Session) -> Transition + Send + Sync + 'static,
    {
        self.inner
            .hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(hook));
    }

    /// The committed location, if any navigation happened yet.
    #[must_use]
    pub fn current(&self) -> Option<Navigation> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Route table.
    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.inner.table
    }

    /// Navigate to `path`.
    ///
    /// # Errors
    ///
    /// Returns `RouteError::NotFound` if `path` or a redirect target matches
    /// no route, and `RouteError::RedirectLoop` if a redirect target is
    /// rejected as well. The current location is unchanged on error.
    pub fn navigate(&self, path: &str) -> Result<Navigation, RouteError> {
        let requested = self.resolve(path)?;
        let session = self.inner.session.snapshot();

        let navigation = match self.run_hooks(&requested, &session) {
            Transition::Proceed => Navigation::commit(requested, None),
            Transition::Redirect(target) => {
                let redirected = self.resolve(&target)?;
                match self.run_hooks(&redirected, &session) {
                    Transition::Proceed => Navigation::commit(redirected, Some(path.to_string())),
                    Transition::Redirect(_) => {
                        tracing::warn!(from = path, to = %target, "Redirect target rejected");
                        return Err(RouteError::RedirectLoop {
                            from: path.to_string(),
                            to: target,
                        });
                    }
                }
            }
        };

        tracing::debug!(
            path = %navigation.path,
            route = %navigation.route,
            redirected_from = navigation.redirected_from.as_deref(),
            "Navigated"
        );

        *self
            .inner
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(navigation.clone());

        Ok(navigation)
    }

    fn resolve(&self, path: &str) -> Result<RouteMatch, RouteError> {
        self.inner
            .table
            .resolve(path)
            .ok_or_else(|| RouteError::NotFound(path.to_string()))
    }

    fn run_hooks(&self, target: &RouteMatch, session: &Session) -> Transition {
        let outcome = NavigationGuard::evaluate(&target.requirement(), session);
        if let Some(redirect) = self.inner.guard.target(outcome) {
            metrics::counter!("router.guard.redirects", "outcome" => outcome.as_str()).increment(1);
            tracing::debug!(path = %target.path, outcome = %outcome, "Guard redirected");
            return Transition::Redirect(redirect.to_string());
        }

        // Snapshot so a hook may register further hooks without deadlocking
        let hooks: Vec<Arc<BeforeEach>> = self
            .inner
            .hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        hooks
            .iter()
            .map(|hook| hook(target, session))
            .find(|transition| *transition != Transition::Proceed)
            .unwrap_or(Transition::Proceed)
    }

    fn redirect_to_login(&self) {
        let login = &self.inner.guard.config().login_route;

        let already_there = self
            .current()
            .is_some_and(|current| current.route == self.route_name(login));
        if already_there {
            return;
        }

        match self.navigate(login) {
            Ok(_) => tracing::info!("Redirected to login after session invalidation"),
            Err(error) => tracing::warn!(error = %error, "Could not redirect to login"),
        }
    }

    fn route_name(&self, path: &str) -> String {
        self.inner
            .table
            .resolve(path)
            .map(|matched| matched.route.name)
            .unwrap_or_default()
    }
}

impl SessionInvalidator for Navigator {
    fn invalidate(&self, reason: &str) {
        self.inner.session.invalidate(reason);
        self.redirect_to_login();
    }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("routes", &self.inner.table.routes().len())
            .field("current", &self.current())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic
mod tests {
    use super::*;
    use crate::route::RouteRequirement;
    use workdesk_auth::mocks::MemoryStorage;

    fn navigator(entries: &[(&'static str, &'static str)]) -> Navigator {
        let storage = MemoryStorage::with_entries(entries.iter().copied());
        Navigator::new(SessionStore::init(storage).unwrap())
    }

    #[test]
    fn test_public_route_for_anonymous_user() {
        let nav = navigator(&[]);
        let navigation = nav.navigate("/register").unwrap();

        assert_eq!(navigation.route, "register");
        assert!(!navigation.is_redirect());
        assert_eq!(nav.current(), Some(navigation));
    }

    #[test]
    fn test_anonymous_user_redirected_to_login() {
        let nav = navigator(&[]);
        let navigation = nav.navigate("/data/db-1").unwrap();

        assert_eq!(navigation.path, "/login");
        assert_eq!(navigation.route, "login");
        assert_eq!(navigation.redirected_from.as_deref(), Some("/data/db-1"));
    }

    #[test]
    fn test_params_captured_on_success() {
        let nav = navigator(&[("userId", "u-1")]);
        let navigation = nav.navigate("/data/db-1?view=table").unwrap();

        assert_eq!(navigation.route, "data-view");
        assert_eq!(navigation.params.get("databaseId").map(String::as_str), Some("db-1"));
    }

    #[test]
    fn test_unknown_path_keeps_location() {
        let nav = navigator(&[("userId", "u-1")]);
        nav.navigate("/logs").unwrap();

        let error = nav.navigate("/missing").unwrap_err();

        assert_eq!(error, RouteError::NotFound("/missing".to_string()));
        assert_eq!(nav.current().unwrap().route, "logs");
    }

    #[test]
    fn test_hook_runs_after_guard() {
        let nav = navigator(&[("userId", "u-1")]);
        nav.before_each(|target, _| {
            if target.route.name == "logs" {
                Transition::Redirect("/workspace".to_string())
            } else {
                Transition::Proceed
            }
        });

        let navigation = nav.navigate("/logs").unwrap();
        assert_eq!(navigation.route, "workspace");
        assert_eq!(navigation.redirected_from.as_deref(), Some("/logs"));

        // The guard decides first for anonymous users
        nav.invalidate("test");
        assert_eq!(nav.navigate("/logs").unwrap().route, "login");
    }

    #[test]
    fn test_rejected_redirect_target_is_a_loop() {
        let table = RouteTable::new()
            .with_route("login", "/login", RouteRequirement::AUTHENTICATED)
            .with_route("home", "/", RouteRequirement::AUTHENTICATED);
        let session = SessionStore::init(MemoryStorage::new()).unwrap();
        let nav = Navigator::with_table(session, table, RouterConfig::default());

        let error = nav.navigate("/").unwrap_err();

        assert_eq!(
            error,
            RouteError::RedirectLoop {
                from: "/".to_string(),
                to: "/login".to_string(),
            }
        );
        assert_eq!(nav.current(), None);
    }

    #[test]
    fn test_invalidate_clears_session_and_redirects_once() {
        let nav = navigator(&[("userId", "u-1"), ("role", "admin")]);
        nav.navigate("/permissions").unwrap();

        nav.invalidate("session expired");
        nav.invalidate("session expired");

        let current = nav.current().unwrap();
        assert_eq!(current.route, "login");
        assert!(!current.is_redirect());
        assert!(!nav.inner.session.is_authenticated());
    }
}
