//! The session store.

use crate::error::{AuthError, Result};
use crate::providers::SessionStorage;
use crate::state::{LoginOutcome, Role, Session};
use serde::Deserialize;
use serde_json::{Value, json};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::watch;
use workdesk_client::{ApiClient, RequestError, RequestErrorKind};
use workdesk_core::constants::storage_keys;
use workdesk_core::{Envelope, IdentitySource, SessionInvalidator};

/// Login endpoint path.
pub const LOGIN_PATH: &str = "/login";

/// Registration endpoint path.
pub const REGISTER_PATH: &str = "/register";

/// Login failure message when the server gives none.
pub const LOGIN_FAILED: &str = "Login failed";

/// Registration failure message when the server gives none.
pub const REGISTRATION_FAILED: &str = "Registration failed";

#[derive(Debug, Deserialize)]
struct AuthPayload {
    #[serde(default = "accepted_by_default")]
    success: bool,
    user: Option<UserPayload>,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: Value,
    role: Option<String>,
    avatar: Option<String>,
}

const fn accepted_by_default() -> bool {
    true
}

struct Inner {
    storage: Arc<dyn SessionStorage>,
    session: RwLock<Session>,
    changes: watch::Sender<Session>,
}

/// Single source of truth for "who is logged in".
///
/// The in-memory session mirrors durable storage: every mutation is written
/// through before the call returns, and [`SessionStore::init`] rebuilds the
/// same session after a restart without a network call.
///
/// Cloning is cheap; clones share the same session.
///
/// # Example
///
/// ```
/// use workdesk_auth::SessionStore;
/// use workdesk_auth::mocks::MemoryStorage;
///
/// let storage = MemoryStorage::with_entries([("userId", "u-1"), ("role", "admin")]);
/// let store = SessionStore::init(storage)?;
///
/// assert!(store.is_authenticated());
/// assert!(store.is_admin());
///
/// store.logout();
/// assert!(!store.is_authenticated());
/// # Ok::<(), workdesk_auth::AuthError>(())
/// ```
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Rebuild the session from `storage`.
    ///
    /// Role and avatar are ignored when no user id is stored.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if storage cannot be read.
    pub fn init(storage: impl SessionStorage + 'static) -> Result<Self> {
        let storage: Arc<dyn SessionStorage> = Arc::new(storage);

        let session = match storage.get(storage_keys::USER_ID)? {
            Some(user_id) => Session::authenticated(
                user_id,
                storage.get(storage_keys::ROLE)?.map(Role::from),
                storage.get(storage_keys::AVATAR)?,
            ),
            None => Session::anonymous(),
        };

        tracing::debug!(
            authenticated = session.is_authenticated(),
            "Session restored from storage"
        );

        let (changes, _) = watch::channel(session.clone());

        Ok(Self {
            inner: Arc::new(Inner {
                storage,
                session: RwLock::new(session),
                changes,
            }),
        })
    }

    /// Current session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.inner
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a user is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_authenticated()
    }

    /// Whether the logged-in user holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.inner
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_admin()
    }

    /// Watch session changes.
    ///
    /// The receiver starts at the current session and sees every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.changes.subscribe()
    }

    /// Log in with username and password.
    ///
    /// On success the session is replaced and written to storage. On failure
    /// the session is untouched and the outcome carries the server message,
    /// or [`LOGIN_FAILED`].
    #[tracing::instrument(skip(self, client, password), name = "session_login")]
    pub async fn login(&self, client: &ApiClient, username: &str, password: &str) -> LoginOutcome {
        let body = json!({ "username": username, "password": password });

        let envelope = match client.post::<Value, _>(LOGIN_PATH, &body).await {
            Ok(envelope) => envelope,
            Err(error) => {
                metrics::counter!("auth.logins.total", "outcome" => "error").increment(1);
                return LoginOutcome::rejected(server_message(&error).unwrap_or(LOGIN_FAILED));
            }
        };

        if !envelope.is_success() {
            metrics::counter!("auth.logins.total", "outcome" => "rejected").increment(1);
            return LoginOutcome::rejected(non_empty(&envelope.message).unwrap_or(LOGIN_FAILED));
        }

        let session = match session_from(envelope.data) {
            Ok(Some(session)) => session,
            Ok(None) => {
                metrics::counter!("auth.logins.total", "outcome" => "rejected").increment(1);
                return LoginOutcome::rejected(non_empty(&envelope.message).unwrap_or(LOGIN_FAILED));
            }
            Err(error) => {
                metrics::counter!("auth.logins.total", "outcome" => "error").increment(1);
                tracing::warn!(error = %error, "Login response rejected");
                return LoginOutcome::rejected(LOGIN_FAILED);
            }
        };

        tracing::info!(user_id = session.user_id(), role = ?session.role(), "Logged in");
        metrics::counter!("auth.logins.total", "outcome" => "success").increment(1);
        self.replace(session);

        LoginOutcome::accepted(envelope.message)
    }

    /// Register a new account.
    ///
    /// Registration never logs the user in.
    #[tracing::instrument(skip(self, client, password), name = "session_register")]
    pub async fn register(
        &self,
        client: &ApiClient,
        username: &str,
        password: &str,
    ) -> LoginOutcome {
        let body = json!({ "username": username, "password": password });

        match client.post::<Value, _>(REGISTER_PATH, &body).await {
            Ok(envelope) => {
                let accepted = envelope.is_success()
                    && envelope
                        .data
                        .as_ref()
                        .and_then(|data| data.get("success"))
                        .and_then(Value::as_bool)
                        .unwrap_or(true);

                if accepted {
                    LoginOutcome::accepted(envelope.message)
                } else {
                    LoginOutcome::rejected(
                        non_empty(&envelope.message).unwrap_or(REGISTRATION_FAILED),
                    )
                }
            }
            Err(error) => {
                LoginOutcome::rejected(server_message(&error).unwrap_or(REGISTRATION_FAILED))
            }
        }
    }

    /// Log out. Returns `false` if nobody was logged in.
    ///
    /// Idempotent: a second call, or a call racing an unauthorized
    /// response's invalidation, neither fails nor touches storage.
    pub fn logout(&self) -> bool {
        let mut session = self
            .inner
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if !session.is_authenticated() {
            return false;
        }
        *session = Session::anonymous();

        // The id goes first: its absence alone means "logged out"
        for key in [storage_keys::USER_ID, storage_keys::ROLE, storage_keys::AVATAR] {
            self.write_key(key, None);
        }

        self.inner.changes.send_replace(session.clone());
        drop(session);

        tracing::info!("Logged out");
        true
    }

    /// Replace the avatar. Ignored while logged out.
    pub fn update_avatar(&self, avatar: Option<String>) {
        let mut session = self
            .inner
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if !session.set_avatar(avatar) {
            tracing::debug!("Avatar update ignored, nobody is logged in");
            return;
        }

        self.write_key(storage_keys::AVATAR, session.avatar());
        self.inner.changes.send_replace(session.clone());
    }

    fn replace(&self, next: Session) {
        let mut session = self
            .inner
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        // Drop the old id before touching role and avatar, and write the new
        // id last, so storage never pairs an id with another session's role
        if session.user_id().is_some() {
            self.write_key(storage_keys::USER_ID, None);
        }
        self.write_key(storage_keys::ROLE, next.role().map(Role::as_str));
        self.write_key(storage_keys::AVATAR, next.avatar());
        self.write_key(storage_keys::USER_ID, next.user_id());

        *session = next;
        self.inner.changes.send_replace(session.clone());
    }

    fn write_key(&self, key: &str, value: Option<&str>) {
        let result = match value {
            Some(value) => self.inner.storage.set(key, value),
            None => self.inner.storage.remove(key),
        };

        // The in-memory session stays authoritative for this process
        if let Err(error) = result {
            tracing::error!(key, error = %error, "Session storage write failed");
        }
    }
}

impl IdentitySource for SessionStore {
    fn user_id(&self) -> Option<String> {
        self.inner
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user_id()
            .map(str::to_string)
    }
}

impl SessionInvalidator for SessionStore {
    fn invalidate(&self, reason: &str) {
        if self.logout() {
            tracing::info!(reason, "Session invalidated");
        }
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.snapshot())
            .finish_non_exhaustive()
    }
}

fn session_from(data: Option<Value>) -> Result<Option<Session>> {
    let Some(data) = data else {
        return Err(AuthError::MalformedResponse("missing data".to_string()));
    };

    let payload: AuthPayload = serde_json::from_value(data)
        .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

    if !payload.success {
        return Ok(None);
    }
    let user = payload
        .user
        .ok_or_else(|| AuthError::MalformedResponse("missing user".to_string()))?;

    let id = match user.id {
        Value::String(id) if !id.is_empty() => id,
        Value::Number(id) => id.to_string(),
        other => {
            return Err(AuthError::MalformedResponse(format!(
                "unusable user id: {other}"
            )));
        }
    };

    Ok(Some(Session::authenticated(
        id,
        user.role.map(Role::from),
        user.avatar.filter(|avatar| !avatar.is_empty()),
    )))
}

fn non_empty(message: &str) -> Option<&str> {
    let message = message.trim();
    (!message.is_empty()).then_some(message)
}

/// Server message carried by an HTTP error body, if any.
fn server_message(error: &RequestError) -> Option<&str> {
    if !matches!(error.kind, RequestErrorKind::Http(_)) {
        return None;
    }
    let envelope = serde_json::from_str::<Envelope>(error.raw.as_deref()?).ok()?;
    non_empty(&envelope.message).map(|_| error.message.as_str())
}
