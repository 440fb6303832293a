//! Session state types.
//!
//! All types are `Clone` so snapshots can be handed to the router and to
//! watchers without holding the store's lock.

use serde::{Deserialize, Serialize};
use std::fmt;
use workdesk_core::constants::ADMIN_ROLE;

/// Role tag of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Full access, including admin-only routes.
    Admin,
    /// Regular workspace member.
    Member,
    /// Any other tag the server hands out, preserved verbatim.
    Other(String),
}

impl Role {
    /// Parse a role tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use workdesk_auth::Role;
    ///
    /// assert_eq!(Role::parse("admin"), Role::Admin);
    /// assert_eq!(Role::parse("auditor"), Role::Other("auditor".to_string()));
    /// ```
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag {
            ADMIN_ROLE => Self::Admin,
            "member" => Self::Member,
            other => Self::Other(other.to_string()),
        }
    }

    /// The wire tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => ADMIN_ROLE,
            Self::Member => "member",
            Self::Other(tag) => tag,
        }
    }

    /// Whether this role passes admin-only routes.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl From<String> for Role {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The locally cached identity.
///
/// Role and avatar only exist while a user id is present; the constructors
/// are the only way to build a session, so a logged-out session never
/// carries a stale role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<String>,
    role: Option<Role>,
    avatar: Option<String>,
}

impl Session {
    /// A logged-out session.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            user_id: None,
            role: None,
            avatar: None,
        }
    }

    /// A logged-in session.
    #[must_use]
    pub fn authenticated(
        user_id: impl Into<String>,
        role: Option<Role>,
        avatar: Option<String>,
    ) -> Self {
        Self {
            user_id: Some(user_id.into()),
            role,
            avatar,
        }
    }

    /// User id, if logged in.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Role, if logged in and known.
    #[must_use]
    pub const fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    /// Avatar URI, if logged in and set.
    #[must_use]
    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    /// Whether a user id is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Whether the cached role is the admin tag.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.role.as_ref().is_some_and(Role::is_admin)
    }

    /// Replace the avatar. Ignored while logged out.
    pub(crate) fn set_avatar(&mut self, avatar: Option<String>) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        self.avatar = avatar;
        true
    }
}

/// Result of a login or registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Whether the server accepted the request.
    pub success: bool,
    /// Server message, or a fallback when the server gave none.
    pub message: String,
}

impl LoginOutcome {
    /// Accepted with `message`.
    #[must_use]
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Rejected with `message`.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
