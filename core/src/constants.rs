//! Shared constants.
//!
//! Values here are part of external contracts (durable storage keys, header
//! names, route paths) and must stay stable across releases.

use std::time::Duration;

/// Keys under which the session is kept in durable local storage.
pub mod storage_keys {
    /// Authenticated user identifier. Its absence means "logged out".
    pub const USER_ID: &str = "userId";

    /// Role tag of the authenticated user.
    pub const ROLE: &str = "role";

    /// Avatar URI of the authenticated user.
    pub const AVATAR: &str = "avatar";
}

/// Outbound header names.
pub mod headers {
    /// Identifier of the logged-in user, attached on request.
    pub const USER_ID: &str = "x-user-id";
}

/// Well-known route paths.
pub mod routes {
    /// Public login page.
    pub const LOGIN: &str = "/login";

    /// Public registration page.
    pub const REGISTER: &str = "/register";

    /// Default landing page for authenticated users.
    pub const DASHBOARD: &str = "/";

    /// Request log viewer.
    pub const LOGS: &str = "/logs";

    /// Database page view, parameterised by database id.
    pub const DATA_VIEW: &str = "/data/:databaseId";

    /// Page workspace.
    pub const WORKSPACE: &str = "/workspace";

    /// Admin-only permission management.
    pub const PERMISSIONS: &str = "/permissions";
}

/// Role tag granting admin privileges.
pub const ADMIN_ROLE: &str = "admin";

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default lifetime of a notification.
pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_millis(3000);
