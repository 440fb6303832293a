//! Client configuration.

use crate::error::ConfigError;
use std::time::Duration;
use workdesk_core::constants::DEFAULT_REQUEST_TIMEOUT;

/// Environment variable overriding [`ClientConfig::base_url`].
pub const API_URL_VAR: &str = "WORKDESK_API_URL";

/// Environment variable overriding [`ClientConfig::timeout`], in whole seconds.
pub const TIMEOUT_SECS_VAR: &str = "WORKDESK_TIMEOUT_SECS";

/// Request pipeline configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every request path is joined onto, including the `/api`
    /// prefix (e.g. "https://workdesk.example.com/api").
    pub base_url: String,

    /// Per-request timeout.
    ///
    /// Default: 30 seconds
    pub timeout: Duration,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a configuration for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load configuration from `WORKDESK_API_URL` and `WORKDESK_TIMEOUT_SECS`.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the timeout is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the timeout is not a positive integer.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_VAR) {
            config.base_url = url;
        }

        if let Some(raw) = lookup(TIMEOUT_SECS_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    var: TIMEOUT_SECS_VAR.to_string(),
                    value: raw.clone(),
                })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Set base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Join a request path onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: concat!("workdesk-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000/api");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("workdesk-client/"));
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("https://desk.example.com/api")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("tests");

        assert_eq!(config.base_url, "https://desk.example.com/api");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "tests");
    }

    #[test]
    fn test_from_lookup() {
        let config = ClientConfig::from_lookup(lookup(&[
            (API_URL_VAR, "https://desk.example.com/api"),
            (TIMEOUT_SECS_VAR, "12"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://desk.example.com/api");
        assert_eq!(config.timeout, Duration::from_secs(12));
    }

    #[test]
    fn test_from_lookup_rejects_bad_timeout() {
        for bad in ["zero", "0", "-3", ""] {
            let result = ClientConfig::from_lookup(lookup(&[(TIMEOUT_SECS_VAR, bad)]));
            assert!(matches!(result, Err(ConfigError::Invalid { .. })), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_url_joining() {
        let config = ClientConfig::new("http://host/api/");
        assert_eq!(config.url("/login"), "http://host/api/login");
        assert_eq!(config.url("pages/1"), "http://host/api/pages/1");
    }
}
