//! Console configuration.
//!
//! DESIGN
//! ======
//! A browser bundle has no process environment at run time, so the API origin
//! is read from `CONSOLE_API_URL` when the crate is compiled. Everything else
//! uses the defaults below and can be overridden by constructing
//! [`ConsoleConfig`] directly (tests do this).

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::router::guard::GuardConfig;

/// API origin used when `CONSOLE_API_URL` is unset or blank.
pub const DEFAULT_API_URL: &str = "http://localhost:8021";

/// `localStorage` slot holding the durable identity snapshot.
pub const DEFAULT_SNAPSHOT_KEY: &str = "user";

/// Paths of the session endpoints, relative to the API origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthEndpoints {
    pub csrf_cookie: String,
    pub login: String,
    pub logout: String,
    pub current_user: String,
    pub register: String,
    pub forgot_password: String,
    pub reset_password: String,
}

impl Default for AuthEndpoints {
    fn default() -> Self {
        Self {
            csrf_cookie: "/sanctum/csrf-cookie".to_owned(),
            login: "/api/login".to_owned(),
            logout: "/api/logout".to_owned(),
            current_user: "/api/user".to_owned(),
            register: "/api/register".to_owned(),
            forgot_password: "/api/forgot-password".to_owned(),
            reset_password: "/api/reset-password".to_owned(),
        }
    }
}

/// Top-level configuration handed to [`crate::app::App`] on startup.
#[derive(Clone, Debug)]
pub struct ConsoleConfig {
    /// Origin prefixed to every request path, without a trailing slash.
    pub api_base_url: String,
    /// Storage key for the durable identity snapshot.
    pub snapshot_key: String,
    pub endpoints: AuthEndpoints,
    pub guard: GuardConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_owned(),
            snapshot_key: DEFAULT_SNAPSHOT_KEY.to_owned(),
            endpoints: AuthEndpoints::default(),
            guard: GuardConfig::default(),
        }
    }
}

impl ConsoleConfig {
    /// Defaults, with the API origin taken from the build environment.
    #[must_use]
    pub fn from_build_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = option_env!("CONSOLE_API_URL").and_then(normalize_base_url) {
            config.api_base_url = url;
        }
        config
    }
}

/// Trim whitespace and trailing slashes; blank input yields `None`.
pub(crate) fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_owned())
}
