use serde::{Deserialize, Serialize};

/// Default Stormpath API origin, versioned by path.
pub const DEFAULT_BASE_URL: &str = "https://api.stormpath.com/v1";

/// Client identifier sent with every request.
pub const USER_AGENT: &str = concat!("stormpath-rs/", env!("CARGO_PKG_VERSION"));

/// Configuration for a Stormpath client.
///
/// Credentials are deliberately not part of this struct so that a `Config`
/// can be logged or written to disk without leaking secrets.
///
/// # Examples
///
/// ```
/// use stormpath_common::Config;
///
/// let config = Config::default()
///     .with_base_url("http://localhost:8080/v1")
///     .with_timeout(10);
///
/// assert_eq!(config.timeout_seconds, Some(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base address that `/`-prefixed paths are resolved against.
    pub base_url: String,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
    /// Per-request timeout in seconds. `None` leaves requests unbounded.
    pub timeout_seconds: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout_seconds: None,
        }
    }
}

impl Config {
    /// Sets the base address for API requests.
    ///
    /// A trailing `/` is stripped so paths can be appended verbatim.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Overrides the client identifier header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.user_agent.starts_with("stormpath-rs/"));
        assert_eq!(config.timeout_seconds, None);
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let config = Config::default().with_base_url("http://127.0.0.1:9000/v1/");
        assert_eq!(config.base_url, "http://127.0.0.1:9000/v1");
    }
}
