//! Client configuration.

use std::fmt;
use std::time::Duration;

use crate::error::{OpenfilesError, Result};

/// Default service endpoint.
pub const DEFAULT_BASE_URL: &str = "https://app.openfiles.xyz";

/// Environment variable holding the API token.
pub const API_TOKEN_ENV: &str = "OPENFILES_API_TOKEN";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "OPENFILES_BASE_URL";

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings used to open a client session.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use openfiles::ClientConfig;
///
/// let config = ClientConfig::new("my-token")
///     .with_base_url("http://localhost:8000")
///     .with_timeout(Duration::from_secs(300));
/// assert_eq!(config.base_url, "http://localhost:8000");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Service root, e.g. `https://app.openfiles.xyz`
    pub base_url: String,
    /// API token sent with every request
    pub api_token: String,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// Total per-request timeout (unset by default so large transfers are not cut off)
    pub timeout: Option<Duration>,
    /// Optional proxy URL (e.g., "http://proxy:8080" or "socks5://proxy:1080")
    pub proxy: Option<String>,
    /// User-Agent header value
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a configuration for the default service endpoint.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: api_token.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: None,
            proxy: None,
            user_agent: format!("openfiles-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Read the token (and optional base URL override) from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(API_TOKEN_ENV)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                OpenfilesError::Config(format!(
                    "API token must be provided explicitly or through {}",
                    API_TOKEN_ENV
                ))
            })?;

        let mut config = Self::new(token);
        if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            config.base_url = url;
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .field("connect_timeout", &self.connect_timeout)
            .field("timeout", &self.timeout)
            .field("proxy", &self.proxy)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
