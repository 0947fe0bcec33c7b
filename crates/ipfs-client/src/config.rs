//! Client configuration

use std::time::Duration;

/// Environment variable consulted by [`IpfsConfig::from_env`]
pub const API_URL_ENV: &str = "IPFS_API_URL";

/// Default daemon API address
pub const DEFAULT_API_URL: &str = "http://localhost:5001";

/// Configuration for the IPFS HTTP API connection
#[derive(Clone, Debug)]
pub struct IpfsConfig {
    /// IPFS API URL (e.g., "http://localhost:5001")
    pub api_url: String,
    /// Request timeout, enforced by the HTTP transport
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("ipfs-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl IpfsConfig {
    /// Create with a custom API URL
    pub fn with_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Default::default()
        }
    }

    /// Create for a daemon listening on plain HTTP at `host:port`
    pub fn from_host_port(host: &str, port: u16) -> Self {
        Self::with_url(format!("http://{}:{}", host, port))
    }

    /// Read the API URL from `IPFS_API_URL`, falling back to the default
    pub fn from_env() -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::with_url(url.trim()),
            _ => Self::default(),
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Prefix every endpoint path is appended to, e.g. `http://localhost:5001/api/v0`
    pub fn api_prefix(&self) -> String {
        format!("{}/api/v0", self.api_url.trim_end_matches('/'))
    }
}
