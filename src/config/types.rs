use serde::Deserialize;
use std::time::Duration;

/// Default polling interval (two hours)
pub const DEFAULT_INTERVAL_SECONDS: u64 = 7200;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Default path of the tank page
pub const DEFAULT_READING_PATH: &str = "/Tank";

/// Main configuration structure for Propane-Watch
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub portal: PortalConfig,
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Which portal to talk to
#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    /// Vendor identifier, used as the portal sub-domain
    pub vendor: String,

    /// Overrides the URL derived from the vendor
    #[serde(rename = "base-url", default)]
    pub base_url: Option<String>,

    /// Path of the page carrying the tank reading
    #[serde(rename = "reading-path", default = "default_reading_path")]
    pub reading_path: String,
}

impl PortalConfig {
    /// Returns the base URL of the portal, without a trailing slash
    ///
    /// An explicit `base-url` wins; otherwise the URL is derived from the
    /// vendor identifier as `https://{vendor}.myfuelportal.com`.
    pub fn resolved_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.myfuelportal.com", self.vendor),
        }
    }
}

/// Account credentials
#[derive(Clone, Deserialize)]
pub struct CredentialsConfig {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Polling behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    /// Seconds between poll cycles
    #[serde(rename = "interval-seconds", default = "default_interval")]
    pub interval_seconds: u64,

    /// Upper bound for a single HTTP request
    #[serde(rename = "request-timeout-seconds", default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_INTERVAL_SECONDS,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name sent in the User-Agent header
    #[serde(rename = "client-name", default = "default_client_name")]
    pub client_name: String,

    /// Version sent in the User-Agent header
    #[serde(rename = "client-version", default = "default_client_version")]
    pub client_version: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.client_name, self.client_version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            client_name: default_client_name(),
            client_version: default_client_version(),
        }
    }
}

fn default_reading_path() -> String {
    DEFAULT_READING_PATH.to_string()
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_SECONDS
}

fn default_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECONDS
}

fn default_client_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_client_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
