//! Propane-Watch: a tank telemetry poller for MyFuelPortal accounts
//!
//! This crate logs into a vendor's MyFuelPortal site, scrapes the tank page on
//! a fixed schedule, and publishes the latest typed reading together with an
//! availability flag.

pub mod config;
pub mod extract;
pub mod output;
pub mod poll;
pub mod portal;
pub mod state;

use thiserror::Error;

/// Coarse classification of a [`PortalError`]
///
/// Callers decide retry behaviour by switching on the kind, never on the
/// message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Transport failure or unexpected HTTP status
    Connection,

    /// Credentials rejected or session expired
    Authentication,

    /// Expected markup was absent or a mandatory value was unparsable
    Parsing,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Connection => "connection",
            Self::Authentication => "authentication",
            Self::Parsing => "parsing",
        };
        write!(f, "{}", name)
    }
}

/// Errors raised while talking to the portal or reading its pages
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortalError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Parsing error: {0}")]
    Parsing(String),
}

impl PortalError {
    /// Returns the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connection(_) => ErrorKind::Connection,
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::Parsing(_) => ErrorKind::Parsing,
        }
    }

    /// Returns the human-readable message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Connection(m) | Self::Authentication(m) | Self::Parsing(m) => m,
        }
    }

    /// Builds a connection error from a transport failure
    pub(crate) fn transport(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Connection(format!("Request timeout for {}", url))
        } else if err.is_connect() {
            Self::Connection(format!("Connection refused for {}: {}", url, err))
        } else {
            Self::Connection(format!("HTTP error for {}: {}", url, err))
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Top-level error type for Propane-Watch operations
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Portal(#[from] PortalError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for portal operations
pub type PortalResult<T> = std::result::Result<T, PortalError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for Propane-Watch operations
pub type Result<T> = std::result::Result<T, WatchError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{extract_reading, Reading};
pub use poll::PollCoordinator;
pub use portal::{Credentials, SessionClient};
pub use state::{PollState, SessionState};
