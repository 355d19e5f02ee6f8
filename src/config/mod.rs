//! Configuration module for Propane-Watch
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use propane_watch::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Polling {}", config.portal.resolved_base_url());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CredentialsConfig, PollConfig, PortalConfig, UserAgentConfig,
    DEFAULT_INTERVAL_SECONDS, DEFAULT_READING_PATH, DEFAULT_REQUEST_TIMEOUT_SECONDS,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::is_valid_vendor;
