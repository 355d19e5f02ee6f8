use crate::config::types::{Config, CredentialsConfig, PollConfig, PortalConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_portal_config(&config.portal)?;
    validate_credentials(&config.credentials)?;
    validate_poll_config(&config.poll)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Returns true if the vendor identifier is non-empty and contains only
/// alphanumeric characters and hyphens
pub fn is_valid_vendor(vendor: &str) -> bool {
    !vendor.is_empty() && vendor.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Validates portal configuration
fn validate_portal_config(config: &PortalConfig) -> Result<(), ConfigError> {
    if !is_valid_vendor(&config.vendor) {
        return Err(ConfigError::Validation(format!(
            "vendor must contain only alphanumeric characters and hyphens, got '{}'",
            config.vendor
        )));
    }

    if let Some(base_url) = &config.base_url {
        let url = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(ConfigError::InvalidUrl(format!(
                "base-url '{}' must use http or https",
                base_url
            )));
        }
    }

    if !config.reading_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "reading-path must start with '/', got '{}'",
            config.reading_path
        )));
    }

    Ok(())
}

/// Validates account credentials
fn validate_credentials(config: &CredentialsConfig) -> Result<(), ConfigError> {
    validate_email(&config.email)?;

    if config.password.is_empty() {
        return Err(ConfigError::Validation(
            "password cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates polling configuration
fn validate_poll_config(config: &PollConfig) -> Result<(), ConfigError> {
    if config.interval_seconds < 10 || config.interval_seconds > 86_400 {
        return Err(ConfigError::Validation(format!(
            "interval-seconds must be between 10 and 86400, got {}",
            config.interval_seconds
        )));
    }

    if config.request_timeout_seconds < 1 || config.request_timeout_seconds > 300 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-seconds must be between 1 and 300, got {}",
            config.request_timeout_seconds
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.client_name.is_empty() {
        return Err(ConfigError::Validation(
            "client-name cannot be empty".to_string(),
        ));
    }

    if !config
        .client_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "client-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.client_name
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation("email cannot be empty".to_string()));
    }

    // Must contain exactly one @ with text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    Ok(())
}
