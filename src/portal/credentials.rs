use crate::config::{is_valid_vendor, Config};
use crate::ConfigError;
use std::fmt;

/// Account credentials for one portal login
///
/// Immutable once built. The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
    vendor: String,
}

impl Credentials {
    /// Creates credentials, rejecting vendor identifiers that are not
    /// alphanumeric-and-hyphen
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        vendor: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let vendor = vendor.into();
        if !is_valid_vendor(&vendor) {
            return Err(ConfigError::Validation(format!(
                "Fuel vendor must contain only alphanumeric characters and hyphens, got '{}'",
                vendor
            )));
        }

        Ok(Self {
            email: email.into(),
            password: password.into(),
            vendor,
        })
    }

    /// Builds credentials from an already validated configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::new(
            config.credentials.email.clone(),
            config.credentials.password.clone(),
            config.portal.vendor.clone(),
        )
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("vendor", &self.vendor)
            .finish()
    }
}
