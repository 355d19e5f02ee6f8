//! HTTP plumbing for the portal client
//!
//! This module handles:
//! - Building HTTP clients with a cookie store and a bounded timeout
//! - Following redirects manually so a bounce to the login page is visible
//! - Recognising the login page by URL and by markup

use crate::config::Config;
use crate::PortalError;
use reqwest::{header::LOCATION, redirect::Policy, Client, Response};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Path of the login page
pub const LOGIN_PATH: &str = "/Account/Login";

/// Login form target, bouncing back to the tank page on success
pub const LOGIN_POST_PATH: &str = "/Account/Login?ReturnUrl=%2FTank";

/// Name of the hidden anti-forgery input on the login form
pub const TOKEN_FIELD: &str = "__RequestVerificationToken";

/// Maximum redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// Connection settings shared by every session the client opens
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Portal root, without a trailing slash
    pub base_url: String,

    /// Value of the User-Agent header
    pub user_agent: String,

    /// Upper bound for any single request
    pub request_timeout: Duration,
}

impl ClientOptions {
    /// Creates options for the given base URL with default timeout and user agent
    pub fn new(base_url: &str) -> Result<Self, PortalError> {
        Url::parse(base_url).map_err(|e| {
            PortalError::Connection(format!("Invalid base URL '{}': {}", base_url, e))
        })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            request_timeout: Duration::from_secs(crate::config::DEFAULT_REQUEST_TIMEOUT_SECONDS),
        })
    }

    /// Derives options from a loaded configuration
    pub fn from_config(config: &Config) -> Result<Self, PortalError> {
        let mut options = Self::new(&config.portal.resolved_base_url())?;
        options.user_agent = config.user_agent.header_value();
        options.request_timeout = config.poll.request_timeout();
        Ok(options)
    }

    /// Overrides the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Resolves a portal path (which may carry a query) against the base URL
    pub fn url(&self, path: &str) -> Result<Url, PortalError> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&joined)
            .map_err(|e| PortalError::Connection(format!("Invalid URL '{}': {}", joined, e)))
    }
}

/// Builds an HTTP client for one session
///
/// Each client carries its own cookie jar, so dropping the client discards the
/// session cookies together with the connection pool. Redirects are never
/// followed automatically.
pub fn build_http_client(options: &ClientOptions) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(options.user_agent.clone())
        .timeout(options.request_timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::none()) // Handle redirects manually
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Outcome of a GET that followed redirects
#[derive(Debug)]
pub enum Landing {
    /// A non-redirect response (or a redirect without a usable Location)
    Page { url: Url, response: Response },

    /// A redirect pointed at the login page
    LoginRedirect { url: Url },
}

/// Returns true if the URL points at the login page
pub fn is_login_url(url: &Url) -> bool {
    url.path()
        .to_ascii_lowercase()
        .contains(&LOGIN_PATH.to_ascii_lowercase())
}

/// Sends a GET and follows redirects by hand
///
/// # Redirect Handling
///
/// | Condition | Action |
/// |-----------|--------|
/// | Location points at the login page and `stop_at_login` | Return `LoginRedirect` |
/// | Location missing or unparsable | Return the redirect response as a page |
/// | URL already visited | Connection error (loop) |
/// | More than 10 hops | Connection error |
pub async fn get_following(
    client: &Client,
    start: Url,
    stop_at_login: bool,
) -> Result<Landing, PortalError> {
    let mut current = start;
    let mut visited = HashSet::new();

    for _ in 0..=MAX_REDIRECTS {
        if !visited.insert(current.to_string()) {
            return Err(PortalError::Connection(format!(
                "Redirect loop detected at {}",
                current
            )));
        }

        tracing::debug!("GET {}", current);
        let response = client
            .get(current.clone())
            .send()
            .await
            .map_err(|e| PortalError::transport(current.as_str(), e))?;

        if !response.status().is_redirection() {
            return Ok(Landing::Page {
                url: current,
                response,
            });
        }

        let Some(next) = redirect_target(&current, &response) else {
            return Ok(Landing::Page {
                url: current,
                response,
            });
        };

        tracing::debug!("Redirect {} -> {}", current, next);
        if stop_at_login && is_login_url(&next) {
            return Ok(Landing::LoginRedirect { url: next });
        }
        current = next;
    }

    Err(PortalError::Connection(format!(
        "Too many redirects from {}",
        current
    )))
}

/// Resolves the Location header of a redirect response
pub fn redirect_target(current: &Url, response: &Response) -> Option<Url> {
    let location = response.headers().get(LOCATION)?.to_str().ok()?;
    current.join(location).ok()
}

/// Reads a response body, mapping transport failures to connection errors
pub async fn read_body(url: &Url, response: Response) -> Result<String, PortalError> {
    response
        .text()
        .await
        .map_err(|e| PortalError::transport(url.as_str(), e))
}

/// Extracts the anti-forgery token from the login page
pub fn extract_verification_token(html: &str) -> Result<String, PortalError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(&format!(r#"input[name="{}"]"#, TOKEN_FIELD))
        .map_err(|e| PortalError::Parsing(format!("Invalid token selector: {:?}", e)))?;

    document
        .select(&selector)
        .next()
        .and_then(|input| input.value().attr("value"))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| PortalError::Parsing("Could not find CSRF token in login page".to_string()))
}

/// Returns true if the markup still contains the login form
pub fn contains_login_form(html: &str) -> bool {
    let document = Html::parse_document(html);
    match Selector::parse(r#"input[name="EmailAddress"], #EmailAddress"#) {
        Ok(selector) => document.select(&selector).next().is_some(),
        Err(_) => html.contains(r#"id="EmailAddress""#),
    }
}
