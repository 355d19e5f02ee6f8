//! Authenticated portal client
//!
//! `SessionClient` owns the only session used to talk to the portal. It knows
//! how to log in and how to notice that the portal has logged it out, but it
//! never retries on its own; that policy belongs to the poll coordinator.

use crate::portal::credentials::Credentials;
use crate::portal::http::{
    contains_login_form, extract_verification_token, get_following, is_login_url, read_body,
    redirect_target, ClientOptions, Landing, LOGIN_PATH, LOGIN_POST_PATH, TOKEN_FIELD,
};
use crate::portal::session::Session;
use crate::state::SessionState;
use crate::PortalError;
use reqwest::{Response, StatusCode};
use url::Url;

/// Client for one portal account
///
/// # State Machine
///
/// `Unauthenticated -> (login) -> Authenticated -> (expiry) -> Unauthenticated`,
/// and `close()` moves any state to the terminal `Closed`.
#[derive(Debug)]
pub struct SessionClient {
    credentials: Credentials,
    options: ClientOptions,
    session: Option<Session>,
}

impl SessionClient {
    /// Creates a client with an open but unauthenticated session
    ///
    /// # Arguments
    ///
    /// * `credentials` - The account to log in with
    /// * `options` - Base URL, user agent and timeout
    ///
    /// # Returns
    ///
    /// * `Ok(SessionClient)` - The client is ready; call `login()` next
    /// * `Err(PortalError::Connection)` - The HTTP client could not be built
    pub fn new(credentials: Credentials, options: ClientOptions) -> Result<Self, PortalError> {
        let session = Session::open(&options)?;
        Ok(Self {
            credentials,
            options,
            session: Some(session),
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Returns the current session state
    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::Closed, Session::state)
    }

    /// Logs in with the stored credentials
    ///
    /// A fresh session replaces the current one whatever the outcome, so stale
    /// cookies never survive a login attempt.
    ///
    /// # Flow
    ///
    /// 1. GET the login page and read the hidden anti-forgery token
    /// 2. POST the credentials together with the token
    /// 3. Classify the response
    ///
    /// # Errors
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Token missing from the login page | Parsing |
    /// | 401/403 | Authentication |
    /// | 200 still showing the login form | Authentication |
    /// | 3xx back to the login page | Authentication |
    /// | Any other status, transport failure | Connection |
    pub async fn login(&mut self) -> Result<(), PortalError> {
        if !self.state().is_open() {
            return Err(closed_error());
        }

        let mut fresh = Session::open(&self.options)?;
        let result = self.handshake(&fresh).await;

        match &result {
            Ok(()) => {
                fresh.mark_authenticated();
                tracing::info!("Successfully authenticated to {}", self.options.base_url);
            }
            Err(e) => tracing::warn!("Login failed: {}", e),
        }

        self.session = Some(fresh);
        result
    }

    async fn handshake(&self, session: &Session) -> Result<(), PortalError> {
        let login_url = self.options.url(LOGIN_PATH)?;
        tracing::debug!("Fetching login page from {}", login_url);

        let (page_url, response) = match get_following(session.http(), login_url, false).await? {
            Landing::Page { url, response } => (url, response),
            Landing::LoginRedirect { url } => {
                return Err(PortalError::Connection(format!(
                    "Unexpected redirect while loading login page: {}",
                    url
                )))
            }
        };

        if response.status() != StatusCode::OK {
            return Err(PortalError::Connection(format!(
                "Failed to load login page: HTTP {}",
                response.status()
            )));
        }

        let html = read_body(&page_url, response).await?;
        let token = extract_verification_token(&html)?;
        tracing::debug!("Extracted CSRF token");

        let post_url = self.options.url(LOGIN_POST_PATH)?;
        let form = [
            ("EmailAddress", self.credentials.email()),
            ("Password", self.credentials.password()),
            (TOKEN_FIELD, token.as_str()),
            ("RememberMe", "false"),
        ];

        tracing::debug!("Submitting login credentials");
        let response = session
            .http()
            .post(post_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| PortalError::transport(post_url.as_str(), e))?;

        classify_login_response(&post_url, response).await
    }

    /// Fetches a page with the current session
    ///
    /// Redirects are followed unless they lead to the login page. A login
    /// redirect, a 401/403, or a 200 that renders the login form marks the
    /// session unauthenticated and fails with `Authentication`; there is no
    /// retry here.
    ///
    /// # Arguments
    ///
    /// * `path` - Portal path such as `/Tank`
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The body of the 200 response
    /// * `Err(PortalError)` - Authentication on expiry, Connection otherwise
    pub async fn fetch_authenticated(&mut self, path: &str) -> Result<String, PortalError> {
        let url = self.options.url(path)?;
        let session = self.session.as_mut().ok_or_else(closed_error)?;

        tracing::debug!("Fetching {}", url);
        let (final_url, response) = match get_following(session.http(), url, true).await? {
            Landing::Page { url, response } => (url, response),
            Landing::LoginRedirect { url } => {
                tracing::warn!("Redirected to login page ({}), session expired", url);
                session.invalidate();
                return Err(session_expired());
            }
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!("Portal answered HTTP {}, session expired", status);
            session.invalidate();
            return Err(session_expired());
        }

        if status != StatusCode::OK {
            return Err(PortalError::Connection(format!(
                "Failed to fetch {}: HTTP {}",
                path, status
            )));
        }

        let body = read_body(&final_url, response).await?;
        if contains_login_form(&body) {
            tracing::warn!("Portal rendered the login form for {}, session expired", path);
            session.invalidate();
            return Err(session_expired());
        }

        Ok(body)
    }

    /// Closes the session, releasing its cookies and connection pool
    ///
    /// Safe to call repeatedly. Later requests fail with a connection error.
    pub fn close(&mut self) {
        if self.session.take().is_some() {
            tracing::info!("Closed portal session");
        }
    }
}

/// Classifies the response to the credential POST
async fn classify_login_response(post_url: &Url, response: Response) -> Result<(), PortalError> {
    let status = response.status();

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(invalid_credentials()),
        s if s.is_redirection() => match redirect_target(post_url, &response) {
            Some(target) if is_login_url(&target) => Err(invalid_credentials()),
            _ => Ok(()),
        },
        StatusCode::OK => {
            let body = read_body(post_url, response).await?;
            if contains_login_form(&body) {
                Err(invalid_credentials())
            } else {
                Ok(())
            }
        }
        _ => Err(PortalError::Connection(format!(
            "Unexpected response during login: HTTP {}",
            status
        ))),
    }
}

fn invalid_credentials() -> PortalError {
    PortalError::Authentication("Invalid email or password".to_string())
}

fn session_expired() -> PortalError {
    PortalError::Authentication("Session expired, please re-authenticate".to_string())
}

fn closed_error() -> PortalError {
    PortalError::Connection("Portal client is closed".to_string())
}
