use crate::portal::http::{build_http_client, ClientOptions};
use crate::state::SessionState;
use crate::PortalError;
use reqwest::Client;

/// One login's worth of HTTP state: a cookie jar, its connection pool, and
/// whether the portal accepted the credentials
///
/// Sessions are never repaired in place. A new login opens a new session and
/// the old one is dropped with its cookies.
#[derive(Debug)]
pub(crate) struct Session {
    http: Client,
    authenticated: bool,
}

impl Session {
    /// Opens a fresh, unauthenticated session
    pub fn open(options: &ClientOptions) -> Result<Self, PortalError> {
        let http = build_http_client(options)
            .map_err(|e| PortalError::Connection(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            authenticated: false,
        })
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn mark_authenticated(&mut self) {
        self.authenticated = true;
    }

    /// Forgets the login after the portal signalled expiry
    pub fn invalidate(&mut self) {
        self.authenticated = false;
    }

    pub fn state(&self) -> SessionState {
        if self.authenticated {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }
}
