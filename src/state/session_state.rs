/// Session state definitions for the portal client
///
/// This module defines the states an authenticated portal session moves through.
use std::fmt;

/// Represents the current state of the portal session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No valid login; the next data fetch will be redirected to the login page
    Unauthenticated,

    /// The last login succeeded and no expiry signal has been seen since
    Authenticated,

    /// The client was closed and its connection pool released
    Closed,
}

impl SessionState {
    /// Returns true if requests may be issued in this state
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticated => "authenticated",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
