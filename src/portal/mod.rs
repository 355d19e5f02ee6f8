//! Portal module for talking to a MyFuelPortal site
//!
//! This module contains everything that touches the network:
//! - Account credentials
//! - HTTP client construction and manual redirect handling
//! - Session lifetime (login, expiry detection, close)

mod client;
mod credentials;
mod http;
mod session;

pub use client::SessionClient;
pub use credentials::Credentials;
pub use http::{
    build_http_client, is_login_url, ClientOptions, LOGIN_PATH, LOGIN_POST_PATH, TOKEN_FIELD,
};
