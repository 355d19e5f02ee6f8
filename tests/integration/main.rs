//! Integration tests against a mock MyFuelPortal server
//!
//! These tests use wiremock to stand in for the portal and exercise login,
//! session expiry, and the poll cycle end-to-end.

mod portal_tests;
mod support;
