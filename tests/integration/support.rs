//! Shared fixtures for the mock portal

use propane_watch::portal::ClientOptions;
use propane_watch::{Credentials, PollCoordinator, SessionClient};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const EMAIL: &str = "owner@example.com";
pub const PASSWORD: &str = "hunter2";

pub const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>Log in - MyFuelPortal</title></head>
<body>
  <form action="/Account/Login?ReturnUrl=%2FTank" method="post">
    <input name="__RequestVerificationToken" type="hidden" value="CfDJ8-test-token" />
    <input id="EmailAddress" name="EmailAddress" type="email" />
    <input id="Password" name="Password" type="password" />
    <button type="submit">Log in</button>
  </form>
</body></html>"#;

pub const TANK_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>Tank - MyFuelPortal</title></head>
<body>
  <div class="tank-card">
    <h3>125 Gal Propane</h3>
    <div class="progress">
      <div class="progress-bar" role="progressbar" aria-valuenow="62"
           aria-valuemin="0" aria-valuemax="100" style="width: 62%">62%</div>
    </div>
    <div class="tank-gallons">Approximately 41 gallons in tank</div>
    <div class="tank-delivery">Last Delivery: 03/10/2024</div>
    <div class="tank-price"><span>$3.1400 / gal</span></div>
  </div>
</body></html>"#;

pub fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

pub fn redirect(location: &str) -> ResponseTemplate {
    ResponseTemplate::new(302).insert_header("location", location)
}

/// Serves the login page with its anti-forgery token
pub async fn mount_login_page(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/Account/Login"))
        .respond_with(html(LOGIN_PAGE))
        .mount(server)
        .await;
}

/// Accepts any credential POST, expecting exactly `times` of them
pub async fn mount_login_success(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path("/Account/Login"))
        .respond_with(redirect("/Tank"))
        .expect(times)
        .mount(server)
        .await;
}

pub fn options_for(server: &MockServer) -> ClientOptions {
    ClientOptions::new(&server.uri()).expect("mock server URI is valid")
}

pub fn client_for(server: &MockServer) -> SessionClient {
    let credentials =
        Credentials::new(EMAIL, PASSWORD, "kbjohnson").expect("vendor is valid");
    SessionClient::new(credentials, options_for(server)).expect("client builds")
}

pub fn coordinator_for(server: &MockServer, interval: Duration) -> PollCoordinator {
    PollCoordinator::new(client_for(server), "/Tank", interval)
}
