//! Login and authenticated fetch against the mock portal

use crate::support::*;
use propane_watch::{Credentials, ErrorKind, SessionClient, SessionState};
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_login_posts_form_and_keeps_cookie() {
    let mock_server = MockServer::start().await;
    mount_login_page(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/Account/Login"))
        .and(body_string_contains("EmailAddress=owner%40example.com"))
        .and(body_string_contains("Password=hunter2"))
        .and(body_string_contains("__RequestVerificationToken=CfDJ8-test-token"))
        .and(body_string_contains("RememberMe=false"))
        .respond_with(
            redirect("/Tank").insert_header("set-cookie", "PortalSession=abc123; Path=/; HttpOnly"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/Tank"))
        .and(header("cookie", "PortalSession=abc123"))
        .respond_with(html(TANK_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    client.login().await.expect("login should succeed");
    assert_eq!(client.state(), SessionState::Authenticated);

    let body = client.fetch_authenticated("/Tank").await.expect("fetch should succeed");
    assert!(body.contains("progressbar"));
    assert_eq!(client.state(), SessionState::Authenticated);
}

#[tokio::test]
async fn test_login_form_shown_again_is_authentication_error() {
    let mock_server = MockServer::start().await;
    mount_login_page(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/Account/Login"))
        .respond_with(html(LOGIN_PAGE))
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    let err = client.login().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(client.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_login_redirect_back_to_login_is_authentication_error() {
    let mock_server = MockServer::start().await;
    mount_login_page(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/Account/Login"))
        .respond_with(redirect("/Account/Login?ReturnUrl=%2FTank"))
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    let err = client.login().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Authentication);
}

#[tokio::test]
async fn test_login_status_classification() {
    for (status, expected) in [
        (401u16, ErrorKind::Authentication),
        (403, ErrorKind::Authentication),
        (500, ErrorKind::Connection),
        (503, ErrorKind::Connection),
    ] {
        let mock_server = MockServer::start().await;
        mount_login_page(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/Account/Login"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&mock_server)
            .await;

        let mut client = client_for(&mock_server);
        let err = client.login().await.unwrap_err();
        assert_eq!(err.kind(), expected, "HTTP {}", status);
    }
}

#[tokio::test]
async fn test_login_page_unavailable_is_connection_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Account/Login"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    let err = client.login().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Connection);
}

#[tokio::test]
async fn test_missing_token_is_parsing_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Account/Login"))
        .respond_with(html("<html><body><form></form></body></html>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/Account/Login"))
        .respond_with(redirect("/Tank"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    let err = client.login().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parsing);
}

#[tokio::test]
async fn test_redirect_to_login_marks_session_expired() {
    let mock_server = MockServer::start().await;
    mount_login_page(&mock_server).await;
    mount_login_success(&mock_server, 1).await;

    Mock::given(method("GET"))
        .and(path("/Tank"))
        .respond_with(redirect("/Account/Login?ReturnUrl=%2FTank"))
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    client.login().await.expect("login should succeed");

    let err = client.fetch_authenticated("/Tank").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(err.message(), "Session expired, please re-authenticate");
    assert_eq!(client.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_unauthorized_fetch_marks_session_expired() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Tank"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    let err = client.fetch_authenticated("/Tank").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(client.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_server_error_keeps_session() {
    let mock_server = MockServer::start().await;
    mount_login_page(&mock_server).await;
    mount_login_success(&mock_server, 1).await;

    Mock::given(method("GET"))
        .and(path("/Tank"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    client.login().await.expect("login should succeed");

    let err = client.fetch_authenticated("/Tank").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Connection);
    assert_eq!(client.state(), SessionState::Authenticated);
}

#[tokio::test]
async fn test_non_login_redirects_are_followed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Tank"))
        .respond_with(redirect("/Tank/Overview"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/Tank/Overview"))
        .respond_with(html(TANK_PAGE))
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    let body = client.fetch_authenticated("/Tank").await.expect("redirect followed");

    assert!(body.contains("Approximately 41 gallons"));
}

#[tokio::test]
async fn test_redirect_loop_is_connection_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Tank"))
        .respond_with(redirect("/Elsewhere"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/Elsewhere"))
        .respond_with(redirect("/Tank"))
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    let err = client.fetch_authenticated("/Tank").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Connection);
    assert!(err.message().contains("Redirect loop"));
}

#[tokio::test]
async fn test_slow_portal_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/Tank"))
        .respond_with(html(TANK_PAGE).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let credentials = Credentials::new(EMAIL, PASSWORD, "kbjohnson").unwrap();
    let options = options_for(&mock_server).with_request_timeout(Duration::from_millis(200));
    let mut client = SessionClient::new(credentials, options).unwrap();

    let err = client.fetch_authenticated("/Tank").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Connection);
}

#[tokio::test]
async fn test_relogin_replaces_session_cookies() {
    let mock_server = MockServer::start().await;
    mount_login_page(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/Account/Login"))
        .respond_with(redirect("/Tank").insert_header("set-cookie", "PortalSession=first; Path=/"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/Account/Login"))
        .respond_with(redirect("/Tank").insert_header("set-cookie", "Other=second; Path=/"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/Tank"))
        .and(header("cookie", "Other=second"))
        .respond_with(html(TANK_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    client.login().await.expect("first login");
    client.login().await.expect("second login");

    // Only the second session's cookie is sent
    client.fetch_authenticated("/Tank").await.expect("fetch with new session");
}

#[tokio::test]
async fn test_login_see_other_redirects_are_classified_by_target() {
    for (location, expected) in [
        ("/Tank", None),
        ("/Account/Login?ReturnUrl=%2FTank", Some(ErrorKind::Authentication)),
    ] {
        let mock_server = MockServer::start().await;
        mount_login_page(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/Account/Login"))
            .respond_with(ResponseTemplate::new(303).insert_header("location", location))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut client = client_for(&mock_server);
        let result = client.login().await;

        assert_eq!(result.err().map(|e| e.kind()), expected, "303 to {}", location);
        let state = if expected.is_none() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        };
        assert_eq!(client.state(), state);
    }
}

#[tokio::test]
async fn test_other_redirect_statuses_count_as_login_success() {
    for status in [301u16, 307, 308] {
        let mock_server = MockServer::start().await;
        mount_login_page(&mock_server).await;

        Mock::given(method("POST"))
            .and(path("/Account/Login"))
            .respond_with(ResponseTemplate::new(status).insert_header("location", "/Tank"))
            .mount(&mock_server)
            .await;

        let mut client = client_for(&mock_server);
        client.login().await.expect("redirect away from login is success");
        assert_eq!(client.state(), SessionState::Authenticated, "HTTP {}", status);
    }
}

#[tokio::test]
async fn test_login_form_instead_of_tank_page_marks_session_expired() {
    let mock_server = MockServer::start().await;
    mount_login_page(&mock_server).await;
    mount_login_success(&mock_server, 1).await;

    Mock::given(method("GET"))
        .and(path("/Tank"))
        .respond_with(html(LOGIN_PAGE))
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    client.login().await.expect("login should succeed");

    let err = client.fetch_authenticated("/Tank").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(client.state(), SessionState::Unauthenticated);
}
