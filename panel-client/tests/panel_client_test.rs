//! Integration tests for the panel dialect clients against a mock HTTP server.
//!
//! Covers the classic X-UI cookie login + POST list, the 3x-ui/tx-ui GET API,
//! envelope and login failures, and the Netico bearer-token flow.

use panel_client::{connect, PanelError};

const XUI_LOGIN_OK: &str = r#"{"success":true,"msg":"","obj":null}"#;

/// **Test: classic x-ui logs in with a form POST, then POSTs the list path with the session cookie.**
///
/// **Setup:** Mock `/login` setting a session cookie; mock `/xui/inbound/list` requiring that cookie.
/// **Action:** `connect("xui", ...)` then `list_inbounds()`.
/// **Expected:** Two inbounds decoded from the envelope; both mocks hit.
#[tokio::test]
async fn test_classic_xui_lists_inbounds() {
    let mut server = mockito::Server::new_async().await;

    let login = server
        .mock("POST", "/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header("set-cookie", "session=abc123")
        .with_body(XUI_LOGIN_OK)
        .create_async()
        .await;
    let list = server
        .mock("POST", "/xui/inbound/list")
        .match_header("cookie", "session=abc123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "success": true,
                "msg": "",
                "obj": [
                    {"id": 1, "remark": "Germany VIP", "protocol": "vless", "port": 443, "tag": "inbound-443", "up": 0, "down": 0},
                    {"id": 2, "remark": "", "protocol": "trojan", "port": 8443, "tag": "inbound-8443"}
                ]
            }"#,
        )
        .create_async()
        .await;

    let api = connect("xui", &server.url(), "admin", "secret").expect("factory failed");
    let inbounds = api.list_inbounds().await.expect("list failed");

    assert_eq!(inbounds.len(), 2);
    assert_eq!(inbounds[0].id, 1);
    assert_eq!(inbounds[0].display_name(), "Germany VIP");
    assert_eq!(inbounds[1].display_name(), "trojan:8443");

    login.assert_async().await;
    list.assert_async().await;
}

/// **Test: 3x-ui fetches the list from the GET API path.**
///
/// **Setup:** Mock `/login` and GET `/panel/api/inbounds/list`.
/// **Action:** `connect("3x-ui", ...)` then `list_inbounds()`.
/// **Expected:** One inbound decoded; GET mock hit.
#[tokio::test]
async fn test_three_x_uses_get_api_path() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(XUI_LOGIN_OK)
        .create_async()
        .await;
    let list = server
        .mock("GET", "/panel/api/inbounds/list")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"success": true, "msg": "", "obj": [{"id": 7, "remark": "Main", "protocol": "vmess", "port": 2083, "tag": "vmess-in"}]}"#,
        )
        .create_async()
        .await;

    let api = connect("3x-ui", &server.url(), "admin", "secret").expect("factory failed");
    let inbounds = api.list_inbounds().await.expect("list failed");

    assert_eq!(inbounds.len(), 1);
    assert_eq!(inbounds[0].id, 7);
    list.assert_async().await;
}

/// **Test: a rejected login surfaces as Auth and the list endpoint is never called.**
///
/// **Setup:** Mock `/login` returning success=false; list mock expecting zero hits.
/// **Action:** `list_inbounds()`.
/// **Expected:** `PanelError::Auth` carrying the vendor message.
#[tokio::test]
async fn test_login_failure_is_auth_error() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":false,"msg":"bad credentials","obj":null}"#)
        .create_async()
        .await;
    let list = server
        .mock("POST", "/xui/inbound/list")
        .expect(0)
        .create_async()
        .await;

    let api = connect("x-ui", &server.url(), "admin", "wrong").expect("factory failed");
    let err = api.list_inbounds().await.unwrap_err();

    assert!(matches!(err, PanelError::Auth(msg) if msg.contains("bad credentials")));
    list.assert_async().await;
}

/// **Test: a success=false list envelope surfaces as Api with the vendor message.**
///
/// **Setup:** Login succeeds; list returns success=false.
/// **Action:** `list_inbounds()`.
/// **Expected:** `PanelError::Api("database locked")`.
#[tokio::test]
async fn test_list_envelope_failure_is_api_error() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(XUI_LOGIN_OK)
        .create_async()
        .await;
    server
        .mock("GET", "/panel/api/inbounds/list")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":false,"msg":"database locked","obj":null}"#)
        .create_async()
        .await;

    let api = connect("tx-ui", &server.url(), "admin", "secret").expect("factory failed");
    let err = api.list_inbounds().await.unwrap_err();

    assert!(matches!(err, PanelError::Api(msg) if msg == "database locked"));
}

/// **Test: an empty obj decodes to an empty inbound list, not an error.**
///
/// **Setup:** Login succeeds; list returns obj=[].
/// **Action:** `list_inbounds()`.
/// **Expected:** `Ok(vec![])`.
#[tokio::test]
async fn test_empty_inbound_list_is_ok() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(XUI_LOGIN_OK)
        .create_async()
        .await;
    server
        .mock("POST", "/xui/inbound/list")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"msg":"","obj":[]}"#)
        .create_async()
        .await;

    let api = connect("sanaei", &server.url(), "admin", "secret").expect("factory failed");
    let inbounds = api.list_inbounds().await.expect("list failed");
    assert!(inbounds.is_empty());
}

/// **Test: Netico logs in with JSON, then sends the bearer token on the list call.**
///
/// **Setup:** Mock `/api/v1/auth/login` returning a token; mock `/api/v1/inbounds` requiring `Authorization: Bearer`.
/// **Action:** `connect("netico", ...)` then `list_inbounds()`.
/// **Expected:** Bare-array body decodes; both mocks hit.
#[tokio::test]
async fn test_netico_bearer_token_flow() {
    let mut server = mockito::Server::new_async().await;

    let login = server
        .mock("POST", "/api/v1/auth/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token":"tok-1"}"#)
        .create_async()
        .await;
    let list = server
        .mock("GET", "/api/v1/inbounds")
        .match_header("authorization", "Bearer tok-1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id": 11, "remark": "Reseller A", "protocol": "vless", "port": 443}]"#)
        .create_async()
        .await;

    let api = connect("netico", &server.url(), "reseller", "secret").expect("factory failed");
    let inbounds = api.list_inbounds().await.expect("list failed");

    assert_eq!(inbounds.len(), 1);
    assert_eq!(inbounds[0].display_name(), "Reseller A");
    login.assert_async().await;
    list.assert_async().await;
}

/// **Test: a Netico login response without a token is an Auth error.**
///
/// **Setup:** Mock login returning `{"status":"ok"}`.
/// **Action:** `list_inbounds()`.
/// **Expected:** `PanelError::Auth` mentioning the missing token.
#[tokio::test]
async fn test_netico_login_without_token_is_auth_error() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/api/v1/auth/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;

    let api = connect("netico", &server.url(), "reseller", "secret").expect("factory failed");
    let err = api.list_inbounds().await.unwrap_err();

    assert!(matches!(err, PanelError::Auth(msg) if msg.contains("token")));
}

/// **Test: an HTTP error status on login is an Auth error with the code.**
///
/// **Setup:** Mock `/login` returning 503.
/// **Action:** `list_inbounds()`.
/// **Expected:** `PanelError::Auth` containing "503".
#[tokio::test]
async fn test_login_http_error_status() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/login")
        .with_status(503)
        .create_async()
        .await;

    let api = connect("xui", &server.url(), "admin", "secret").expect("factory failed");
    let err = api.list_inbounds().await.unwrap_err();

    assert!(matches!(err, PanelError::Auth(msg) if msg.contains("503")));
}
