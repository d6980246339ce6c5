//! Authentication endpoint tests.

mod common;

use axum::http::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use axum::http::StatusCode;
use common::{authed, TestApp, TEST_PASSWORD};
use serde_json::{json, Value};

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::new().await;

    let body = app.register("writer", "writer@example.com").await;

    assert_eq!(body["data"]["username"], "writer");
    assert_eq!(body["data"]["email"], "writer@example.com");
    assert_eq!(body["data"]["role"], "member");
    assert_eq!(body["data"]["is_admin"], false);
    assert!(body["data"].get("password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = TestApp::new().await;
    app.register("writer", "writer@example.com").await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "username": "writer",
            "email": "other@example.com",
            "password": TEST_PASSWORD
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new().await;
    app.register("writer", "writer@example.com").await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "username": "someone",
            "email": "writer@example.com",
            "password": TEST_PASSWORD
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "username": "",
            "email": "not-an-email",
            "password": "short"
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    let details = &body["error"]["details"];
    assert!(details["username"].is_array());
    assert!(details["email"].is_array());
    assert!(details["password"].is_array());
}

#[tokio::test]
async fn test_register_malformed_json() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({ "username": "writer" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_sets_http_only_cookie() {
    let app = TestApp::new().await;
    app.register("writer", "writer@example.com").await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "writer@example.com", "password": TEST_PASSWORD }))
        .await;

    response.assert_status_ok();
    let cookie = response.header(SET_COOKIE);
    let cookie = cookie.to_str().unwrap();
    assert!(cookie.starts_with("access_token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));

    let body: Value = response.json();
    assert!(body["data"]["token"].is_string());
    assert_eq!(body["data"]["expires_in"], 900);
    assert_eq!(body["data"]["user"]["username"], "writer");
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let app = TestApp::new().await;
    app.register("writer", "writer@example.com").await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "Writer@Example.com", "password": TEST_PASSWORD }))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new().await;
    app.register("writer", "writer@example.com").await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "writer@example.com", "password": "wrongpassword" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_unknown_email() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "ghost@example.com", "password": TEST_PASSWORD }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_bearer_token() {
    let app = TestApp::new().await;
    let (id, token) = app.member("reader").await;

    let response = authed(app.server.get("/api/auth/me"), &token).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["username"], "reader");
}

#[tokio::test]
async fn test_me_with_cookie() {
    let app = TestApp::new().await;
    let (_, token) = app.member("reader").await;

    let response = app
        .server
        .get("/api/auth/me")
        .add_header(COOKIE, format!("access_token={token}"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["username"], "reader");
}

#[tokio::test]
async fn test_me_without_token() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/auth/me").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_invalid_token() {
    let app = TestApp::new().await;

    let response = app
        .server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, "Bearer invalid-token")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = TestApp::new().await;
    let (_, token) = app.member("reader").await;

    let response = app
        .server
        .post("/api/auth/logout")
        .add_header(COOKIE, format!("access_token={token}"))
        .await;

    response.assert_status_ok();
    let cookie = response.header(SET_COOKIE);
    let cookie = cookie.to_str().unwrap();
    assert!(cookie.starts_with("access_token="));
    assert!(cookie.contains("Max-Age=0"));
}
