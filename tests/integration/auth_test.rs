//! Integration tests for registration, verification and login.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use stormwatch_database::UserStore;

use helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_register_sends_code_without_creating_user() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/register",
            Some(json!({
                "name": "Meera",
                "email": "Meera@Example.com",
                "phone": "9000000010",
                "password": PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["email"], "meera@example.com");
    assert!(response.body.get("tempUser").is_none());

    let sent = app.email.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Verify Your Email");
    assert_eq!(app.last_code().len(), 6);
    assert!(app.sms.sent()[0].body.contains("Please verify within 10 minutes!"));

    assert!(app.stores.users.find_by_email("meera@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_register_rejects_invalid_body() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/register",
            Some(json!({
                "name": "Meera",
                "email": "not-an-email",
                "phone": "9000000010",
                "password": PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION");
    assert!(response.body["details"].is_null());
    assert_eq!(app.email.attempts(), 0);
}

#[tokio::test]
async fn test_verify_then_login_by_phone() {
    let app = TestApp::new();
    app.sign_up("Meera", "meera@example.com", "9000000010").await;

    let user = app
        .stores
        .users
        .find_by_email("meera@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(user.is_verified);
    assert_eq!(user.place_name.as_deref(), Some("Pune"));
    assert_ne!(user.password_hash, PASSWORD);

    let response = app
        .request(
            "POST",
            "/api/login",
            Some(json!({ "identifier": "9000000010", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["token"].as_str().is_some());
    assert_eq!(response.body["user"]["email"], "meera@example.com");
    assert_eq!(response.body["user"]["location"]["placeName"], "Pune");
    assert!(response.body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_verify_with_wrong_code() {
    let app = TestApp::new();
    app.request(
        "POST",
        "/api/register",
        Some(json!({
            "name": "Meera",
            "email": "meera@example.com",
            "phone": "9000000010",
            "password": PASSWORD,
        })),
        None,
    )
    .await;
    let wrong = if app.last_code() == "000000" { "111111" } else { "000000" };

    let response = app
        .request(
            "POST",
            "/api/verify",
            Some(json!({ "email": "meera@example.com", "code": wrong })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Invalid verification code");

    let response = app
        .request(
            "POST",
            "/api/verify",
            Some(json!({ "email": "nobody@example.com", "code": "123456" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Verification expired or not found");
}

#[tokio::test]
async fn test_resend_issues_a_new_code() {
    let app = TestApp::new();
    app.request(
        "POST",
        "/api/register",
        Some(json!({
            "name": "Meera",
            "email": "meera@example.com",
            "phone": "9000000010",
            "password": PASSWORD,
        })),
        None,
    )
    .await;

    let response = app
        .request(
            "POST",
            "/api/resend-otp",
            Some(json!({ "email": "meera@example.com" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.email.sent().len(), 2);

    let response = app
        .request(
            "POST",
            "/api/verify",
            Some(json!({ "email": "meera@example.com", "code": app.last_code() })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let app = TestApp::new();
    app.sign_up("Meera", "meera@example.com", "9000000010").await;
    let sent_before = app.email.attempts();

    let response = app
        .request(
            "POST",
            "/api/register",
            Some(json!({
                "name": "Other",
                "email": "other@example.com",
                "phone": "9000000010",
                "password": PASSWORD,
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.email.attempts(), sent_before);
}

#[tokio::test]
async fn test_login_failures_are_unauthorized() {
    let app = TestApp::new();
    app.sign_up("Meera", "meera@example.com", "9000000010").await;

    for (identifier, password) in [
        ("meera@example.com", "wrong-password"),
        ("nobody@example.com", PASSWORD),
    ] {
        let response = app
            .request(
                "POST",
                "/api/login",
                Some(json!({ "identifier": identifier, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["message"], "Invalid credentials or unverified account");
    }
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/tasks", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "AUTHENTICATION");

    let response = app.request("GET", "/api/tasks", None, Some("garbage")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}
