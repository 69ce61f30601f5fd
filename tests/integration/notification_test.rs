//! Integration tests for notifications and their delivery.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use stormwatch_core::traits::Clock;
use stormwatch_database::MailLogStore;

use helpers::TestApp;

fn flood_warning(email: &str) -> serde_json::Value {
    json!({
        "userEmail": email,
        "type": "flood",
        "title": "River level rising",
        "description": "Mula river expected to cross the danger mark tonight.",
        "severity": "high",
        "location": "Pune",
    })
}

#[tokio::test]
async fn test_create_and_list_notifications() {
    let app = TestApp::new();
    let token = app.sign_up("Asha", "asha@example.com", "9000000030").await;

    let response = app
        .request(
            "POST",
            "/api/notifications",
            Some(flood_warning("asha@example.com")),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["message"], "Notification created successfully");
    let id = response.body["notificationId"].as_str().unwrap().to_string();

    let response = app
        .request("GET", "/api/user/notifications", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let list = response.body["notifications"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], id.as_str());
    assert_eq!(list[0]["type"], "flood");
    assert_eq!(list[0]["severity"], "high");
    assert_eq!(list[0]["delivered"], false);
}

#[tokio::test]
async fn test_create_notification_validation() {
    let app = TestApp::new();
    let token = app.sign_up("Asha", "asha@example.com", "9000000030").await;

    let response = app
        .request(
            "POST",
            "/api/notifications",
            Some(json!({ "userEmail": "asha@example.com", "type": "flood" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let mut body = flood_warning("asha@example.com");
    body["type"] = json!("meteor");
    let response = app
        .request("POST", "/api/notifications", Some(body), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            "/api/notifications",
            Some(flood_warning("someone@example.com")),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("POST", "/api/notifications", Some(flood_warning("asha@example.com")), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_dispatcher_delivers_queued_notification_once() {
    let app = TestApp::new();
    let token = app.sign_up("Asha", "asha@example.com", "9000000030").await;
    app.request(
        "POST",
        "/api/notifications",
        Some(flood_warning("asha@example.com")),
        Some(&token),
    )
    .await;
    let emails_before = app.email.sent().len();

    let report = app.dispatcher.tick(app.clock.now()).await.unwrap();
    assert_eq!(report.due(), 1);
    assert_eq!(report.delivered(), 1);

    let sent = app.email.sent();
    assert_eq!(sent.len(), emails_before + 1);
    assert_eq!(sent.last().unwrap().to, "asha@example.com");
    assert!(sent.last().unwrap().subject.contains("River level rising"));
    assert!(
        app.sms
            .sent()
            .iter()
            .any(|m| m.to == "9000000030" && m.body.contains("River level rising"))
    );

    let log = app.stores.mail_log.list_for_user("asha@example.com").await.unwrap();
    assert_eq!(log.len(), 1);

    let report = app.dispatcher.tick(app.clock.now()).await.unwrap();
    assert_eq!(report.due(), 0);

    let response = app
        .request("GET", "/api/user/notifications", None, Some(&token))
        .await;
    assert_eq!(response.body["notifications"][0]["delivered"], true);
}
