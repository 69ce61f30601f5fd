//! Integration tests for task CRUD and alert scheduling.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use stormwatch_database::AlertStore;

use helpers::TestApp;

#[tokio::test]
async fn test_add_task_schedules_alert_and_confirms_by_sms() {
    let app = TestApp::new();
    let token = app.sign_up("Ravi", "ravi@example.com", "9000000020").await;

    let response = app
        .request(
            "POST",
            "/api/add_task",
            Some(json!({ "task": "Cycle to work", "time": "18:30" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["alertScheduled"], true);
    assert_eq!(response.body["task"]["task"], "Cycle to work");
    assert_eq!(response.body["task"]["time"], "18:30");

    let alerts = app.stores.alerts.list_for_user("ravi@example.com").await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].title, "Weather Alert for: Cycle to work");
    assert_eq!(alerts[0].location, "Pune");
    assert!(!alerts[0].delivered);

    let confirmations = app.sms.sent();
    assert!(confirmations.iter().any(|m| m.to == "9000000020" && m.body.contains("Cycle to work")));

    let response = app.request("GET", "/api/tasks", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    let tasks = response.body["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["task"], "Cycle to work");
}

#[tokio::test]
async fn test_task_survives_forecast_outage() {
    let app = TestApp::new();
    let token = app.sign_up("Ravi", "ravi@example.com", "9000000020").await;
    app.weather.set_failing(true);

    let response = app
        .request(
            "POST",
            "/api/add_task",
            Some(json!({ "task": "Pick up groceries", "time": "10:00" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["alertScheduled"], false);
    assert!(app.stores.alerts.list_for_user("ravi@example.com").await.unwrap().is_empty());

    let response = app.request("GET", "/api/tasks", None, Some(&token)).await;
    assert_eq!(response.body["tasks"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_task_rejects_bad_input() {
    let app = TestApp::new();
    let token = app.sign_up("Ravi", "ravi@example.com", "9000000020").await;

    for body in [
        json!({ "task": "Run", "time": "25:00" }),
        json!({ "task": "Run", "time": "soon" }),
        json!({ "task": "   ", "time": "07:00" }),
        json!({ "time": "07:00" }),
    ] {
        let response = app
            .request("POST", "/api/add_task", Some(body.clone()), Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{body}");
    }

    let response = app.request("GET", "/api/tasks", None, Some(&token)).await;
    assert!(response.body["tasks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_task_for_someone_else_is_forbidden() {
    let app = TestApp::new();
    let token = app.sign_up("Ravi", "ravi@example.com", "9000000020").await;

    let response = app
        .request(
            "POST",
            "/api/add_task",
            Some(json!({ "task": "Run", "time": "07:00", "userEmail": "other@example.com" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_tasks_are_scoped_to_their_owner() {
    let app = TestApp::new();
    let ravi = app.sign_up("Ravi", "ravi@example.com", "9000000020").await;
    let lata = app.sign_up("Lata", "lata@example.com", "9000000021").await;

    let response = app
        .request(
            "POST",
            "/api/add_task",
            Some(json!({ "task": "Morning walk", "time": "06:15" })),
            Some(&ravi),
        )
        .await;
    let task_id = response.body["task"]["id"].as_str().unwrap().to_string();

    let response = app.request("GET", "/api/tasks", None, Some(&lata)).await;
    assert!(response.body["tasks"].as_array().unwrap().is_empty());

    let path = format!("/api/tasks/{task_id}");
    let response = app.request("DELETE", &path, None, Some(&lata)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app.request("DELETE", &path, None, Some(&ravi)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Task deleted successfully");

    let response = app.request("DELETE", &path, None, Some(&ravi)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_with_malformed_id() {
    let app = TestApp::new();
    let token = app.sign_up("Ravi", "ravi@example.com", "9000000020").await;

    let response = app
        .request("DELETE", "/api/tasks/not-an-id", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
