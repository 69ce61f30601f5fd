//! Route definitions for the Stormwatch HTTP API.
//!
//! Routes are grouped by domain and mounted under `/api`.

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::handlers;
use crate::state::AppState;

/// Build the router and thread `AppState` through every route.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(task_routes())
        .merge(notification_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Registration, verification and login
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/resend-otp", post(handlers::auth::resend_otp))
        .route("/verify", post(handlers::auth::verify))
        .route("/login", post(handlers::auth::login))
}

fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(handlers::task::list_tasks))
        .route("/add_task", post(handlers::task::add_task))
        .route("/tasks/{id}", delete(handlers::task::delete_task))
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            post(handlers::notification::create_notification),
        )
        .route(
            "/user/notifications",
            get(handlers::notification::list_notifications),
        )
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
