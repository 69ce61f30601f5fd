//! # stormwatch-api
//!
//! HTTP API layer for Stormwatch built on Axum.
//!
//! Provides the REST endpoints, the bearer-token and validated-JSON
//! extractors, request/response DTOs, CORS and request logging, and the
//! mapping from `AppError` to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
