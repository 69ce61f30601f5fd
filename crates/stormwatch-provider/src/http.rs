//! Shared reqwest plumbing.

use std::time::Duration;

use reqwest::{Client, Response};
use stormwatch_core::error::{AppError, ErrorKind};
use stormwatch_core::result::AppResult;

/// Build a client with a whole-request timeout.
pub(crate) fn client(timeout_seconds: u64, kind: ErrorKind) -> AppResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|e| AppError::with_source(kind, "Failed to build HTTP client", e))
}

/// Fail on non-2xx, keeping the response body in the error message.
pub(crate) async fn ensure_success(
    response: Response,
    what: &str,
    kind: ErrorKind,
) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    Err(AppError::new(
        kind,
        format!("{what} returned {status}: {body}"),
    ))
}
