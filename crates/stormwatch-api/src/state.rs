//! Application state shared across all handlers.

use std::sync::Arc;

use stormwatch_auth::JwtDecoder;
use stormwatch_core::traits::Clock;
use stormwatch_service::{AccountService, NotificationService, TaskService};

/// Application state passed to every handler via `State<AppState>`.
///
/// Services are cheap to clone: they only hold `Arc`s.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Auth ─────────────────────────────────────────────────
    /// Bearer token validation
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    pub accounts: AccountService,
    pub tasks: TaskService,
    pub notifications: NotificationService,

    /// Time source for request contexts
    pub clock: Arc<dyn Clock>,
}
