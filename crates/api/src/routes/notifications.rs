//! Route definitions for the `/notifications` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET   /                -> list
/// GET   /unread-count    -> unread_count
/// PATCH /mark-all-read   -> mark_all_read
/// PATCH /{id}/read       -> mark_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notification::list))
        .route("/unread-count", get(notification::unread_count))
        .route("/mark-all-read", patch(notification::mark_all_read))
        .route("/{id}/read", patch(notification::mark_read))
}
