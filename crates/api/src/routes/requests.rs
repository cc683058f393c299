//! Route definitions for the `/requests` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::request;
use crate::state::AppState;

/// Routes mounted at `/requests`.
///
/// ```text
/// GET   /               -> list
/// POST  /               -> create
/// GET   /{id}           -> get_by_id
/// PUT   /{id}           -> edit
/// GET   /{id}/history   -> history
/// PATCH /{id}/status    -> update_status
/// PATCH /{id}/submit    -> submit
/// PATCH /{id}/cancel    -> cancel
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(request::list).post(request::create))
        .route("/{id}", get(request::get_by_id).put(request::edit))
        .route("/{id}/history", get(request::history))
        .route("/{id}/status", patch(request::update_status))
        .route("/{id}/submit", patch(request::submit))
        .route("/{id}/cancel", patch(request::cancel))
}
