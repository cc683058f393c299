//! Route definitions for the `/approvals` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::approval;
use crate::state::AppState;

/// Routes mounted at `/approvals`. Reviewer role enforced by extractors.
///
/// ```text
/// GET  /pending         -> list_pending
/// POST /{id}/approve    -> approve
/// POST /{id}/reject     -> reject
/// POST /bulk-approve    -> bulk_approve
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pending", get(approval::list_pending))
        .route("/bulk-approve", post(approval::bulk_approve))
        .route("/{id}/approve", post(approval::approve))
        .route("/{id}/reject", post(approval::reject))
}
