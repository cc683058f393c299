//! Handlers for the `/approvals` resource (the reviewer queue).
//!
//! All handlers require `procurement` or `admin` via [`RequireReviewer`].

use axum::extract::{Path, Query, State};
use axum::Json;
use reqflow_core::types::DbId;
use reqflow_db::models::request::{Request, RequestSummary};
use reqflow_db::repositories::RequestRepo;
use serde::Deserialize;
use validator::Validate;

use super::validate_body;
use crate::engine::{Actor, BulkApproveResult};
use crate::error::AppResult;
use crate::middleware::rbac::RequireReviewer;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for `POST /approvals/{id}/approve`.
#[derive(Debug, Deserialize)]
pub struct ApproveBody {
    pub comment: Option<String>,
}

/// Body for `POST /approvals/{id}/reject`.
#[derive(Debug, Deserialize)]
pub struct RejectBody {
    pub reason: Option<String>,
}

/// Body for the bulk approval endpoints.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkApproveBody {
    #[validate(length(min = 1, max = 100, message = "must contain 1-100 ids"))]
    pub request_ids: Vec<DbId>,
}

/// GET /api/v1/approvals/pending
///
/// Pending requests, oldest first.
pub async fn list_pending(
    State(state): State<AppState>,
    RequireReviewer(_reviewer): RequireReviewer,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<RequestSummary>>>> {
    let (limit, offset) = params.clamped();
    let requests = RequestRepo::list_pending(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// POST /api/v1/approvals/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    RequireReviewer(reviewer): RequireReviewer,
    Path(id): Path<DbId>,
    body: Option<Json<ApproveBody>>,
) -> AppResult<Json<DataResponse<Request>>> {
    let comment = body.and_then(|Json(b)| b.comment);
    let actor = Actor::load(&state.pool, reviewer.user_id).await?;
    let request = state
        .workflow
        .approve(&actor, id, comment.as_deref())
        .await?;
    Ok(Json(DataResponse { data: request }))
}

/// POST /api/v1/approvals/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    RequireReviewer(reviewer): RequireReviewer,
    Path(id): Path<DbId>,
    Json(body): Json<RejectBody>,
) -> AppResult<Json<DataResponse<Request>>> {
    let actor = Actor::load(&state.pool, reviewer.user_id).await?;
    let request = state
        .workflow
        .reject(&actor, id, body.reason.as_deref())
        .await?;
    Ok(Json(DataResponse { data: request }))
}

/// POST /api/v1/approvals/bulk-approve
/// POST /api/v1/admin/bulk-approve-requests
///
/// Each id is approved independently; per-id failures are reported in the
/// result rather than failing the call.
pub async fn bulk_approve(
    State(state): State<AppState>,
    RequireReviewer(reviewer): RequireReviewer,
    Json(body): Json<BulkApproveBody>,
) -> AppResult<Json<DataResponse<BulkApproveResult>>> {
    validate_body(&body)?;
    let actor = Actor::load(&state.pool, reviewer.user_id).await?;
    let result = state.workflow.bulk_approve(&actor, &body.request_ids).await;
    Ok(Json(DataResponse { data: result }))
}
