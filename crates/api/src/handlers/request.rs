//! Handlers for the `/requests` resource.
//!
//! Reads go straight to [`RequestRepo`]; every status change goes through
//! the [`WorkflowEngine`](crate::engine::WorkflowEngine).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use reqflow_core::error::CoreError;
use reqflow_core::request::{Priority, RequestStatus};
use reqflow_core::types::{Date, DbId};
use reqflow_db::models::history::HistoryEntry;
use reqflow_db::models::request::{
    CreateRequest, NewRequestItem, Request, RequestDetail, RequestFilter, RequestSummary,
    UpdateRequest,
};
use reqflow_db::repositories::{HistoryRepo, RequestRepo};
use serde::Deserialize;
use validator::Validate;

use super::{parse_opt, validate_body};
use crate::engine::Actor;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{DEFAULT_LIMIT, MAX_LIMIT};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body for `POST /requests`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestBody {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub department: String,
    pub priority: Option<String>,
    /// `draft` or `pending` (default).
    pub status: Option<String>,
    pub needed_by: Option<Date>,
    #[serde(default)]
    pub from_location: String,
    #[serde(default)]
    pub to_location: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub items: Vec<NewRequestItem>,
}

/// Body for `PUT /requests/{id}`. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditRequestBody {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub department: Option<String>,
    pub priority: Option<String>,
    pub needed_by: Option<Date>,
    pub from_location: Option<String>,
    pub to_location: Option<String>,
    pub purpose: Option<String>,
    /// Replaces every existing item when present.
    pub items: Option<Vec<NewRequestItem>>,
    /// Move the request to `pending` after applying the edit.
    #[serde(default)]
    pub submit: bool,
}

/// Body for `PATCH /requests/{id}/status`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusBody {
    pub status: String,
    /// Free-text comment; the required reason for `rejected`/`cancelled`.
    pub comment: Option<String>,
}

/// Body for `PATCH /requests/{id}/cancel`.
#[derive(Debug, Deserialize)]
pub struct CancelBody {
    pub reason: Option<String>,
}

/// Query parameters for `GET /requests`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequestsParams {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub department: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/requests
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateRequestBody>,
) -> AppResult<(StatusCode, Json<DataResponse<RequestDetail>>)> {
    validate_body(&body)?;
    let actor = Actor::load(&state.pool, auth.user_id).await?;

    let input = CreateRequest {
        title: body.title.trim().to_string(),
        department: body.department,
        priority: parse_opt::<Priority>(body.priority.as_deref())?.unwrap_or_default(),
        status: parse_opt(body.status.as_deref())?.unwrap_or(RequestStatus::Pending),
        needed_by: body.needed_by,
        from_location: body.from_location,
        to_location: body.to_location,
        purpose: body.purpose,
        created_by: actor.id,
        items: body.items,
    };

    let request = state.workflow.create(&actor, input).await?;
    let detail = load_detail(&state, request.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/requests
///
/// Employees see only their own requests.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListRequestsParams>,
) -> AppResult<Json<DataResponse<Vec<RequestSummary>>>> {
    let filter = RequestFilter {
        owner_id: auth.scope().owner_filter(),
        status: parse_opt(params.status.as_deref())?,
        priority: parse_opt(params.priority.as_deref())?,
        department: params.department.filter(|d| !d.is_empty()),
        search: params
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        limit: reqflow_db::clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT),
        offset: reqflow_db::clamp_offset(params.offset),
    };
    let requests = RequestRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /api/v1/requests/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RequestDetail>>> {
    let detail = load_detail(&state, id).await?;
    ensure_visible(&auth, detail.request.created_by)?;
    Ok(Json(DataResponse { data: detail }))
}

/// GET /api/v1/requests/{id}/history
///
/// Oldest entry first.
pub async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<HistoryEntry>>>> {
    let request = RequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Request",
            id,
        }))?;
    ensure_visible(&auth, request.created_by)?;
    let entries = HistoryRepo::list_for_request(&state.pool, id).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// PUT /api/v1/requests/{id}
pub async fn edit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(body): Json<EditRequestBody>,
) -> AppResult<Json<DataResponse<RequestDetail>>> {
    validate_body(&body)?;
    let actor = Actor::load(&state.pool, auth.user_id).await?;

    let input = UpdateRequest {
        title: body.title.map(|t| t.trim().to_string()),
        department: body.department,
        priority: parse_opt(body.priority.as_deref())?,
        needed_by: body.needed_by,
        from_location: body.from_location,
        to_location: body.to_location,
        purpose: body.purpose,
        items: body.items,
    };

    state.workflow.edit(&actor, id, input, body.submit).await?;
    let detail = load_detail(&state, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PATCH /api/v1/requests/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateStatusBody>,
) -> AppResult<Json<DataResponse<Request>>> {
    let target: RequestStatus = body.status.parse()?;
    let actor = Actor::load(&state.pool, auth.user_id).await?;
    let request = state
        .workflow
        .update_status(&actor, id, target, body.comment.as_deref())
        .await?;
    Ok(Json(DataResponse { data: request }))
}

/// PATCH /api/v1/requests/{id}/submit
pub async fn submit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Request>>> {
    let actor = Actor::load(&state.pool, auth.user_id).await?;
    let request = state.workflow.submit(&actor, id).await?;
    Ok(Json(DataResponse { data: request }))
}

/// PATCH /api/v1/requests/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(body): Json<CancelBody>,
) -> AppResult<Json<DataResponse<Request>>> {
    let actor = Actor::load(&state.pool, auth.user_id).await?;
    let request = state
        .workflow
        .cancel(&actor, id, body.reason.as_deref())
        .await?;
    Ok(Json(DataResponse { data: request }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_detail(state: &AppState, id: DbId) -> AppResult<RequestDetail> {
    RequestRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Request",
            id,
        }))
}

/// Owners and reviewers may read a request; anyone else is refused.
fn ensure_visible(auth: &AuthUser, owner_id: DbId) -> AppResult<()> {
    if auth.scope().permits(owner_id) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "You may only view your own requests".into(),
        )))
    }
}
