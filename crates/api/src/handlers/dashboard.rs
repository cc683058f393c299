//! Handlers for the `/dashboard` resource. Results are scoped to the
//! caller's visible requests.

use axum::extract::{Query, State};
use axum::Json;
use reqflow_db::models::report::DashboardStats;
use reqflow_db::models::request::{RequestFilter, RequestSummary};
use reqflow_db::repositories::{ReportRepo, RequestRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_RECENT_LIMIT: i64 = 5;
const MAX_RECENT_LIMIT: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub limit: Option<i64>,
}

/// GET /api/v1/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let stats = ReportRepo::dashboard_stats(&state.pool, auth.scope().owner_filter()).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/dashboard/recent
pub async fn recent(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<RecentParams>,
) -> AppResult<Json<DataResponse<Vec<RequestSummary>>>> {
    let filter = RequestFilter {
        owner_id: auth.scope().owner_filter(),
        limit: reqflow_db::clamp_limit(params.limit, DEFAULT_RECENT_LIMIT, MAX_RECENT_LIMIT),
        ..RequestFilter::default()
    };
    let requests = RequestRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: requests }))
}
