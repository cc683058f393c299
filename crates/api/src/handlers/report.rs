//! Handlers for the `/reports` resource.
//!
//! Each report issues its aggregate queries concurrently; they are
//! independent read-committed snapshots.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use reqflow_core::reports::{clamp_months, fill_trend, month_buckets, month_start};
use reqflow_db::models::report::{ReportSummary, TrendReport};
use reqflow_db::repositories::{GroupColumn, ReportRepo};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TrendParams {
    pub months: Option<u32>,
}

/// GET /api/v1/reports/summary
pub async fn summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<ReportSummary>>> {
    let owner = auth.scope().owner_filter();
    let pool = &state.pool;

    let (stats, by_status, by_priority, by_department) = tokio::try_join!(
        ReportRepo::dashboard_stats(pool, owner),
        ReportRepo::count_by(pool, GroupColumn::Status, owner),
        ReportRepo::count_by(pool, GroupColumn::Priority, owner),
        ReportRepo::count_by(pool, GroupColumn::Department, owner),
    )?;

    Ok(Json(DataResponse {
        data: ReportSummary {
            request_count: stats.total,
            total_amount: stats.total_amount,
            by_status,
            by_priority,
            by_department,
        },
    }))
}

/// GET /api/v1/reports/trend?months=
///
/// One point per month, oldest first, ending with the current month.
/// Months without requests are zero.
pub async fn trend(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<TrendParams>,
) -> AppResult<Json<DataResponse<TrendReport>>> {
    let months = clamp_months(params.months);
    let now = Utc::now();
    let since = month_start(now, months - 1);

    let rows = ReportRepo::monthly_trend(&state.pool, since, auth.scope().owner_filter()).await?;
    let rows: Vec<_> = rows
        .into_iter()
        .map(|r| (r.month, r.total, r.approved, r.rejected))
        .collect();

    Ok(Json(DataResponse {
        data: TrendReport {
            months,
            points: fill_trend(&month_buckets(now, months), &rows),
        },
    }))
}
