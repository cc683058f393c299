//! Handlers for the `/notifications` resource.
//!
//! Every handler operates on the caller's own notifications.

use axum::extract::{Path, Query, State};
use axum::Json;
use reqflow_core::error::CoreError;
use reqflow_core::types::DbId;
use reqflow_db::models::notification::Notification;
use reqflow_db::repositories::NotificationRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{DEFAULT_LIMIT, MAX_LIMIT};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotificationsParams {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct MarkAllReadResult {
    pub updated: u64,
}

/// GET /api/v1/notifications
///
/// Newest first.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListNotificationsParams>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let limit = reqflow_db::clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let offset = reqflow_db::clamp_offset(params.offset);
    let notifications =
        NotificationRepo::list_for_user(&state.pool, auth.user_id, params.unread_only, limit, offset)
            .await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<UnreadCount>>> {
    let count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: UnreadCount { count },
    }))
}

/// PATCH /api/v1/notifications/{id}/read
///
/// A user may only mark their own notifications.
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Notification>>> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id,
        })
    };

    let existing = NotificationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    if existing.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You may only mark your own notifications as read".into(),
        )));
    }

    let notification = NotificationRepo::mark_read(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(DataResponse { data: notification }))
}

/// PATCH /api/v1/notifications/mark-all-read
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<MarkAllReadResult>>> {
    let updated = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;
    tracing::debug!(user_id = auth.user_id, updated, "Marked notifications read");
    Ok(Json(DataResponse {
        data: MarkAllReadResult { updated },
    }))
}
