//! Notification entity model and DTO.

use serde::Serialize;
use sqlx::FromRow;
use reqflow_core::notification::NotificationKind;
use reqflow_core::types::{DbId, Timestamp};

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    /// Wire name is `type` to match the client's notification payload.
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    pub request_id: Option<DbId>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating a notification.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub request_id: Option<DbId>,
}
