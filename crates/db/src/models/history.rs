//! Approval history log models.

use serde::Serialize;
use sqlx::FromRow;
use reqflow_core::request::HistoryAction;
use reqflow_core::types::{DbId, Timestamp};

/// A row from the append-only `request_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: DbId,
    pub request_id: DbId,
    pub action: String,
    pub actor_id: DbId,
    pub actor_name: String,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for appending a history entry.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub request_id: DbId,
    pub action: HistoryAction,
    pub actor_id: DbId,
    pub actor_name: String,
    pub comment: Option<String>,
}

impl NewHistoryEntry {
    pub fn new(
        request_id: DbId,
        action: HistoryAction,
        actor_id: DbId,
        actor_name: impl Into<String>,
    ) -> Self {
        Self {
            request_id,
            action,
            actor_id,
            actor_name: actor_name.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }
}
