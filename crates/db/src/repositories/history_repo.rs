//! Repository for the append-only `request_history` table.
//!
//! Entries are never updated or deleted here; they disappear only
//! when their request is deleted (`ON DELETE CASCADE`).

use sqlx::{PgPool, Postgres, Transaction};
use reqflow_core::types::DbId;

use crate::models::history::{HistoryEntry, NewHistoryEntry};

/// Column list for `request_history` queries.
const COLUMNS: &str = "id, request_id, action, actor_id, actor_name, comment, created_at";

/// Append and read operations for the approval history log.
pub struct HistoryRepo;

impl HistoryRepo {
    /// Append one entry inside an open transaction, so it commits or rolls
    /// back together with the status write it records.
    pub async fn append_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        entry: &NewHistoryEntry,
    ) -> Result<HistoryEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO request_history (request_id, action, actor_id, actor_name, comment)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HistoryEntry>(&query)
            .bind(entry.request_id)
            .bind(entry.action.as_str())
            .bind(entry.actor_id)
            .bind(&entry.actor_name)
            .bind(&entry.comment)
            .fetch_one(&mut **tx)
            .await
    }

    /// All entries for a request, oldest first.
    pub async fn list_for_request(
        pool: &PgPool,
        request_id: DbId,
    ) -> Result<Vec<HistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM request_history
             WHERE request_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, HistoryEntry>(&query)
            .bind(request_id)
            .fetch_all(pool)
            .await
    }
}
