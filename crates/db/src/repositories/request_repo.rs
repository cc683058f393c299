//! Repository for the `requests` and `request_items` tables.
//!
//! Status changes go through [`RequestRepo::transition`] and
//! [`RequestRepo::update`], both of which guard the write with the expected
//! current status (`WHERE id = $1 AND status = $2`). A racing writer that
//! loses sees zero affected rows and gets `Ok(None)` back; the caller decides
//! whether that means "not found" or "invalid state".

use sqlx::{PgPool, Postgres, Transaction};
use reqflow_core::request::{HistoryAction, RequestStatus};
use reqflow_core::types::DbId;
use reqflow_core::validation::total_cost;

use crate::models::history::NewHistoryEntry;
use crate::models::request::{
    CreateRequest, NewRequestItem, Request, RequestDetail, RequestFilter, RequestItem,
    RequestSummary, UpdateRequest,
};
use crate::repositories::HistoryRepo;

/// Column list for `requests` queries.
const COLUMNS: &str = "id, title, department, priority, status, needed_by, from_location, \
    to_location, purpose, rejection_reason, total_amount, created_by, created_at, updated_at";

/// Column list for `request_items` queries.
const ITEM_COLUMNS: &str =
    "id, request_id, position, name, category, quantity, unit, estimated_cost, created_at";

/// Select list for [`RequestSummary`] rows (aliases `r` = requests, `u` = users).
const SUMMARY_SELECT: &str = "SELECT r.id, r.title, r.department, r.priority, r.status, \
    r.needed_by, r.from_location, r.to_location, r.rejection_reason, r.total_amount, \
    r.created_by, u.name AS creator_name, \
    (SELECT COUNT(*) FROM request_items i WHERE i.request_id = r.id) AS item_count, \
    r.created_at, r.updated_at \
    FROM requests r JOIN users u ON u.id = r.created_by";

/// A guarded status change: move from `from` to `to`, writing `reason`
/// into `rejection_reason` (`None` clears it).
#[derive(Debug, Clone)]
pub struct Transition {
    pub from: RequestStatus,
    pub to: RequestStatus,
    pub reason: Option<String>,
}

/// Provides persistence for requests and their line items.
pub struct RequestRepo;

impl RequestRepo {
    /// Insert a request with its items and the initial history entries in
    /// one transaction.
    ///
    /// Writes a `created` entry, plus a `submitted` entry when the request
    /// starts out `pending`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRequest,
        actor_name: &str,
    ) -> Result<Request, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let total = total_cost(input.items.iter().map(|i| (i.quantity, i.estimated_cost)));
        let query = format!(
            "INSERT INTO requests
                (title, department, priority, status, needed_by, from_location,
                 to_location, purpose, total_amount, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        let request = sqlx::query_as::<_, Request>(&query)
            .bind(&input.title)
            .bind(&input.department)
            .bind(input.priority.as_str())
            .bind(input.status.as_str())
            .bind(input.needed_by)
            .bind(&input.from_location)
            .bind(&input.to_location)
            .bind(&input.purpose)
            .bind(total)
            .bind(input.created_by)
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_items(&mut tx, request.id, &input.items).await?;

        let created =
            NewHistoryEntry::new(request.id, HistoryAction::Created, input.created_by, actor_name);
        HistoryRepo::append_in_tx(&mut tx, &created).await?;
        if input.status == RequestStatus::Pending {
            let submitted = NewHistoryEntry::new(
                request.id,
                HistoryAction::Submitted,
                input.created_by,
                actor_name,
            );
            HistoryRepo::append_in_tx(&mut tx, &submitted).await?;
        }

        tx.commit().await?;
        Ok(request)
    }

    /// Find a request by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Request>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM requests WHERE id = $1");
        sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a request with its creator's name and items (in creation order).
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<RequestDetail>, sqlx::Error> {
        let Some(request) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let creator_name: String = sqlx::query_scalar("SELECT name FROM users WHERE id = $1")
            .bind(request.created_by)
            .fetch_one(pool)
            .await?;
        let items = Self::list_items(pool, id).await?;
        Ok(Some(RequestDetail::new(request, creator_name, items)))
    }

    /// Items of a request, ordered by position.
    pub async fn list_items(
        pool: &PgPool,
        request_id: DbId,
    ) -> Result<Vec<RequestItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM request_items
             WHERE request_id = $1
             ORDER BY position ASC"
        );
        sqlx::query_as::<_, RequestItem>(&query)
            .bind(request_id)
            .fetch_all(pool)
            .await
    }

    /// List requests matching `filter`, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &RequestFilter,
    ) -> Result<Vec<RequestSummary>, sqlx::Error> {
        let query = format!(
            "{SUMMARY_SELECT}
             WHERE ($1::BIGINT IS NULL OR r.created_by = $1)
               AND ($2::TEXT IS NULL OR r.status = $2)
               AND ($3::TEXT IS NULL OR r.priority = $3)
               AND ($4::TEXT IS NULL OR r.department = $4)
               AND ($5::TEXT IS NULL
                    OR r.title ILIKE '%' || $5 || '%'
                    OR r.purpose ILIKE '%' || $5 || '%')
             ORDER BY r.created_at DESC, r.id DESC
             LIMIT $6 OFFSET $7"
        );
        sqlx::query_as::<_, RequestSummary>(&query)
            .bind(filter.owner_id)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.priority.map(|p| p.as_str()))
            .bind(&filter.department)
            .bind(&filter.search)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await
    }

    /// The approval queue: pending requests, oldest first.
    pub async fn list_pending(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RequestSummary>, sqlx::Error> {
        let query = format!(
            "{SUMMARY_SELECT}
             WHERE r.status = $1
             ORDER BY r.created_at ASC, r.id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, RequestSummary>(&query)
            .bind(RequestStatus::Pending.as_str())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Apply a guarded status change and append its history entry in one
    /// transaction.
    ///
    /// Returns `None` (and writes nothing) if no row with `id` currently has
    /// status `transition.from`.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        transition: &Transition,
        history: &NewHistoryEntry,
    ) -> Result<Option<Request>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE requests SET status = $3, rejection_reason = $4
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .bind(transition.from.as_str())
            .bind(transition.to.as_str())
            .bind(&transition.reason)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(request) = updated else {
            tx.rollback().await?;
            return Ok(None);
        };

        HistoryRepo::append_in_tx(&mut tx, history).await?;
        tx.commit().await?;
        Ok(Some(request))
    }

    /// Apply an owner edit guarded by the expected status.
    ///
    /// Only non-`None` fields are applied. `Some(items)` deletes every
    /// existing item, inserts the new list, and recomputes `total_amount`.
    /// `transition.to` is either `transition.from` (plain edit) or `pending`
    /// (edit and resubmit); the rejection reason survives only while the
    /// request stays `rejected`. Every entry in `history` is appended in the
    /// same transaction.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        transition: &Transition,
        input: &UpdateRequest,
        history: &[NewHistoryEntry],
    ) -> Result<Option<Request>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE requests SET
                title = COALESCE($4, title),
                department = COALESCE($5, department),
                priority = COALESCE($6, priority),
                needed_by = COALESCE($7, needed_by),
                from_location = COALESCE($8, from_location),
                to_location = COALESCE($9, to_location),
                purpose = COALESCE($10, purpose),
                status = $3,
                rejection_reason = CASE WHEN $3 = 'rejected' THEN rejection_reason ELSE NULL END
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .bind(transition.from.as_str())
            .bind(transition.to.as_str())
            .bind(&input.title)
            .bind(&input.department)
            .bind(input.priority.map(|p| p.as_str()))
            .bind(input.needed_by)
            .bind(&input.from_location)
            .bind(&input.to_location)
            .bind(&input.purpose)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(mut request) = updated else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Some(items) = &input.items {
            sqlx::query("DELETE FROM request_items WHERE request_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::insert_items(&mut tx, id, items).await?;

            let total = total_cost(items.iter().map(|i| (i.quantity, i.estimated_cost)));
            let query = format!(
                "UPDATE requests SET total_amount = $2 WHERE id = $1 RETURNING {COLUMNS}"
            );
            request = sqlx::query_as::<_, Request>(&query)
                .bind(id)
                .bind(total)
                .fetch_one(&mut *tx)
                .await?;
        }

        for entry in history {
            HistoryRepo::append_in_tx(&mut tx, entry).await?;
        }

        tx.commit().await?;
        Ok(Some(request))
    }

    /// Hard-delete a request. Items, history, and notification links follow
    /// via the foreign keys. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM requests WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_items(
        tx: &mut Transaction<'_, Postgres>,
        request_id: DbId,
        items: &[NewRequestItem],
    ) -> Result<(), sqlx::Error> {
        for (position, item) in items.iter().enumerate() {
            sqlx::query(
                "INSERT INTO request_items
                    (request_id, position, name, category, quantity, unit, estimated_cost)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(request_id)
            .bind(position as i32)
            .bind(&item.name)
            .bind(&item.category)
            .bind(item.quantity)
            .bind(&item.unit)
            .bind(item.estimated_cost)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}
