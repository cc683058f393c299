//! Read-only aggregations over `requests` for the dashboard and reports.
//!
//! Every query takes an optional `owner_id`; `Some(id)` restricts the
//! aggregate to requests created by that user.

use chrono::NaiveDate;
use sqlx::PgPool;
use reqflow_core::types::DbId;

use crate::models::report::{DashboardStats, GroupCount, TrendRow};

/// Column a [`ReportRepo::count_by`] query groups on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupColumn {
    Status,
    Priority,
    Department,
}

impl GroupColumn {
    fn column(self) -> &'static str {
        match self {
            GroupColumn::Status => "status",
            GroupColumn::Priority => "priority",
            GroupColumn::Department => "department",
        }
    }
}

/// Provides aggregate queries for dashboards and reports.
pub struct ReportRepo;

impl ReportRepo {
    /// Headline counts per status plus amount totals.
    pub async fn dashboard_stats(
        pool: &PgPool,
        owner_id: Option<DbId>,
    ) -> Result<DashboardStats, sqlx::Error> {
        sqlx::query_as::<_, DashboardStats>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'draft') AS draft,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'approved') AS approved,
                COUNT(*) FILTER (WHERE status = 'rejected') AS rejected,
                COUNT(*) FILTER (WHERE status = 'cancelled') AS cancelled,
                COALESCE(SUM(total_amount), 0)::DOUBLE PRECISION AS total_amount,
                COALESCE(SUM(total_amount) FILTER (WHERE status = 'approved'), 0)::DOUBLE PRECISION
                    AS approved_amount
             FROM requests
             WHERE ($1::BIGINT IS NULL OR created_by = $1)",
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await
    }

    /// Request count and amount per distinct value of `group`, largest
    /// count first.
    pub async fn count_by(
        pool: &PgPool,
        group: GroupColumn,
        owner_id: Option<DbId>,
    ) -> Result<Vec<GroupCount>, sqlx::Error> {
        let column = group.column();
        let query = format!(
            "SELECT {column} AS key,
                    COUNT(*) AS count,
                    COALESCE(SUM(total_amount), 0)::DOUBLE PRECISION AS total_amount
             FROM requests
             WHERE ($1::BIGINT IS NULL OR created_by = $1)
             GROUP BY {column}
             ORDER BY count DESC, key ASC"
        );
        sqlx::query_as::<_, GroupCount>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Per-month totals for requests created on or after `since`. Months
    /// without requests produce no row.
    pub async fn monthly_trend(
        pool: &PgPool,
        since: NaiveDate,
        owner_id: Option<DbId>,
    ) -> Result<Vec<TrendRow>, sqlx::Error> {
        sqlx::query_as::<_, TrendRow>(
            "SELECT to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM') AS month,
                    COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE status = 'approved') AS approved,
                    COUNT(*) FILTER (WHERE status = 'rejected') AS rejected
             FROM requests
             WHERE created_at >= ($1::DATE)::TIMESTAMP AT TIME ZONE 'UTC'
               AND ($2::BIGINT IS NULL OR created_by = $2)
             GROUP BY month
             ORDER BY month ASC",
        )
        .bind(since)
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }
}
