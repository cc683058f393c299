//! Read-side aggregate rows for the dashboard and reports.

use serde::Serialize;
use sqlx::FromRow;
use reqflow_core::reports::TrendPoint;

/// Headline counters for the dashboard.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: i64,
    pub draft: i64,
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub cancelled: i64,
    pub total_amount: f64,
    pub approved_amount: f64,
}

/// Count and amount for one group key (a status, priority, or department).
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCount {
    pub key: String,
    pub count: i64,
    pub total_amount: f64,
}

/// Raw month row as returned by the trend query.
#[derive(Debug, Clone, FromRow)]
pub struct TrendRow {
    pub month: String,
    pub total: i64,
    pub approved: i64,
    pub rejected: i64,
}

/// Full summary report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub request_count: i64,
    pub total_amount: f64,
    pub by_status: Vec<GroupCount>,
    pub by_priority: Vec<GroupCount>,
    pub by_department: Vec<GroupCount>,
}

/// Month-over-month trend report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub months: u32,
    pub points: Vec<TrendPoint>,
}
