//! Request and line-item models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use reqflow_core::error::CoreError;
use reqflow_core::request::{Priority, RequestStatus};
use reqflow_core::types::{Date, DbId, Timestamp};

/// A row from the `requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: DbId,
    pub title: String,
    pub department: String,
    pub priority: String,
    pub status: String,
    pub needed_by: Option<Date>,
    pub from_location: String,
    pub to_location: String,
    pub purpose: String,
    pub rejection_reason: Option<String>,
    /// Denormalized sum of `quantity * estimated_cost`, rewritten whenever
    /// the items are.
    pub total_amount: f64,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Request {
    /// Parse the stored status text.
    pub fn status(&self) -> Result<RequestStatus, CoreError> {
        self.status.parse()
    }
}

/// A request row joined with its creator's name and item count, used by
/// listings and dashboards.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    pub id: DbId,
    pub title: String,
    pub department: String,
    pub priority: String,
    pub status: String,
    pub needed_by: Option<Date>,
    pub from_location: String,
    pub to_location: String,
    pub rejection_reason: Option<String>,
    pub total_amount: f64,
    pub created_by: DbId,
    pub creator_name: String,
    pub item_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `request_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestItem {
    pub id: DbId,
    pub request_id: DbId,
    pub position: i32,
    pub name: String,
    pub category: String,
    pub quantity: i32,
    pub unit: String,
    pub estimated_cost: f64,
    pub created_at: Timestamp,
}

/// A request with its items and read-time total, returned by `GET /requests/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetail {
    #[serde(flatten)]
    pub request: Request,
    pub creator_name: String,
    pub items: Vec<RequestItem>,
    /// Sum of `quantity * estimated_cost` over `items`, computed on read.
    pub total_cost: f64,
}

impl RequestDetail {
    pub fn new(request: Request, creator_name: String, items: Vec<RequestItem>) -> Self {
        let total_cost =
            reqflow_core::validation::total_cost(items.iter().map(|i| (i.quantity, i.estimated_cost)));
        Self {
            request,
            creator_name,
            items,
            total_cost,
        }
    }
}

/// One line item in a create or edit payload.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewRequestItem {
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub quantity: i32,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub estimated_cost: f64,
}

fn default_unit() -> String {
    "pcs".to_string()
}

/// DTO for inserting a request together with its items.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub title: String,
    pub department: String,
    pub priority: Priority,
    /// Either `Draft` or `Pending`.
    pub status: RequestStatus,
    pub needed_by: Option<Date>,
    pub from_location: String,
    pub to_location: String,
    pub purpose: String,
    pub created_by: DbId,
    pub items: Vec<NewRequestItem>,
}

/// DTO for an owner edit. `None` fields are left unchanged; `Some(items)`
/// replaces every existing item.
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    pub title: Option<String>,
    pub department: Option<String>,
    pub priority: Option<Priority>,
    pub needed_by: Option<Date>,
    pub from_location: Option<String>,
    pub to_location: Option<String>,
    pub purpose: Option<String>,
    pub items: Option<Vec<NewRequestItem>>,
}

/// Listing filter. `owner_id` carries the caller's visibility scope.
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub owner_id: Option<DbId>,
    pub status: Option<RequestStatus>,
    pub priority: Option<Priority>,
    pub department: Option<String>,
    /// Case-insensitive substring match on title and purpose.
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}
