//! Admin-managed reference data: departments and item categories.
//!
//! Both tables share one shape, so a single row type serves both.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use reqflow_core::types::{DbId, Timestamp};

/// A row from `departments` or `categories`.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceItem {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a department or category.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReferenceItem {
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating a department or category. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReferenceItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
