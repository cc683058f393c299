//! Repository for the `departments` and `categories` tables.
//!
//! Both tables have the same columns, so one repository serves both and the
//! table name comes from a closed enum (never from caller input).

use sqlx::PgPool;
use reqflow_core::types::DbId;

use crate::models::reference::{CreateReferenceItem, ReferenceItem, UpdateReferenceItem};

/// Column list shared by both reference tables.
const COLUMNS: &str = "id, name, description, is_active, created_at, updated_at";

/// Which reference table to operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceTable {
    Departments,
    Categories,
}

impl ReferenceTable {
    pub fn table_name(self) -> &'static str {
        match self {
            ReferenceTable::Departments => "departments",
            ReferenceTable::Categories => "categories",
        }
    }

    /// Entity name used in `NotFound` errors.
    pub fn entity_name(self) -> &'static str {
        match self {
            ReferenceTable::Departments => "Department",
            ReferenceTable::Categories => "Category",
        }
    }
}

/// Provides CRUD operations for departments and categories.
pub struct ReferenceRepo;

impl ReferenceRepo {
    /// Insert a new entry, returning the created row.
    pub async fn create(
        pool: &PgPool,
        table: ReferenceTable,
        input: &CreateReferenceItem,
    ) -> Result<ReferenceItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO {} (name, description) VALUES ($1, $2) RETURNING {COLUMNS}",
            table.table_name()
        );
        sqlx::query_as::<_, ReferenceItem>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find an entry by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        table: ReferenceTable,
        id: DbId,
    ) -> Result<Option<ReferenceItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {} WHERE id = $1",
            table.table_name()
        );
        sqlx::query_as::<_, ReferenceItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List entries ordered by name, optionally including inactive ones.
    pub async fn list(
        pool: &PgPool,
        table: ReferenceTable,
        include_inactive: bool,
    ) -> Result<Vec<ReferenceItem>, sqlx::Error> {
        let filter = if include_inactive {
            ""
        } else {
            "WHERE is_active = true"
        };
        let query = format!(
            "SELECT {COLUMNS} FROM {} {filter} ORDER BY name ASC",
            table.table_name()
        );
        sqlx::query_as::<_, ReferenceItem>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update an entry. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        table: ReferenceTable,
        id: DbId,
        input: &UpdateReferenceItem,
    ) -> Result<Option<ReferenceItem>, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                is_active = COALESCE($4, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}",
            table.table_name()
        );
        sqlx::query_as::<_, ReferenceItem>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete an entry. Requests store department and category names as
    /// text, so existing requests are unaffected.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, table: ReferenceTable, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {} WHERE id = $1", table.table_name());
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
