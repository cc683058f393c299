//! Handlers for departments and item categories.
//!
//! Listing is open to any authenticated user; writes require `admin`.
//! Both resources share one implementation parameterized by
//! [`ReferenceTable`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use reqflow_core::error::CoreError;
use reqflow_core::types::DbId;
use reqflow_db::models::reference::{CreateReferenceItem, ReferenceItem, UpdateReferenceItem};
use reqflow_db::repositories::{ReferenceRepo, ReferenceTable};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

type ItemResponse = AppResult<Json<DataResponse<ReferenceItem>>>;
type CreatedResponse = AppResult<(StatusCode, Json<DataResponse<ReferenceItem>>)>;
type ListResponse = AppResult<Json<DataResponse<Vec<ReferenceItem>>>>;

// ---------------------------------------------------------------------------
// Shared implementation
// ---------------------------------------------------------------------------

async fn list(state: &AppState, table: ReferenceTable, include_inactive: bool) -> ListResponse {
    let items = ReferenceRepo::list(&state.pool, table, include_inactive).await?;
    Ok(Json(DataResponse { data: items }))
}

async fn create(state: &AppState, table: ReferenceTable, input: CreateReferenceItem) -> CreatedResponse {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{} name is required",
            table.entity_name()
        ))));
    }
    let item = ReferenceRepo::create(
        &state.pool,
        table,
        &CreateReferenceItem {
            name,
            description: input.description,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

async fn update(
    state: &AppState,
    table: ReferenceTable,
    id: DbId,
    input: UpdateReferenceItem,
) -> ItemResponse {
    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{} name cannot be empty",
            table.entity_name()
        ))));
    }
    let item = ReferenceRepo::update(&state.pool, table, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: table.entity_name(),
            id,
        }))?;
    Ok(Json(DataResponse { data: item }))
}

async fn delete(state: &AppState, table: ReferenceTable, id: DbId) -> AppResult<StatusCode> {
    if ReferenceRepo::delete(&state.pool, table, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: table.entity_name(),
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Departments
// ---------------------------------------------------------------------------

/// GET /api/v1/departments
pub async fn list_departments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<IncludeInactiveParams>,
) -> ListResponse {
    list(&state, ReferenceTable::Departments, params.include_inactive).await
}

/// POST /api/v1/admin/departments
pub async fn create_department(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateReferenceItem>,
) -> CreatedResponse {
    create(&state, ReferenceTable::Departments, input).await
}

/// PUT /api/v1/admin/departments/{id}
pub async fn update_department(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReferenceItem>,
) -> ItemResponse {
    update(&state, ReferenceTable::Departments, id, input).await
}

/// DELETE /api/v1/admin/departments/{id}
pub async fn delete_department(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    delete(&state, ReferenceTable::Departments, id).await
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// GET /api/v1/categories
pub async fn list_categories(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<IncludeInactiveParams>,
) -> ListResponse {
    list(&state, ReferenceTable::Categories, params.include_inactive).await
}

/// POST /api/v1/admin/categories
pub async fn create_category(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateReferenceItem>,
) -> CreatedResponse {
    create(&state, ReferenceTable::Categories, input).await
}

/// PUT /api/v1/admin/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReferenceItem>,
) -> ItemResponse {
    update(&state, ReferenceTable::Categories, id, input).await
}

/// DELETE /api/v1/admin/categories/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    delete(&state, ReferenceTable::Categories, id).await
}
