//! Handlers for the `/admin` resource (user management, request deletion).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use reqflow_core::error::CoreError;
use reqflow_core::roles::Role;
use reqflow_core::types::DbId;
use reqflow_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use reqflow_db::repositories::{RequestRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use super::{parse_opt, trimmed, trimmed_opt, validate_body};
use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
    pub role: String,
    pub department: Option<String>,
}

/// Request body for `PUT /admin/users/{id}`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    validate_body(&input)?;
    let role: Role = input.role.parse()?;

    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name.trim().to_string(),
            email: input.email.to_lowercase(),
            password_hash,
            role,
            department: input.department,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, role = %role, admin_id = admin.user_id, "User created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(&user),
        }),
    ))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.iter().map(UserResponse::from).collect(),
    }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = find_user(&state, id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// PUT /api/v1/admin/users/{id}
///
/// Refuses changes that would leave no active admin.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    validate_body(&input)?;
    let role: Option<Role> = parse_opt(input.role.as_deref())?;
    let existing = find_user(&state, id).await?;

    let deactivating = input.is_active == Some(false);
    if deactivating && id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "You cannot deactivate your own account".into(),
        )));
    }
    let demoting = role.is_some_and(|r| r != Role::Admin);
    if (deactivating || demoting) && is_last_active_admin(&state, &existing).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "At least one active admin must remain".into(),
        )));
    }

    let update = UpdateUser {
        name: input.name.map(|n| n.trim().to_string()),
        email: input.email.map(|e| e.to_lowercase()),
        role,
        department: input.department,
        is_active: input.is_active,
    };
    let user = UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(user_id = id, admin_id = admin.user_id, "User updated");
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Soft-deactivates the user. Returns 204 No Content.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "You cannot deactivate your own account".into(),
        )));
    }
    let existing = find_user(&state, id).await?;
    if is_last_active_admin(&state, &existing).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "At least one active admin must remain".into(),
        )));
    }

    UserRepo::deactivate(&state.pool, id).await?;
    tracing::info!(user_id = id, admin_id = admin.user_id, "User deactivated");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// DELETE /api/v1/admin/requests/{id}
///
/// Hard delete. Items and history go with the request; linked notifications
/// keep their text but lose the link.
pub async fn delete_request(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !RequestRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Request",
            id,
        }));
    }
    tracing::info!(request_id = id, admin_id = admin.user_id, "Request deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

async fn is_last_active_admin(state: &AppState, user: &User) -> AppResult<bool> {
    if !user.is_active || user.role()? != Role::Admin {
        return Ok(false);
    }
    Ok(UserRepo::count_active_admins(&state.pool).await? <= 1)
}
