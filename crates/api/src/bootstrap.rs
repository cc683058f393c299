//! Startup seeding of the first administrator.

use reqflow_core::roles::Role;
use reqflow_core::types::DbId;
use reqflow_db::models::user::CreateUser;
use reqflow_db::repositories::UserRepo;
use sqlx::PgPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Create the configured admin account if no active admin exists yet.
///
/// Returns the new user's id, or `None` when an admin is already present.
pub async fn seed_admin(pool: &PgPool, admin: &BootstrapAdmin) -> AppResult<Option<DbId>> {
    if UserRepo::count_active_admins(pool).await? > 0 {
        tracing::debug!("Active admin present, skipping bootstrap");
        return Ok(None);
    }

    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: admin.name.clone(),
            email: admin.email.clone(),
            password_hash,
            role: Role::Admin,
            department: None,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap admin created");
    Ok(Some(user.id))
}
