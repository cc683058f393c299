//! Route definitions for the `/admin` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{admin, approval, reference};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// Role checks are enforced by handler extractors: `admin` everywhere
/// except bulk approval, which accepts any reviewer.
///
/// ```text
/// GET    /users                  -> list_users
/// POST   /users                  -> create_user
/// GET    /users/{id}             -> get_user
/// PUT    /users/{id}             -> update_user
/// DELETE /users/{id}             -> deactivate_user
/// DELETE /requests/{id}          -> delete_request
/// POST   /bulk-approve-requests  -> approval::bulk_approve
/// POST   /departments            -> create_department
/// PUT    /departments/{id}       -> update_department
/// DELETE /departments/{id}       -> delete_department
/// POST   /categories             -> create_category
/// PUT    /categories/{id}        -> update_category
/// DELETE /categories/{id}        -> delete_category
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/users/{id}",
            get(admin::get_user)
                .put(admin::update_user)
                .delete(admin::deactivate_user),
        )
        .route("/requests/{id}", axum::routing::delete(admin::delete_request))
        .route("/bulk-approve-requests", post(approval::bulk_approve))
        .route("/departments", post(reference::create_department))
        .route(
            "/departments/{id}",
            put(reference::update_department).delete(reference::delete_department),
        )
        .route("/categories", post(reference::create_category))
        .route(
            "/categories/{id}",
            put(reference::update_category).delete(reference::delete_category),
        )
}
