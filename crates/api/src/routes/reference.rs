//! Read routes for departments and categories. Their admin write routes
//! live under `/admin` (see [`super::admin`]).

use axum::routing::get;
use axum::Router;

use crate::handlers::reference;
use crate::state::AppState;

/// Routes merged at the `/api/v1` root.
///
/// ```text
/// GET /departments  -> list_departments
/// GET /categories   -> list_categories
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/departments", get(reference::list_departments))
        .route("/categories", get(reference::list_categories))
}
