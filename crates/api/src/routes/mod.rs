pub mod admin;
pub mod approvals;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod notifications;
pub mod reference;
pub mod reports;
pub mod requests;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` REST route tree. The WebSocket endpoint at
/// `/api/v1/ws` is mounted by the router builder, outside the request timeout.
///
/// ```text
/// /auth/login                           login (public)
/// /auth/me                              current user
///
/// /requests                             list, create
/// /requests/{id}                        get, edit
/// /requests/{id}/history                history log
/// /requests/{id}/status                 status change (PATCH)
/// /requests/{id}/submit                 submit (PATCH)
/// /requests/{id}/cancel                 cancel (PATCH)
///
/// /approvals/pending                    review queue (reviewer)
/// /approvals/{id}/approve               approve (POST, reviewer)
/// /approvals/{id}/reject                reject (POST, reviewer)
/// /approvals/bulk-approve               bulk approve (POST, reviewer)
///
/// /notifications                        own notifications
/// /notifications/unread-count           unread count
/// /notifications/mark-all-read          mark all read (PATCH)
/// /notifications/{id}/read              mark one read (PATCH)
///
/// /departments                          list
/// /categories                           list
///
/// /dashboard/stats                      headline counters
/// /dashboard/recent                     latest requests
/// /reports/summary                      grouped totals
/// /reports/trend                        month-over-month trend
///
/// /admin/users                          list, create (admin)
/// /admin/users/{id}                     get, update, deactivate
/// /admin/requests/{id}                  delete (admin)
/// /admin/bulk-approve-requests          bulk approve (reviewer)
/// /admin/departments[/{id}]             create, update, delete
/// /admin/categories[/{id}]              create, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/requests", requests::router())
        .nest("/approvals", approvals::router())
        .nest("/notifications", notifications::router())
        .nest("/dashboard", dashboard::router())
        .nest("/reports", reports::router())
        .nest("/admin", admin::router())
        .merge(reference::router())
}
