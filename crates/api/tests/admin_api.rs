//! Integration tests for the `/admin` endpoints and reference data.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json, post_json_auth, put_json_auth};
use reqflow_core::roles::Role;
use reqflow_db::repositories::{HistoryRepo, NotificationRepo, RequestRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_creates_user_who_can_log_in(pool: PgPool) {
    let cast = common::seed_cast(&pool).await;
    let ada = common::token_for(&cast.admin);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/users",
        serde_json::json!({
            "name": "Nina",
            "email": "  Nina@Example.com ",
            "password": "long-enough-secret",
            "role": "procurement",
            "department": "Finance"
        }),
        &ada,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "nina@example.com");
    assert_eq!(json["data"]["role"], "procurement");
    assert!(json["data"].get("passwordHash").is_none());

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "nina@example.com", "password": "long-enough-secret" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_user_rejects_bad_input(pool: PgPool) {
    let cast = common::seed_cast(&pool).await;
    let ada = common::token_for(&cast.admin);

    let cases = [
        (
            serde_json::json!({ "name": "Nina", "email": "nina@example.com", "password": "short", "role": "employee" }),
            StatusCode::BAD_REQUEST,
        ),
        (
            serde_json::json!({ "name": "Nina", "email": "nina@example.com", "password": "long-enough-secret", "role": "boss" }),
            StatusCode::BAD_REQUEST,
        ),
        (
            serde_json::json!({ "name": "Erin Again", "email": "erin@example.com", "password": "long-enough-secret", "role": "employee" }),
            StatusCode::CONFLICT,
        ),
    ];

    for (body, expected) in cases {
        let response =
            post_json_auth(common::build_test_app(pool.clone()), "/api/v1/admin/users", body, &ada).await;
        assert_eq!(response.status(), expected);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_admins_cannot_manage_users(pool: PgPool) {
    let cast = common::seed_cast(&pool).await;

    for user in [&cast.employee, &cast.procurement] {
        let token = common::token_for(user);
        let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/admin/users", &token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivated_user_loses_access(pool: PgPool) {
    let cast = common::seed_cast(&pool).await;
    let ada = common::token_for(&cast.admin);
    let oscar = common::token_for(&cast.other_employee);

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/users/{}", cast.other_employee.id),
        &ada,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The token is still valid, but the account is gone.
    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/auth/me", &oscar).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "oscar@example.com", "password": common::TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn last_admin_cannot_be_removed(pool: PgPool) {
    let cast = common::seed_cast(&pool).await;
    let ada = common::token_for(&cast.admin);
    let uri = format!("/api/v1/admin/users/{}", cast.admin.id);

    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &ada).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        serde_json::json!({ "role": "employee" }),
        &ada,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .contains("active admin"));

    // With a second admin, demotion goes through.
    let second = common::create_user(&pool, "Abe", Role::Admin).await;
    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/users/{}", second.id),
        serde_json::json!({ "role": "procurement", "department": "Finance" }),
        &ada,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "procurement");
    assert_eq!(json["data"]["department"], "Finance");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_cannot_deactivate_self_even_with_peers(pool: PgPool) {
    let cast = common::seed_cast(&pool).await;
    common::create_user(&pool, "Abe", Role::Admin).await;
    let ada = common::token_for(&cast.admin);

    let response = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/users/{}", cast.admin.id),
        serde_json::json!({ "isActive": false }),
        &ada,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_user_trims_email_before_validating(pool: PgPool) {
    let cast = common::seed_cast(&pool).await;
    let ada = common::token_for(&cast.admin);

    let response = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/users/{}", cast.other_employee.id),
        serde_json::json!({ "email": " Oscar.New@Example.com  " }),
        &ada,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["email"], "oscar.new@example.com");
}

// ---------------------------------------------------------------------------
// Stale tokens
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivated_admin_token_is_rejected_on_admin_routes(pool: PgPool) {
    let cast = common::seed_cast(&pool).await;
    let erin = common::token_for(&cast.employee);
    let ada = common::token_for(&cast.admin);
    let zed = common::create_user(&pool, "Zed", Role::Admin).await;
    let zed_token = common::token_for(&zed);
    let id = common::create_request(common::build_test_app(pool.clone()), &erin, common::laptop_request()).await;

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/users/{}", zed.id),
        serde_json::json!({ "isActive": false }),
        &ada,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/users",
        serde_json::json!({
            "name": "Mallory",
            "email": "mallory@example.com",
            "password": "long-enough-secret",
            "role": "admin"
        }),
        &zed_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/requests/{id}"),
        &zed_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/requests", &zed_token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert!(RequestRepo::find_by_id(&pool, id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn demoted_reviewer_token_loses_review_access(pool: PgPool) {
    let cast = common::seed_cast(&pool).await;
    let ada = common::token_for(&cast.admin);
    let priya = common::token_for(&cast.procurement);

    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/approvals/pending", &priya).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/users/{}", cast.procurement.id),
        serde_json::json!({ "role": "employee" }),
        &ada,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Same token, but the stored role is now employee.
    let response = get_auth(common::build_test_app(pool), "/api/v1/approvals/pending", &priya).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Request deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_request_removes_history_and_unlinks_notifications(pool: PgPool) {
    let cast = common::seed_cast(&pool).await;
    let erin = common::token_for(&cast.employee);
    let ada = common::token_for(&cast.admin);
    let id = common::create_request(common::build_test_app(pool.clone()), &erin, common::laptop_request()).await;

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/requests/{id}"),
        &ada,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(RequestRepo::find_by_id(&pool, id).await.unwrap().is_none());
    assert!(HistoryRepo::list_for_request(&pool, id).await.unwrap().is_empty());
    let notes = NotificationRepo::list_for_user(&pool, cast.procurement.id, false, 10, 0)
        .await
        .unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].request_id, None);

    let response = delete_auth(
        common::build_test_app(pool),
        &format!("/api/v1/admin/requests/{id}"),
        &ada,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn department_crud(pool: PgPool) {
    let cast = common::seed_cast(&pool).await;
    let ada = common::token_for(&cast.admin);
    let erin = common::token_for(&cast.employee);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/departments",
        serde_json::json!({ "name": " Logistics ", "description": "Warehouse and transport" }),
        &ada,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(json["data"]["name"], "Logistics");

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/departments",
        serde_json::json!({ "name": "Logistics" }),
        &ada,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/departments/{id}"),
        serde_json::json!({ "isActive": false }),
        &ada,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Inactive entries are hidden unless asked for.
    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/departments", &erin).await;
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().iter().all(|d| d["id"] != id));

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/departments?includeInactive=true",
        &erin,
    )
    .await;
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().iter().any(|d| d["id"] == id));

    let uri = format!("/api/v1/admin/departments/{id}");
    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &ada).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = delete_auth(common::build_test_app(pool), &uri, &ada).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn category_writes_require_admin(pool: PgPool) {
    let cast = common::seed_cast(&pool).await;
    let priya = common::token_for(&cast.procurement);
    let ada = common::token_for(&cast.admin);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/categories",
        serde_json::json!({ "name": "Furniture" }),
        &priya,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/categories",
        serde_json::json!({ "name": "   " }),
        &ada,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/categories",
        serde_json::json!({ "name": "Furniture" }),
        &ada,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(common::build_test_app(pool), "/api/v1/categories", &priya).await;
    let json = body_json(response).await;
    assert!(json["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["name"] == "Furniture"));
}
