//! Integration tests for the request store and its history log.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Items round-trip in creation order with the denormalized total in sync
//! - Creation writes `created` (and `submitted` for pending) history entries
//! - Guarded transitions write nothing when the expected status does not match
//! - Racing transitions on the same row let exactly one writer through
//! - Edits replace items wholesale and recompute the total
//! - Deleting a request cascades to its items and history

use sqlx::PgPool;
use reqflow_core::request::{HistoryAction, Priority, RequestStatus};
use reqflow_core::roles::Role;
use reqflow_db::models::history::NewHistoryEntry;
use reqflow_db::models::request::{CreateRequest, NewRequestItem, RequestFilter, UpdateRequest};
use reqflow_db::models::user::CreateUser;
use reqflow_db::repositories::{HistoryRepo, RequestRepo, Transition, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, name: &str, role: Role) -> i64 {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: "not-a-real-hash".to_string(),
            role,
            department: Some("IT".to_string()),
        },
    )
    .await
    .unwrap();
    user.id
}

fn item(name: &str, quantity: i32, cost: f64) -> NewRequestItem {
    NewRequestItem {
        name: name.to_string(),
        category: "Hardware".to_string(),
        quantity,
        unit: "pcs".to_string(),
        estimated_cost: cost,
    }
}

fn new_request(owner: i64, status: RequestStatus, items: Vec<NewRequestItem>) -> CreateRequest {
    CreateRequest {
        title: "Laptop".to_string(),
        department: "IT".to_string(),
        priority: Priority::High,
        status,
        needed_by: None,
        from_location: "Warehouse".to_string(),
        to_location: "Office 3".to_string(),
        purpose: "New hire".to_string(),
        created_by: owner,
        items,
    }
}

fn actions(entries: &[reqflow_db::models::history::HistoryEntry]) -> Vec<String> {
    entries.iter().map(|e| e.action.clone()).collect()
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn items_round_trip_in_creation_order(pool: PgPool) {
    let owner = seed_user(&pool, "Ana", Role::Employee).await;
    let items = vec![item("Dell XPS", 2, 500.0), item("Dock", 1, 120.5), item("Mouse", 3, 10.0)];

    let created = RequestRepo::create(&pool, &new_request(owner, RequestStatus::Pending, items.clone()), "Ana")
        .await
        .unwrap();
    assert_eq!(created.status, "pending");
    assert_eq!(created.total_amount, 1150.5);

    let detail = RequestRepo::find_detail(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(detail.creator_name, "Ana");
    assert_eq!(detail.items.len(), items.len());
    for (stored, sent) in detail.items.iter().zip(&items) {
        assert_eq!(stored.name, sent.name);
        assert_eq!(stored.category, sent.category);
        assert_eq!(stored.quantity, sent.quantity);
        assert_eq!(stored.unit, sent.unit);
        assert_eq!(stored.estimated_cost, sent.estimated_cost);
    }
    assert_eq!(detail.total_cost, detail.request.total_amount);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn creation_writes_initial_history(pool: PgPool) {
    let owner = seed_user(&pool, "Ana", Role::Employee).await;

    let draft = RequestRepo::create(&pool, &new_request(owner, RequestStatus::Draft, vec![]), "Ana")
        .await
        .unwrap();
    let pending =
        RequestRepo::create(&pool, &new_request(owner, RequestStatus::Pending, vec![]), "Ana")
            .await
            .unwrap();

    let draft_log = HistoryRepo::list_for_request(&pool, draft.id).await.unwrap();
    assert_eq!(actions(&draft_log), vec!["created"]);
    assert_eq!(draft_log[0].actor_id, owner);
    assert_eq!(draft_log[0].actor_name, "Ana");

    let pending_log = HistoryRepo::list_for_request(&pool, pending.id).await.unwrap();
    assert_eq!(actions(&pending_log), vec!["created", "submitted"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_applies_owner_scope_and_filters(pool: PgPool) {
    let ana = seed_user(&pool, "Ana", Role::Employee).await;
    let ben = seed_user(&pool, "Ben", Role::Employee).await;

    RequestRepo::create(&pool, &new_request(ana, RequestStatus::Draft, vec![item("A", 1, 1.0)]), "Ana")
        .await
        .unwrap();
    RequestRepo::create(&pool, &new_request(ana, RequestStatus::Pending, vec![]), "Ana")
        .await
        .unwrap();
    RequestRepo::create(&pool, &new_request(ben, RequestStatus::Pending, vec![]), "Ben")
        .await
        .unwrap();

    let mut filter = RequestFilter {
        owner_id: Some(ana),
        limit: 50,
        ..Default::default()
    };
    let own = RequestRepo::list(&pool, &filter).await.unwrap();
    assert_eq!(own.len(), 2);
    assert!(own.iter().all(|r| r.created_by == ana));

    filter.status = Some(RequestStatus::Draft);
    let drafts = RequestRepo::list(&pool, &filter).await.unwrap();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].item_count, 1);
    assert_eq!(drafts[0].creator_name, "Ana");

    let everyone = RequestRepo::list(
        &pool,
        &RequestFilter {
            search: Some("lapt".to_string()),
            limit: 50,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(everyone.len(), 3);

    let queue = RequestRepo::list_pending(&pool, 50, 0).await.unwrap();
    assert_eq!(queue.len(), 2);
    assert!(queue[0].created_at <= queue[1].created_at);
}

// ---------------------------------------------------------------------------
// Guarded transitions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn transition_applies_status_reason_and_history(pool: PgPool) {
    let owner = seed_user(&pool, "Ana", Role::Employee).await;
    let reviewer = seed_user(&pool, "Pat", Role::Procurement).await;
    let request = RequestRepo::create(&pool, &new_request(owner, RequestStatus::Pending, vec![]), "Ana")
        .await
        .unwrap();

    let rejected = RequestRepo::transition(
        &pool,
        request.id,
        &Transition {
            from: RequestStatus::Pending,
            to: RequestStatus::Rejected,
            reason: Some("over budget".to_string()),
        },
        &NewHistoryEntry::new(request.id, HistoryAction::Rejected, reviewer, "Pat")
            .with_comment(Some("over budget".to_string())),
    )
    .await
    .unwrap()
    .expect("pending request should transition");

    assert_eq!(rejected.status, "rejected");
    assert_eq!(rejected.rejection_reason.as_deref(), Some("over budget"));

    let log = HistoryRepo::list_for_request(&pool, request.id).await.unwrap();
    assert_eq!(actions(&log), vec!["created", "submitted", "rejected"]);
    assert_eq!(log[2].comment.as_deref(), Some("over budget"));
    assert_eq!(log[2].actor_id, reviewer);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stale_transition_writes_nothing(pool: PgPool) {
    let owner = seed_user(&pool, "Ana", Role::Employee).await;
    let reviewer = seed_user(&pool, "Pat", Role::Procurement).await;
    let request = RequestRepo::create(&pool, &new_request(owner, RequestStatus::Draft, vec![]), "Ana")
        .await
        .unwrap();

    let result = RequestRepo::transition(
        &pool,
        request.id,
        &Transition {
            from: RequestStatus::Pending,
            to: RequestStatus::Approved,
            reason: None,
        },
        &NewHistoryEntry::new(request.id, HistoryAction::Approved, reviewer, "Pat"),
    )
    .await
    .unwrap();
    assert!(result.is_none());

    let unchanged = RequestRepo::find_by_id(&pool, request.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, "draft");
    let log = HistoryRepo::list_for_request(&pool, request.id).await.unwrap();
    assert_eq!(actions(&log), vec!["created"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn racing_transitions_let_exactly_one_through(pool: PgPool) {
    let owner = seed_user(&pool, "Ana", Role::Employee).await;
    let first = seed_user(&pool, "Pat", Role::Procurement).await;
    let second = seed_user(&pool, "Sam", Role::Admin).await;
    let request = RequestRepo::create(&pool, &new_request(owner, RequestStatus::Pending, vec![]), "Ana")
        .await
        .unwrap();

    let approve = Transition {
        from: RequestStatus::Pending,
        to: RequestStatus::Approved,
        reason: None,
    };
    let reject = Transition {
        from: RequestStatus::Pending,
        to: RequestStatus::Rejected,
        reason: Some("duplicate".to_string()),
    };
    let approve_entry = NewHistoryEntry::new(request.id, HistoryAction::Approved, first, "Pat");
    let reject_entry = NewHistoryEntry::new(request.id, HistoryAction::Rejected, second, "Sam")
        .with_comment(Some("duplicate".to_string()));

    let (a, b) = tokio::join!(
        RequestRepo::transition(&pool, request.id, &approve, &approve_entry),
        RequestRepo::transition(&pool, request.id, &reject, &reject_entry),
    );
    let winners = [a.unwrap(), b.unwrap()]
        .into_iter()
        .filter(Option::is_some)
        .count();
    assert_eq!(winners, 1);

    let log = HistoryRepo::list_for_request(&pool, request.id).await.unwrap();
    assert_eq!(log.len(), 3, "exactly one decision entry is recorded");
}

// ---------------------------------------------------------------------------
// Edit / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn edit_replaces_items_and_recomputes_total(pool: PgPool) {
    let owner = seed_user(&pool, "Ana", Role::Employee).await;
    let request = RequestRepo::create(
        &pool,
        &new_request(owner, RequestStatus::Draft, vec![item("Old", 1, 99.0), item("Older", 1, 1.0)]),
        "Ana",
    )
    .await
    .unwrap();

    let input = UpdateRequest {
        title: Some("Two laptops".to_string()),
        items: Some(vec![item("Dell XPS", 2, 500.0)]),
        ..Default::default()
    };
    let updated = RequestRepo::update(
        &pool,
        request.id,
        &Transition {
            from: RequestStatus::Draft,
            to: RequestStatus::Draft,
            reason: None,
        },
        &input,
        &[NewHistoryEntry::new(request.id, HistoryAction::Updated, owner, "Ana")],
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.title, "Two laptops");
    assert_eq!(updated.department, "IT");
    assert_eq!(updated.total_amount, 1000.0);

    let items = RequestRepo::list_items(&pool, request.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Dell XPS");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn edit_keeps_reason_while_rejected_and_clears_on_resubmit(pool: PgPool) {
    let owner = seed_user(&pool, "Ana", Role::Employee).await;
    let reviewer = seed_user(&pool, "Pat", Role::Procurement).await;
    let request = RequestRepo::create(&pool, &new_request(owner, RequestStatus::Pending, vec![]), "Ana")
        .await
        .unwrap();
    RequestRepo::transition(
        &pool,
        request.id,
        &Transition {
            from: RequestStatus::Pending,
            to: RequestStatus::Rejected,
            reason: Some("too vague".to_string()),
        },
        &NewHistoryEntry::new(request.id, HistoryAction::Rejected, reviewer, "Pat"),
    )
    .await
    .unwrap()
    .unwrap();

    let edit = UpdateRequest {
        purpose: Some("Replacement for broken unit".to_string()),
        ..Default::default()
    };
    let still_rejected = RequestRepo::update(
        &pool,
        request.id,
        &Transition {
            from: RequestStatus::Rejected,
            to: RequestStatus::Rejected,
            reason: None,
        },
        &edit,
        &[NewHistoryEntry::new(request.id, HistoryAction::Updated, owner, "Ana")],
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(still_rejected.status, "rejected");
    assert_eq!(still_rejected.rejection_reason.as_deref(), Some("too vague"));

    let resubmitted = RequestRepo::update(
        &pool,
        request.id,
        &Transition {
            from: RequestStatus::Rejected,
            to: RequestStatus::Pending,
            reason: None,
        },
        &UpdateRequest::default(),
        &[
            NewHistoryEntry::new(request.id, HistoryAction::Updated, owner, "Ana"),
            NewHistoryEntry::new(request.id, HistoryAction::Submitted, owner, "Ana"),
        ],
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(resubmitted.status, "pending");
    assert!(resubmitted.rejection_reason.is_none());

    let log = HistoryRepo::list_for_request(&pool, request.id).await.unwrap();
    let walk: Vec<HistoryAction> = log.iter().map(|e| e.action.parse().unwrap()).collect();
    assert!(reqflow_core::workflow::is_valid_history_walk(&walk));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_cascades_to_items_and_history(pool: PgPool) {
    let owner = seed_user(&pool, "Ana", Role::Employee).await;
    let request = RequestRepo::create(
        &pool,
        &new_request(owner, RequestStatus::Pending, vec![item("Chair", 4, 80.0)]),
        "Ana",
    )
    .await
    .unwrap();

    assert!(RequestRepo::delete(&pool, request.id).await.unwrap());
    assert!(!RequestRepo::delete(&pool, request.id).await.unwrap());

    let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM request_items WHERE request_id = $1")
        .bind(request.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    let history: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM request_history WHERE request_id = $1")
            .bind(request.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!((items, history), (0, 0));
}
