//! Workflow engine.
//!
//! Each operation follows the same sequence:
//!
//! 1. Load the request (`NotFound` if missing).
//! 2. Authorize the actor for the action (`Forbidden`).
//! 3. Validate the reason or comment (`Validation`).
//! 4. Compute the next status from the current one (`InvalidState`).
//! 5. Write the status change and its history entry in one transaction,
//!    guarded by the status read in step 1.
//! 6. After commit, store notifications and send email. Failures here are
//!    logged and never undo the change.
//!
//! If the guarded write in step 5 matches no row, another writer got there
//! first; the row is re-read to report `NotFound` or `InvalidState`.

use std::sync::Arc;

use reqflow_core::error::CoreError;
use reqflow_core::notification;
use reqflow_core::request::RequestStatus;
use reqflow_core::roles::Role;
use reqflow_core::types::DbId;
use reqflow_core::validation::{
    checked_total_cost, normalize_comment, require_reason, validate_line_item, MAX_LINE_ITEMS,
};
use reqflow_core::workflow::{self, WorkflowAction, BULK_APPROVAL_COMMENT};
use reqflow_db::models::history::NewHistoryEntry;
use reqflow_db::models::request::{CreateRequest, NewRequestItem, Request, UpdateRequest};
use reqflow_db::repositories::{RequestRepo, Transition, UserRepo};
use reqflow_events::EmailSender;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::notifications::NotificationDispatcher;

/// The user performing a workflow operation, as currently stored.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: DbId,
    pub role: Role,
    pub name: String,
    pub email: String,
}

impl Actor {
    /// Load an active user. Unknown or deactivated users are `Unauthorized`.
    pub async fn load(pool: &PgPool, user_id: DbId) -> AppResult<Self> {
        let user = UserRepo::find_by_id(pool, user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "User account not found or inactive".into(),
                ))
            })?;
        Ok(Self {
            id: user.id,
            role: user.role()?,
            name: user.name,
            email: user.email,
        })
    }
}

/// Per-id failure in a bulk approval.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkFailure {
    pub id: DbId,
    pub code: &'static str,
    pub error: String,
}

/// Outcome of a bulk approval. Every id is attempted independently.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkApproveResult {
    pub processed: usize,
    pub approved: Vec<DbId>,
    pub failed: Vec<BulkFailure>,
}

pub struct WorkflowEngine {
    pool: PgPool,
    notifier: Arc<NotificationDispatcher>,
    mailer: Arc<dyn EmailSender>,
}

impl WorkflowEngine {
    pub fn new(
        pool: PgPool,
        notifier: Arc<NotificationDispatcher>,
        mailer: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            pool,
            notifier,
            mailer,
        }
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Create a request owned by `actor`, either as a draft or directly
    /// pending review. `input.created_by` is overwritten with the actor.
    pub async fn create(&self, actor: &Actor, mut input: CreateRequest) -> AppResult<Request> {
        if !matches!(input.status, RequestStatus::Draft | RequestStatus::Pending) {
            return Err(CoreError::Validation(format!(
                "A new request must be draft or pending, not {}",
                input.status
            ))
            .into());
        }
        validate_items(&input.items)?;
        input.created_by = actor.id;

        let request = RequestRepo::create(&self.pool, &input, &actor.name).await?;
        tracing::info!(
            request_id = request.id,
            user_id = actor.id,
            status = %request.status,
            "Request created",
        );

        if input.status == RequestStatus::Pending {
            self.after_submitted(actor, &request).await;
        }
        Ok(request)
    }

    /// Send a draft or rejected request (back) to the review queue.
    pub async fn submit(&self, actor: &Actor, id: DbId) -> AppResult<Request> {
        let request = self.apply(actor, id, WorkflowAction::Submit, None).await?;
        self.after_submitted(actor, &request).await;
        Ok(request)
    }

    /// Approve a pending request. Reviewer only.
    pub async fn approve(
        &self,
        actor: &Actor,
        id: DbId,
        comment: Option<&str>,
    ) -> AppResult<Request> {
        let comment = normalize_comment(comment);
        let request = self
            .apply(actor, id, WorkflowAction::Approve, comment.as_deref())
            .await?;

        let text = notification::request_approved(&request.title, &actor.name, comment.as_deref());
        self.notifier
            .notify_best_effort(request.created_by, &text, Some(request.id))
            .await;
        if let Some(email) = self.owner_email(&request).await {
            if let Err(e) = self
                .mailer
                .send_request_approved_email(
                    &email,
                    &request.title,
                    request.id,
                    &actor.name,
                    comment.as_deref(),
                )
                .await
            {
                tracing::warn!(error = %e, request_id = request.id, "Failed to send approval email");
            }
        }
        Ok(request)
    }

    /// Reject a pending request with a mandatory reason. Reviewer only.
    pub async fn reject(
        &self,
        actor: &Actor,
        id: DbId,
        reason: Option<&str>,
    ) -> AppResult<Request> {
        let request = self.apply(actor, id, WorkflowAction::Reject, reason).await?;
        let reason = request.rejection_reason.clone().unwrap_or_default();

        let text = notification::request_rejected(&request.title, &actor.name, &reason);
        self.notifier
            .notify_best_effort(request.created_by, &text, Some(request.id))
            .await;
        if let Some(email) = self.owner_email(&request).await {
            if let Err(e) = self
                .mailer
                .send_request_rejected_email(&email, &request.title, request.id, &actor.name, &reason)
                .await
            {
                tracing::warn!(error = %e, request_id = request.id, "Failed to send rejection email");
            }
        }
        Ok(request)
    }

    /// Withdraw a draft or pending request with a mandatory reason. Owner only.
    pub async fn cancel(
        &self,
        actor: &Actor,
        id: DbId,
        reason: Option<&str>,
    ) -> AppResult<Request> {
        self.apply(actor, id, WorkflowAction::Cancel, reason).await
    }

    /// `PATCH /requests/{id}/status`: dispatch on the target status.
    ///
    /// For `rejected` and `cancelled` the comment is the required reason.
    pub async fn update_status(
        &self,
        actor: &Actor,
        id: DbId,
        target: RequestStatus,
        comment: Option<&str>,
    ) -> AppResult<Request> {
        match WorkflowAction::for_target_status(target)? {
            WorkflowAction::Submit => self.submit(actor, id).await,
            WorkflowAction::Approve => self.approve(actor, id, comment).await,
            WorkflowAction::Reject => self.reject(actor, id, comment).await,
            WorkflowAction::Cancel => self.cancel(actor, id, comment).await,
            WorkflowAction::Edit => Err(CoreError::Validation(
                "Edits are made with PUT /requests/{id}".into(),
            )
            .into()),
        }
    }

    /// Owner edit of a draft or rejected request.
    ///
    /// The status is kept unless `resubmit` is set, in which case the
    /// request moves to `pending` in the same transaction and an `updated`
    /// entry is followed by a `submitted` one.
    pub async fn edit(
        &self,
        actor: &Actor,
        id: DbId,
        input: UpdateRequest,
        resubmit: bool,
    ) -> AppResult<Request> {
        let current = self.load(id).await?;
        workflow::authorize(actor.role, WorkflowAction::Edit, current.created_by == actor.id)?;
        if let Some(items) = &input.items {
            validate_items(items)?;
        }

        let from = current.status()?;
        let mut to = workflow::next_status(from, WorkflowAction::Edit)?;
        let mut history = vec![NewHistoryEntry::new(
            id,
            WorkflowAction::Edit.history_action(),
            actor.id,
            &actor.name,
        )];
        if resubmit {
            to = workflow::next_status(to, WorkflowAction::Submit)?;
            history.push(NewHistoryEntry::new(
                id,
                WorkflowAction::Submit.history_action(),
                actor.id,
                &actor.name,
            ));
        }

        let transition = Transition {
            from,
            to,
            reason: None,
        };
        let request = match RequestRepo::update(&self.pool, id, &transition, &input, &history).await? {
            Some(r) => r,
            None => return Err(self.lost_race(id, WorkflowAction::Edit).await),
        };
        tracing::info!(request_id = id, user_id = actor.id, resubmit, "Request edited");

        if resubmit {
            self.after_submitted(actor, &request).await;
        }
        Ok(request)
    }

    /// Approve each id independently with a fixed comment.
    ///
    /// A failure on one id is recorded and does not stop the others.
    pub async fn bulk_approve(&self, actor: &Actor, ids: &[DbId]) -> BulkApproveResult {
        let mut approved = Vec::new();
        let mut failed = Vec::new();

        for &id in ids {
            match self.approve(actor, id, Some(BULK_APPROVAL_COMMENT)).await {
                Ok(_) => approved.push(id),
                Err(e) => {
                    let (_, code, error) = e.parts();
                    failed.push(BulkFailure { id, code, error });
                }
            }
        }

        tracing::info!(
            user_id = actor.id,
            processed = ids.len(),
            approved = approved.len(),
            failed = failed.len(),
            "Bulk approval finished",
        );
        BulkApproveResult {
            processed: ids.len(),
            approved,
            failed,
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn load(&self, id: DbId) -> AppResult<Request> {
        RequestRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Request",
                id,
            }))
    }

    /// Load, authorize, validate, then write a single guarded status change.
    ///
    /// `note` is the optional comment, or the required reason for actions
    /// that need one.
    async fn apply(
        &self,
        actor: &Actor,
        id: DbId,
        action: WorkflowAction,
        note: Option<&str>,
    ) -> AppResult<Request> {
        let current = self.load(id).await?;
        workflow::authorize(actor.role, action, current.created_by == actor.id)?;

        let (reason, comment) = if action.requires_reason() {
            let reason = require_reason(reason_kind(action), note)?;
            (Some(reason.clone()), Some(reason))
        } else {
            (None, normalize_comment(note))
        };

        let from = current.status()?;
        let to = workflow::next_status(from, action)?;

        let transition = Transition { from, to, reason };
        let entry = NewHistoryEntry::new(id, action.history_action(), actor.id, &actor.name)
            .with_comment(comment);

        match RequestRepo::transition(&self.pool, id, &transition, &entry).await? {
            Some(request) => {
                tracing::info!(
                    request_id = id,
                    user_id = actor.id,
                    from = %from,
                    to = %to,
                    "Request status changed",
                );
                Ok(request)
            }
            None => Err(self.lost_race(id, action).await),
        }
    }

    /// Explain why a guarded write matched no row.
    async fn lost_race(&self, id: DbId, action: WorkflowAction) -> AppError {
        match RequestRepo::find_by_id(&self.pool, id).await {
            Ok(Some(request)) => {
                tracing::info!(request_id = id, status = %request.status, %action, "Lost a concurrent status change");
                AppError::Core(CoreError::InvalidState {
                    current: request.status,
                    attempted: action.to_string(),
                })
            }
            Ok(None) => AppError::Core(CoreError::NotFound {
                entity: "Request",
                id,
            }),
            Err(e) => AppError::Database(e),
        }
    }

    /// Notify and email reviewers, and confirm to the requester by email.
    async fn after_submitted(&self, actor: &Actor, request: &Request) {
        let reviewers = match UserRepo::list_active_reviewers(&self.pool).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, request_id = request.id, "Failed to load reviewers");
                Vec::new()
            }
        };

        let text = notification::request_submitted(&request.title, &actor.name);
        for reviewer in reviewers.iter().filter(|r| r.id != request.created_by) {
            self.notifier
                .notify_best_effort(reviewer.id, &text, Some(request.id))
                .await;
            if let Err(e) = self
                .mailer
                .send_new_request_email(&reviewer.email, &request.title, request.id, &actor.name)
                .await
            {
                tracing::warn!(error = %e, reviewer_id = reviewer.id, "Failed to send new-request email");
            }
        }

        if let Err(e) = self
            .mailer
            .send_request_submitted_email(&actor.email, &request.title, request.id)
            .await
        {
            tracing::warn!(error = %e, request_id = request.id, "Failed to send submission email");
        }
    }

    async fn owner_email(&self, request: &Request) -> Option<String> {
        match UserRepo::find_by_id(&self.pool, request.created_by).await {
            Ok(Some(owner)) => Some(owner.email),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, request_id = request.id, "Failed to look up request owner");
                None
            }
        }
    }
}

fn reason_kind(action: WorkflowAction) -> &'static str {
    match action {
        WorkflowAction::Cancel => "cancellation",
        _ => "rejection",
    }
}

fn validate_items(items: &[NewRequestItem]) -> Result<(), CoreError> {
    if items.len() > MAX_LINE_ITEMS {
        return Err(CoreError::Validation(format!(
            "A request may have at most {MAX_LINE_ITEMS} items"
        )));
    }
    for item in items {
        validate_line_item(&item.name, item.quantity, item.estimated_cost)?;
    }
    checked_total_cost(items.iter().map(|i| (i.quantity, i.estimated_cost)))?;
    Ok(())
}
