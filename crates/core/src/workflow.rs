//! Approval workflow rules.
//!
//! Two pure functions decide every status change:
//!
//! - [`is_allowed`] answers "may this role (owner or not) perform this action".
//! - [`next_status`] answers "where does this action take a request in this
//!   status", or fails with [`CoreError::InvalidState`].
//!
//! Callers check authorization before state, so a caller without permission
//! always sees `Forbidden`, whatever the request's status.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;
use crate::request::{HistoryAction, RequestStatus};
use crate::roles::Role;

/// Fixed comment written to each history entry produced by bulk approval.
pub const BULK_APPROVAL_COMMENT: &str = "Bulk approval";

/// Something a user can do to an existing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowAction {
    Submit,
    Approve,
    Reject,
    Cancel,
    Edit,
}

impl WorkflowAction {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowAction::Submit => "submit",
            WorkflowAction::Approve => "approve",
            WorkflowAction::Reject => "reject",
            WorkflowAction::Cancel => "cancel",
            WorkflowAction::Edit => "edit",
        }
    }

    /// The history entry written when this action succeeds.
    pub fn history_action(self) -> HistoryAction {
        match self {
            WorkflowAction::Submit => HistoryAction::Submitted,
            WorkflowAction::Approve => HistoryAction::Approved,
            WorkflowAction::Reject => HistoryAction::Rejected,
            WorkflowAction::Cancel => HistoryAction::Cancelled,
            WorkflowAction::Edit => HistoryAction::Updated,
        }
    }

    /// Map a target status from `PATCH /requests/{id}/status` to an action.
    pub fn for_target_status(target: RequestStatus) -> Result<Self, CoreError> {
        match target {
            RequestStatus::Pending => Ok(WorkflowAction::Submit),
            RequestStatus::Approved => Ok(WorkflowAction::Approve),
            RequestStatus::Rejected => Ok(WorkflowAction::Reject),
            RequestStatus::Cancelled => Ok(WorkflowAction::Cancel),
            RequestStatus::Draft => Err(CoreError::Validation(
                "A request cannot be moved back to draft".to_string(),
            )),
        }
    }

    /// Whether the action requires a non-empty reason.
    pub fn requires_reason(self) -> bool {
        matches!(self, WorkflowAction::Reject | WorkflowAction::Cancel)
    }
}

impl fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission table: `(role, action, ownership) -> allowed`.
pub fn is_allowed(role: Role, action: WorkflowAction, is_owner: bool) -> bool {
    match action {
        WorkflowAction::Approve | WorkflowAction::Reject => role.is_reviewer(),
        WorkflowAction::Submit | WorkflowAction::Cancel | WorkflowAction::Edit => is_owner,
    }
}

/// Like [`is_allowed`], but produces a `Forbidden` error naming what is required.
pub fn authorize(role: Role, action: WorkflowAction, is_owner: bool) -> Result<(), CoreError> {
    if is_allowed(role, action, is_owner) {
        return Ok(());
    }
    let message = match action {
        WorkflowAction::Approve | WorkflowAction::Reject => {
            format!("Only procurement or admin may {action} requests")
        }
        WorkflowAction::Submit | WorkflowAction::Cancel | WorkflowAction::Edit => {
            format!("Only the request's creator may {action} it")
        }
    };
    Err(CoreError::Forbidden(message))
}

/// Transition table: the status a request moves to when `action` is applied.
pub fn next_status(
    current: RequestStatus,
    action: WorkflowAction,
) -> Result<RequestStatus, CoreError> {
    use RequestStatus::*;
    use WorkflowAction::*;

    let next = match (current, action) {
        (Draft | Rejected, Submit) => Some(Pending),
        (Pending, Approve) => Some(Approved),
        (Pending, Reject) => Some(Rejected),
        (Draft | Pending, Cancel) => Some(Cancelled),
        (Draft | Rejected, Edit) => Some(current),
        _ => None,
    };

    next.ok_or_else(|| CoreError::InvalidState {
        current: current.to_string(),
        attempted: action.to_string(),
    })
}

/// Replay a history log and check that it is a legal walk of the state machine.
///
/// The first entry must be `created` (the request starts as a draft). A
/// `submitted` entry immediately after `created` models a request that was
/// created directly as pending.
pub fn is_valid_history_walk(actions: &[HistoryAction]) -> bool {
    let Some((first, rest)) = actions.split_first() else {
        return false;
    };
    if *first != HistoryAction::Created {
        return false;
    }

    let mut status = RequestStatus::Draft;
    for action in rest {
        let step = match action {
            HistoryAction::Created => return false,
            HistoryAction::Submitted => WorkflowAction::Submit,
            HistoryAction::Approved => WorkflowAction::Approve,
            HistoryAction::Rejected => WorkflowAction::Reject,
            HistoryAction::Cancelled => WorkflowAction::Cancel,
            HistoryAction::Updated => WorkflowAction::Edit,
        };
        match next_status(status, step) {
            Ok(next) => status = next,
            Err(_) => return false,
        }
    }
    true
}
