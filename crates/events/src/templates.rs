//! Subject and body text for workflow emails.

use reqflow_core::types::DbId;

/// A rendered plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
}

fn request_link(base_url: &str, request_id: DbId) -> String {
    format!("{}/requests/{request_id}", base_url.trim_end_matches('/'))
}

/// Confirmation to the requester that their request entered the approval queue.
pub fn request_submitted(base_url: &str, request_title: &str, request_id: DbId) -> EmailMessage {
    EmailMessage {
        subject: format!("Request submitted: {request_title}"),
        body: format!(
            "Your request \"{request_title}\" has been submitted and is awaiting approval.\n\n\
             View it at {}",
            request_link(base_url, request_id)
        ),
    }
}

/// Heads-up to a reviewer that a request needs a decision.
pub fn new_request(
    base_url: &str,
    request_title: &str,
    request_id: DbId,
    requester_name: &str,
) -> EmailMessage {
    EmailMessage {
        subject: format!("New request needs approval: {request_title}"),
        body: format!(
            "{requester_name} submitted \"{request_title}\" for approval.\n\n\
             Review it at {}",
            request_link(base_url, request_id)
        ),
    }
}

pub fn request_approved(
    base_url: &str,
    request_title: &str,
    request_id: DbId,
    approver_name: &str,
    comment: Option<&str>,
) -> EmailMessage {
    let mut body = format!("Your request \"{request_title}\" was approved by {approver_name}.");
    if let Some(comment) = comment {
        body.push_str(&format!("\n\nComment: {comment}"));
    }
    body.push_str(&format!("\n\nView it at {}", request_link(base_url, request_id)));
    EmailMessage {
        subject: format!("Request approved: {request_title}"),
        body,
    }
}

pub fn request_rejected(
    base_url: &str,
    request_title: &str,
    request_id: DbId,
    approver_name: &str,
    reason: &str,
) -> EmailMessage {
    EmailMessage {
        subject: format!("Request rejected: {request_title}"),
        body: format!(
            "Your request \"{request_title}\" was rejected by {approver_name}.\n\n\
             Reason: {reason}\n\n\
             You can edit and resubmit it at {}",
            request_link(base_url, request_id)
        ),
    }
}
