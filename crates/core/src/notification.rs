//! Notification kinds and the user-facing text produced by workflow events.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Display severity of a notification, matching `notifications.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(NotificationKind::Success),
            "error" => Ok(NotificationKind::Error),
            "info" => Ok(NotificationKind::Info),
            "warning" => Ok(NotificationKind::Warning),
            other => Err(CoreError::Validation(format!(
                "Invalid notification kind '{other}'"
            ))),
        }
    }
}

/// Title + body pair for a single notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationText {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

/// Sent to the owner when a reviewer approves their request.
pub fn request_approved(request_title: &str, approver: &str, comment: Option<&str>) -> NotificationText {
    let mut message = format!("Your request \"{request_title}\" was approved by {approver}.");
    if let Some(comment) = comment {
        message.push_str(&format!(" Comment: {comment}"));
    }
    NotificationText {
        kind: NotificationKind::Success,
        title: "Request approved".to_string(),
        message,
    }
}

/// Sent to the owner when a reviewer rejects their request.
pub fn request_rejected(request_title: &str, approver: &str, reason: &str) -> NotificationText {
    NotificationText {
        kind: NotificationKind::Error,
        title: "Request rejected".to_string(),
        message: format!(
            "Your request \"{request_title}\" was rejected by {approver}. Reason: {reason}"
        ),
    }
}

/// Sent to every reviewer when a request enters the pending queue.
pub fn request_submitted(request_title: &str, requester: &str) -> NotificationText {
    NotificationText {
        kind: NotificationKind::Info,
        title: "New request submitted".to_string(),
        message: format!("{requester} submitted \"{request_title}\" for approval."),
    }
}
