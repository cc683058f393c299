//! The email collaborator interface used by the workflow engine.
//!
//! Implementors provide [`EmailSender::send`]; the per-event methods render a
//! template and delegate to it. Callers treat every error as best-effort:
//! log it and carry on.

use async_trait::async_trait;
use reqflow_core::types::DbId;

use crate::delivery::email::EmailError;
use crate::templates::{self, EmailMessage};

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver one rendered message.
    async fn send(&self, to: &str, message: EmailMessage) -> Result<(), EmailError>;

    /// Base URL used to build links back to the web app.
    fn app_base_url(&self) -> &str;

    async fn send_request_submitted_email(
        &self,
        recipient: &str,
        request_title: &str,
        request_id: DbId,
    ) -> Result<(), EmailError> {
        let message = templates::request_submitted(self.app_base_url(), request_title, request_id);
        self.send(recipient, message).await
    }

    async fn send_new_request_email(
        &self,
        recipient: &str,
        request_title: &str,
        request_id: DbId,
        requester_name: &str,
    ) -> Result<(), EmailError> {
        let message =
            templates::new_request(self.app_base_url(), request_title, request_id, requester_name);
        self.send(recipient, message).await
    }

    async fn send_request_approved_email(
        &self,
        recipient: &str,
        request_title: &str,
        request_id: DbId,
        approver_name: &str,
        comment: Option<&str>,
    ) -> Result<(), EmailError> {
        let message = templates::request_approved(
            self.app_base_url(),
            request_title,
            request_id,
            approver_name,
            comment,
        );
        self.send(recipient, message).await
    }

    async fn send_request_rejected_email(
        &self,
        recipient: &str,
        request_title: &str,
        request_id: DbId,
        approver_name: &str,
        reason: &str,
    ) -> Result<(), EmailError> {
        let message = templates::request_rejected(
            self.app_base_url(),
            request_title,
            request_id,
            approver_name,
            reason,
        );
        self.send(recipient, message).await
    }
}

/// Logs each email at `info` instead of sending it.
#[derive(Debug, Clone)]
pub struct LogMailer {
    app_base_url: String,
}

impl LogMailer {
    pub fn new(app_base_url: impl Into<String>) -> Self {
        Self {
            app_base_url: app_base_url.into(),
        }
    }
}

#[async_trait]
impl EmailSender for LogMailer {
    async fn send(&self, to: &str, message: EmailMessage) -> Result<(), EmailError> {
        tracing::info!(to, subject = %message.subject, "Email not sent (SMTP not configured)");
        Ok(())
    }

    fn app_base_url(&self) -> &str {
        &self.app_base_url
    }
}
