//! Notification dispatcher.
//!
//! Every notification is written to the `notifications` table first and
//! then offered to the live channel. A user who is offline simply reads it
//! later through the REST endpoints; a push that reaches nobody is not an
//! error.

use std::sync::Arc;

use async_trait::async_trait;
use reqflow_core::notification::NotificationText;
use reqflow_core::types::DbId;
use reqflow_db::models::notification::{CreateNotification, Notification};
use reqflow_db::repositories::NotificationRepo;
use serde::Serialize;
use sqlx::PgPool;

/// A live delivery channel keyed by user.
#[async_trait]
pub trait LivePush: Send + Sync {
    /// Deliver `payload` to every open connection of `user_id`.
    ///
    /// Returns how many connections accepted it.
    async fn push_to_user(&self, user_id: DbId, payload: String) -> usize;
}

/// Live channel that delivers nothing.
pub struct NoopPush;

#[async_trait]
impl LivePush for NoopPush {
    async fn push_to_user(&self, _user_id: DbId, _payload: String) -> usize {
        0
    }
}

/// Frame pushed over the socket for each new notification.
#[derive(Debug, Serialize)]
pub struct PushFrame<'a> {
    #[serde(rename = "type")]
    pub frame_type: &'static str,
    pub data: &'a Notification,
}

impl<'a> PushFrame<'a> {
    pub fn notification(data: &'a Notification) -> Self {
        Self {
            frame_type: "notification",
            data,
        }
    }
}

/// Stores notifications and fans them out to connected clients.
pub struct NotificationDispatcher {
    pool: PgPool,
    live: Arc<dyn LivePush>,
}

impl NotificationDispatcher {
    pub fn new(pool: PgPool, live: Arc<dyn LivePush>) -> Self {
        Self { pool, live }
    }

    /// Persist a notification for `user_id`, then push it live.
    pub async fn notify(
        &self,
        user_id: DbId,
        text: &NotificationText,
        request_id: Option<DbId>,
    ) -> Result<Notification, sqlx::Error> {
        let input = CreateNotification {
            user_id,
            kind: text.kind,
            title: text.title.clone(),
            message: text.message.clone(),
            request_id,
        };
        let notification = NotificationRepo::create(&self.pool, &input).await?;

        match serde_json::to_string(&PushFrame::notification(&notification)) {
            Ok(payload) => {
                let delivered = self.live.push_to_user(user_id, payload).await;
                tracing::debug!(
                    notification_id = notification.id,
                    user_id,
                    delivered,
                    "Notification dispatched",
                );
            }
            Err(e) => {
                tracing::error!(error = %e, notification_id = notification.id, "Failed to encode push frame");
            }
        }

        Ok(notification)
    }

    /// Like [`notify`](Self::notify), but failures are logged and swallowed.
    ///
    /// Used for side effects of an already-committed workflow change.
    pub async fn notify_best_effort(
        &self,
        user_id: DbId,
        text: &NotificationText,
        request_id: Option<DbId>,
    ) -> Option<Notification> {
        match self.notify(user_id, text, request_id).await {
            Ok(n) => Some(n),
            Err(e) => {
                tracing::warn!(error = %e, user_id, ?request_id, "Failed to store notification");
                None
            }
        }
    }
}
