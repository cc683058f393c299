use std::sync::Arc;

use reqflow_events::EmailSender;

use crate::config::ServerConfig;
use crate::engine::WorkflowEngine;
use crate::notifications::NotificationDispatcher;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub pool: reqflow_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Open notification sockets, keyed by user.
    pub ws_manager: Arc<WsManager>,
    /// Persist-then-push notification delivery.
    pub notifier: Arc<NotificationDispatcher>,
    /// Owner of every request status change.
    pub workflow: Arc<WorkflowEngine>,
}

impl AppState {
    /// Wire the dispatcher and the workflow engine around the given pool,
    /// socket registry, and mailer.
    pub fn new(
        pool: reqflow_db::DbPool,
        config: Arc<ServerConfig>,
        ws_manager: Arc<WsManager>,
        mailer: Arc<dyn EmailSender>,
    ) -> Self {
        let notifier = Arc::new(NotificationDispatcher::new(
            pool.clone(),
            ws_manager.clone(),
        ));
        let workflow = Arc::new(WorkflowEngine::new(
            pool.clone(),
            Arc::clone(&notifier),
            mailer,
        ));
        Self {
            pool,
            config,
            ws_manager,
            notifier,
            workflow,
        }
    }
}
