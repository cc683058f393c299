use std::collections::HashMap;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::ws::Message;
use reqflow_core::types::DbId;
use tokio::sync::{mpsc, RwLock};

use crate::notifications::LivePush;

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// One open socket belonging to a user.
pub struct WsConnection {
    pub conn_id: String,
    /// Channel sender for outbound messages to this connection.
    pub sender: WsSender,
}

/// Registry of open WebSocket connections, grouped by user id.
///
/// A user may hold several sockets at once (multiple tabs). Thread-safe via
/// interior `RwLock`; wrap in `Arc` to share.
pub struct WsManager {
    connections: RwLock<HashMap<DbId, Vec<WsConnection>>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection for `user_id`.
    ///
    /// Returns the generated connection id and the receiver half of the
    /// message channel so the caller can forward messages to the socket.
    pub async fn add(&self, user_id: DbId) -> (String, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn_id = uuid::Uuid::new_v4().to_string();
        let conn = WsConnection {
            conn_id: conn_id.clone(),
            sender: tx,
        };
        self.connections
            .write()
            .await
            .entry(user_id)
            .or_default()
            .push(conn);
        (conn_id, rx)
    }

    /// Remove one connection. The user's entry is dropped with its last socket.
    pub async fn remove(&self, user_id: DbId, conn_id: &str) {
        let mut conns = self.connections.write().await;
        if let Some(list) = conns.get_mut(&user_id) {
            list.retain(|c| c.conn_id != conn_id);
            if list.is_empty() {
                conns.remove(&user_id);
            }
        }
    }

    /// Send a message to every connection belonging to `user_id`.
    ///
    /// Returns the number of connections the message was handed to. Closed
    /// channels are skipped; their sockets are cleaned up by their own
    /// receive loops.
    pub async fn send_to_user(&self, user_id: DbId, message: Message) -> usize {
        let conns = self.connections.read().await;
        let Some(list) = conns.get(&user_id) else {
            return 0;
        };
        list.iter()
            .filter(|c| c.sender.send(message.clone()).is_ok())
            .count()
    }

    /// Whether `user_id` has at least one open connection.
    pub async fn is_connected(&self, user_id: DbId) -> bool {
        self.connections.read().await.contains_key(&user_id)
    }

    /// Total number of open connections across all users.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.values().map(Vec::len).sum()
    }

    /// Send a Ping frame to every connected client.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values().flatten() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }

    /// Send a Close frame to every connection, then clear the registry.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count: usize = conns.values().map(Vec::len).sum();
        for conn in conns.values().flatten() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LivePush for WsManager {
    async fn push_to_user(&self, user_id: DbId, payload: String) -> usize {
        self.send_to_user(user_id, Message::Text(payload.into())).await
    }
}
