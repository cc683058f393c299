use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use reqflow_core::error::CoreError;
use reqflow_core::types::DbId;
use reqflow_db::repositories::UserRepo;
use serde::Deserialize;

use crate::auth::jwt::validate_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::ws::manager::WsManager;

/// Handshake parameters for `GET /ws`.
///
/// `token` is an access token and takes precedence. `userId` is accepted
/// only when the server allows the unauthenticated handshake.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsParams {
    pub token: Option<String>,
    pub user_id: Option<DbId>,
}

/// Resolve which user a handshake identifies.
async fn resolve_user(state: &AppState, params: &WsParams) -> AppResult<DbId> {
    let user_id = if let Some(token) = params.token.as_deref() {
        validate_token(token, &state.config.jwt)
            .map_err(|_| {
                AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
            })?
            .sub
    } else if let Some(user_id) = params.user_id {
        if !state.config.ws_allow_user_id_handshake {
            return Err(AppError::Core(CoreError::Unauthorized(
                "A token is required to open a notification socket".into(),
            )));
        }
        user_id
    } else {
        return Err(AppError::BadRequest(
            "Either token or userId is required".into(),
        ));
    };

    match UserRepo::find_by_id(&state.pool, user_id).await? {
        Some(user) if user.is_active => Ok(user.id),
        _ => Err(AppError::Core(CoreError::Unauthorized(
            "Unknown or inactive user".into(),
        ))),
    }
}

/// HTTP handler that identifies the user and upgrades to WebSocket.
///
/// After the upgrade the connection is registered with [`WsManager`] under
/// the user's id and receives every notification pushed to that user.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
) -> Response {
    let user_id = match resolve_user(&state, &params).await {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let ws_manager = state.ws_manager.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, ws_manager, user_id))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket, forwards manager-channel messages to the sink on a
/// spawned task, and drains inbound frames until the client disconnects.
/// Inbound text frames are ignored.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>, user_id: DbId) {
    let (conn_id, mut rx) = ws_manager.add(user_id).await;
    tracing::info!(conn_id = %conn_id, user_id, "WebSocket connected");

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
            if closing {
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    ws_manager.remove(user_id, &conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, user_id, "WebSocket disconnected");
}
