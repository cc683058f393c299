//! Per-user WebSocket push channel.
//!
//! - [`manager::WsManager`] -- registry of open connections keyed by user.
//! - [`handler::ws_handler`] -- the `GET /ws` upgrade endpoint.
//! - [`heartbeat::start_heartbeat`] -- periodic Ping frames.

pub mod handler;
pub mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
