//! Request management API server library.
//!
//! Exposes the building blocks (config, state, error handling, the workflow
//! engine, routes, WebSocket infrastructure) so integration tests and the
//! binary entrypoint can both access them.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod notifications;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod ws;
