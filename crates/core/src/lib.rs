//! Domain core for the movement/procurement request service.
//!
//! Everything in this crate is pure: no database, no network. The API and
//! repository layers depend on it for the shared vocabulary (roles, request
//! statuses, history actions) and for the workflow transition table.

pub mod error;
pub mod notification;
pub mod reports;
pub mod request;
pub mod roles;
pub mod scope;
pub mod types;
pub mod validation;
pub mod workflow;
