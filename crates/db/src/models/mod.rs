//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - Input DTOs built by the API layer for inserts and updates

pub mod history;
pub mod notification;
pub mod reference;
pub mod report;
pub mod request;
pub mod user;
