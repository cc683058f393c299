//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod history_repo;
pub mod notification_repo;
pub mod reference_repo;
pub mod report_repo;
pub mod request_repo;
pub mod user_repo;

pub use history_repo::HistoryRepo;
pub use notification_repo::NotificationRepo;
pub use reference_repo::{ReferenceRepo, ReferenceTable};
pub use report_repo::{GroupColumn, ReportRepo};
pub use request_repo::{RequestRepo, Transition};
pub use user_repo::UserRepo;
