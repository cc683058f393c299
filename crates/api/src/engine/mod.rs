//! The approval workflow engine: the only code path that changes a
//! request's status.

pub mod workflow;

pub use workflow::{Actor, BulkApproveResult, BulkFailure, WorkflowEngine};
