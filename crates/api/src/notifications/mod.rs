//! Persist-then-push notification delivery.

pub mod dispatcher;

pub use dispatcher::{LivePush, NotificationDispatcher, NoopPush};
