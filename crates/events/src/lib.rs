//! Outbound email for workflow events.
//!
//! - [`EmailSender`] -- the narrow interface the workflow engine depends on.
//! - [`SmtpMailer`] -- SMTP delivery via `lettre`.
//! - [`LogMailer`] -- logs instead of sending; used when SMTP is not configured.
//! - [`templates`] -- subject and body text for each workflow email.

pub mod delivery;
pub mod sender;
pub mod templates;

pub use delivery::email::{EmailConfig, EmailError, SmtpMailer};
pub use sender::{EmailSender, LogMailer};
pub use templates::EmailMessage;
