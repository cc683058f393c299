//! HTTP handlers, one module per resource.
//!
//! Handlers extract and validate input, resolve the caller, then delegate to
//! the workflow engine (status changes) or a repository in `reqflow_db`
//! (everything else). Errors map to HTTP through [`AppError`].

pub mod admin;
pub mod approval;
pub mod auth;
pub mod dashboard;
pub mod notification;
pub mod reference;
pub mod report;
pub mod request;

use std::str::FromStr;

use reqflow_core::error::CoreError;
use serde::{Deserialize, Deserializer};
use reqflow_core::validation::from_validation_errors;
use validator::Validate;

use crate::error::AppError;

/// Run `validator` derive checks on a request body.
pub(crate) fn validate_body<T: Validate>(body: &T) -> Result<(), AppError> {
    body.validate()
        .map_err(|e| AppError::Core(from_validation_errors(e)))
}

/// Parse an optional text parameter into a domain enum.
pub(crate) fn parse_opt<T>(value: Option<&str>) -> Result<Option<T>, AppError>
where
    T: FromStr<Err = CoreError>,
{
    value
        .filter(|v| !v.is_empty())
        .map(str::parse)
        .transpose()
        .map_err(AppError::Core)
}

/// Deserialize a string with surrounding whitespace removed, so derive
/// validators see the value the handler will store.
pub(crate) fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().to_string())
}

/// Optional variant of [`trimmed`]; pair with `#[serde(default)]`.
pub(crate) fn trimmed_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|v| v.trim().to_string()))
}
