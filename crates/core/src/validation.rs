//! Input validation shared by the repository and API layers.

use validator::ValidationErrors;

use crate::error::CoreError;

/// Maximum length for a rejection or cancellation reason.
pub const MAX_REASON_LENGTH: usize = 2_000;

/// Maximum number of line items on a single request.
pub const MAX_LINE_ITEMS: usize = 200;

/// Trim a rejection/cancellation reason and require it to be non-empty.
///
/// `kind` names the reason in the error message (e.g. `"rejection"`).
pub fn require_reason(kind: &str, reason: Option<&str>) -> Result<String, CoreError> {
    let trimmed = reason.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!(
            "A {kind} reason is required"
        )));
    }
    if trimmed.chars().count() > MAX_REASON_LENGTH {
        return Err(CoreError::Validation(format!(
            "The {kind} reason must be at most {MAX_REASON_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Normalize an optional comment: blank strings become `None`.
pub fn normalize_comment(comment: Option<&str>) -> Option<String> {
    comment
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// Validate a single line item's numeric fields.
pub fn validate_line_item(name: &str, quantity: i32, estimated_cost: f64) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Item name is required".to_string()));
    }
    if quantity <= 0 {
        return Err(CoreError::Validation(format!(
            "Item '{name}' must have a positive quantity, got {quantity}"
        )));
    }
    if !estimated_cost.is_finite() || estimated_cost < 0.0 {
        return Err(CoreError::Validation(format!(
            "Item '{name}' must have a non-negative estimated cost"
        )));
    }
    if !(f64::from(quantity) * estimated_cost).is_finite() {
        return Err(CoreError::Validation(format!(
            "Item '{name}' line total is out of range"
        )));
    }
    Ok(())
}

/// Sum of `quantity * estimated_cost` over the given items.
pub fn total_cost<I>(items: I) -> f64
where
    I: IntoIterator<Item = (i32, f64)>,
{
    items
        .into_iter()
        .map(|(quantity, cost)| f64::from(quantity) * cost)
        .sum()
}

/// [`total_cost`], rejecting a sum that overflows to infinity.
pub fn checked_total_cost<I>(items: I) -> Result<f64, CoreError>
where
    I: IntoIterator<Item = (i32, f64)>,
{
    let total = total_cost(items);
    if !total.is_finite() {
        return Err(CoreError::Validation(
            "Request total cost is out of range".to_string(),
        ));
    }
    Ok(total)
}

/// Flatten `validator` derive errors into a single [`CoreError::Validation`].
pub fn from_validation_errors(errors: ValidationErrors) -> CoreError {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{field}: {msg}"),
                None => format!("{field}: {}", e.code),
            })
        })
        .collect();
    parts.sort();
    if parts.is_empty() {
        parts.push(errors.to_string());
    }
    CoreError::Validation(parts.join("; "))
}
