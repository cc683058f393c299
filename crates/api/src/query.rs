//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for list endpoints.
pub const MAX_LIMIT: i64 = 100;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped with `reqflow_db::clamp_limit` / `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// `(limit, offset)` clamped to the list defaults.
    pub fn clamped(&self) -> (i64, i64) {
        (
            reqflow_db::clamp_limit(self.limit, DEFAULT_LIMIT, MAX_LIMIT),
            reqflow_db::clamp_offset(self.offset),
        )
    }
}

/// Query parameters for list endpoints that support an `includeInactive` flag.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeInactiveParams {
    #[serde(default)]
    pub include_inactive: bool,
}
