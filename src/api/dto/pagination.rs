//! Pagination query parameters.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

/// Default page size when `limit` is omitted.
pub const DEFAULT_LIMIT: i64 = 20;

/// Pagination query parameters for listing endpoints.
///
/// Uses `serde_with` to parse numbers from query strings.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Validates pagination parameters.
    ///
    /// # Defaults
    ///
    /// - `limit`: 20
    /// - `offset`: 0
    ///
    /// # Validation
    ///
    /// - Limit must be > 0
    /// - Offset must be >= 0
    ///
    /// # Returns
    ///
    /// `(limit, offset)` tuple for the repository.
    pub fn validate_and_get_limit_offset(&self) -> Result<(i64, i64), String> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        let offset = self.offset.unwrap_or(0);

        if limit <= 0 {
            return Err("Limit must be greater than 0".to_string());
        }

        if offset < 0 {
            return Err("Offset must not be negative".to_string());
        }

        Ok((limit, offset))
    }
}
