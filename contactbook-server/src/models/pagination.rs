//! Offset-based pagination
//!
//! There is no total-count contract: a page is just `LIMIT`/`OFFSET` over the
//! database's natural order.

use serde::Deserialize;

/// Maximum items per page
const MAX_LIMIT: i64 = 500;

/// Pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    limit: i64,
    offset: i64,
}

impl Pagination {
    /// Create pagination with validation.
    ///
    /// - Limit is clamped to 1..=500
    /// - Offset is clamped to a minimum of 0
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT),
            offset: offset.max(0),
        }
    }

    /// Get LIMIT value.
    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Get OFFSET value.
    pub fn offset(&self) -> i64 {
        self.offset
    }
}

/// Query parameters for pagination
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    #[serde(alias = "skip")]
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Resolve into a [`Pagination`], using `default_limit` when the client
    /// sent no limit. Each resource picks its own default.
    pub fn with_default_limit(&self, default_limit: i64) -> Pagination {
        Pagination::new(
            self.limit.unwrap_or(default_limit),
            self.offset.unwrap_or(0),
        )
    }
}
