//! Page-based pagination for list endpoints.
//!
//! Query parameters arrive as text. [`PaginationParams`] accepts them as
//! optional strings, treats empty strings as absent and rejects anything that
//! is not an integer, so a malformed `page` never turns into a silent default.
//!
//! # Limits
//!
//! - `page` is 1-indexed and clamped to a minimum of 1 (default: 1)
//! - `size` is clamped to the range [1, 100] (default: 10)
//!
//! # Example
//!
//! ```ignore
//! // GET /store-user/menus/paginated?page=3&size=20
//! let params = PaginationParams { page: Some(3), size: Some(20) };
//!
//! assert_eq!(params.page(), 3);
//! assert_eq!(params.size(), 20);
//! assert_eq!(params.offset(), 40);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::serde::deserialize_optional_i64;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Metadata about a paginated response.
///
/// ```json
/// { "total": 42, "page": 2, "size": 10, "has_more": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of items across all pages
    pub total: i64,
    /// Current page number (1-indexed)
    pub page: i64,
    /// Items per page that was applied
    pub size: i64,
    /// Whether there are more items after this page
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(total: i64, page: i64, size: i64) -> Self {
        Self {
            total,
            page,
            size,
            has_more: page.saturating_mul(size) < total,
        }
    }
}

/// Query parameters for page-based pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub size: Option<i64>,
}

impl PaginationParams {
    /// Returns the effective page, clamped to a minimum of 1.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Returns the effective page size, clamped to [1, 100].
    #[must_use]
    pub fn size(&self) -> i64 {
        self.size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Rows to skip for the effective page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.size())
    }
}
