//! Page-number pagination primitives shared by backend list endpoints.
//!
//! Clients address pages with a 1-based `page` number and a bounded `limit`.
//! [`PageParams`] captures the raw query values, and [`PageRequest`] is the
//! validated form that storage adapters consume through
//! [`PageRequest::offset`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page number used when the client omits `page`.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the client omits `limit`.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 30;

/// Validation failures for page parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Pages are numbered from 1.
    #[error("page must be at least 1, got {page}")]
    InvalidPage {
        /// Rejected page number.
        page: u32,
    },
    /// The page size falls outside `1..=MAX_LIMIT`.
    #[error("limit must be between 1 and {max}, got {limit}")]
    InvalidLimit {
        /// Rejected page size.
        limit: u32,
        /// Upper bound in force.
        max: u32,
    },
}

/// Raw pagination values as supplied by a client.
///
/// Missing values fall back to [`DEFAULT_PAGE`] and [`DEFAULT_LIMIT`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PageParams {
    /// Requested page number.
    pub page: Option<u32>,
    /// Requested page size.
    pub limit: Option<u32>,
}

/// A validated page request.
///
/// # Examples
///
/// ```
/// use pagination::PageRequest;
///
/// let page = PageRequest::new(3, 10).expect("valid page");
/// assert_eq!(page.offset(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PageParams")]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validate and build a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidPage`] when `page` is zero and
    /// [`PaginationError::InvalidLimit`] when `limit` is zero or above
    /// [`MAX_LIMIT`].
    pub const fn new(page: u32, limit: u32) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::InvalidPage { page });
        }
        if limit == 0 || limit > MAX_LIMIT {
            return Err(PaginationError::InvalidLimit {
                limit,
                max: MAX_LIMIT,
            });
        }
        Ok(Self { page, limit })
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// The page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip: `(page - 1) * limit`.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl TryFrom<PageParams> for PageRequest {
    type Error = PaginationError;

    fn try_from(params: PageParams) -> Result<Self, Self::Error> {
        Self::new(
            params.page.unwrap_or(DEFAULT_PAGE),
            params.limit.unwrap_or(DEFAULT_LIMIT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(5, 3, 12)]
    #[case(u32::MAX, MAX_LIMIT, (u32::MAX as u64 - 1) * MAX_LIMIT as u64)]
    fn offset_skips_previous_pages(#[case] page: u32, #[case] limit: u32, #[case] offset: u64) {
        let request = PageRequest::new(page, limit).expect("valid page request");
        assert_eq!(request.offset(), offset);
    }

    #[rstest]
    #[case(0, 10, PaginationError::InvalidPage { page: 0 })]
    #[case(1, 0, PaginationError::InvalidLimit { limit: 0, max: MAX_LIMIT })]
    #[case(1, MAX_LIMIT + 1, PaginationError::InvalidLimit { limit: MAX_LIMIT + 1, max: MAX_LIMIT })]
    fn rejects_out_of_range_values(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] expected: PaginationError,
    ) {
        assert_eq!(PageRequest::new(page, limit), Err(expected));
    }

    #[rstest]
    fn missing_params_use_defaults() {
        let request = PageRequest::try_from(PageParams::default()).expect("defaults are valid");
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.page(), DEFAULT_PAGE);
        assert_eq!(request.limit(), DEFAULT_LIMIT);
    }

    #[rstest]
    fn deserialisation_validates_values() {
        let parsed: PageRequest =
            serde_json::from_str(r#"{"page": 2}"#).expect("page without limit");
        assert_eq!(parsed.offset(), u64::from(DEFAULT_LIMIT));

        let rejected = serde_json::from_str::<PageRequest>(r#"{"page": 0, "limit": 5}"#);
        assert!(rejected.is_err());
    }
}
