//! Page-based query parameters and result wrapper for read-side queries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest allowed page size.
pub const MIN_PAGE_SIZE: u32 = 1;

/// Largest allowed page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Errors raised when constructing [`PaginationParams`] with invalid bounds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    /// Page numbers are 1-based.
    #[error("Invalid page number: {0} (must be at least 1)")]
    InvalidPageNumber(u32),

    /// Page size must be within [1, 100].
    #[error("Invalid page size: {0} (must be between 1 and 100)")]
    InvalidPageSize(u32),
}

/// Sort direction for read-side queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,

    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Parses a direction string, defaulting to ascending for anything
    /// that is not a recognized descending marker.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "desc" | "descending" => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    /// Returns the direction as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validated pagination parameters for read-side queries.
///
/// Page numbers are 1-based; page sizes are bounded to [1, 100].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationParams {
    page_number: u32,
    page_size: u32,
    sort_by: Option<String>,
    sort_direction: SortDirection,
}

impl PaginationParams {
    /// Creates pagination parameters, validating bounds.
    pub fn new(page_number: u32, page_size: u32) -> Result<Self, PaginationError> {
        if page_number < 1 {
            return Err(PaginationError::InvalidPageNumber(page_number));
        }
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(PaginationError::InvalidPageSize(page_size));
        }

        Ok(Self {
            page_number,
            page_size,
            sort_by: None,
            sort_direction: SortDirection::Asc,
        })
    }

    /// Returns the first page with the given size.
    pub fn first_page(page_size: u32) -> Result<Self, PaginationError> {
        Self::new(1, page_size)
    }

    /// Sets the sort field and direction.
    pub fn with_sort(mut self, sort_by: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_by = Some(sort_by.into());
        self.sort_direction = direction;
        self
    }

    /// Returns the 1-based page number.
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Returns the page size.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the sort field, if any.
    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    /// Returns the sort direction.
    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Number of items to skip before the requested page.
    pub fn skip(&self) -> u64 {
        u64::from(self.page_number - 1) * u64::from(self.page_size)
    }

    /// Number of items the requested page holds at most.
    pub fn take(&self) -> u64 {
        u64::from(self.page_size)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: 20,
            sort_by: None,
            sort_direction: SortDirection::Asc,
        }
    }
}

/// A single page of results plus the total count over the filtered set.
///
/// `total_count` reflects the filtered collection the page was cut from,
/// not the whole store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// The items on this page.
    pub items: Vec<T>,

    /// Total number of items across all pages of the filtered set.
    pub total_count: u64,

    /// The 1-based page number this result holds.
    pub page_number: u32,

    /// The page size the result was cut with.
    pub page_size: u32,
}

impl<T> PagedResult<T> {
    /// Creates a paged result.
    pub fn new(items: Vec<T>, total_count: u64, pagination: &PaginationParams) -> Self {
        Self {
            items,
            total_count,
            page_number: pagination.page_number(),
            page_size: pagination.page_size(),
        }
    }

    /// Creates an empty result for the given parameters.
    pub fn empty(pagination: &PaginationParams) -> Self {
        Self::new(Vec::new(), 0, pagination)
    }

    /// Total number of pages (ceiling division).
    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(u64::from(self.page_size))
    }

    /// Returns true if a page exists after this one.
    pub fn has_next_page(&self) -> bool {
        u64::from(self.page_number) < self.total_pages()
    }

    /// Returns true if a page exists before this one.
    pub fn has_previous_page(&self) -> bool {
        self.page_number > 1
    }

    /// Maps the items of this page, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }
}
