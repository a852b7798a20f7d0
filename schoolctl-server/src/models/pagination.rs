//! Pagination types for the school listing

/// Maximum items per page
pub const MAX_LIMIT: u32 = 100;

/// Default items per page
pub const DEFAULT_LIMIT: u32 = 10;

/// Pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (1-indexed)
    pub page: u32,
    /// Items per page (max 100)
    pub limit: u32,
}

impl Pagination {
    /// Create pagination with validation.
    ///
    /// - Page is clamped to minimum of 1
    /// - Limit is clamped to 1..=100
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Calculate SQL OFFSET value.
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }

    /// Get LIMIT value.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Build from raw query string values.
    ///
    /// Missing or non-numeric values fall back to the defaults, negative
    /// and zero values are clamped like any other out-of-range input.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::new(
            parse_clamped(page).unwrap_or(1),
            parse_clamped(limit).unwrap_or(DEFAULT_LIMIT),
        )
    }
}

fn parse_clamped(raw: Option<&str>) -> Option<u32> {
    let n: i64 = raw?.trim().parse().ok()?;
    Some(n.clamp(0, u32::MAX as i64) as u32)
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Paginated result wrapper
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    /// Items for current page
    pub items: Vec<T>,
    /// Total count across all pages
    pub total: i64,
    /// Current page number
    pub page: u32,
    /// Items per page
    pub limit: u32,
}

impl<T> Paginated<T> {
    /// Calculate total number of pages.
    ///
    /// An empty result set still reports one (empty) page.
    pub fn total_pages(&self) -> u32 {
        if self.total <= 0 {
            1
        } else {
            let limit = self.limit.max(1) as i64;
            ((self.total + limit - 1) / limit).max(1) as u32
        }
    }
}
