//! Pagination limits for pickup point listings
//!
//! Out-of-range requests are clamped rather than rejected: a page below 1
//! becomes 1, a page size of 0 falls back to the default, and anything above
//! [`MAX_PAGE_SIZE`] is cut down to it.

/// First page number. Pages are 1-based.
pub const DEFAULT_PAGE: usize = 1;

/// Page size used when the caller gives none.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page a single request may fetch.
pub const MAX_PAGE_SIZE: usize = 30;
