//! # Pagination
//!
//! Offset-based pagination shared by paginated listings.
//!
//! `PageRequest` validates caller input before any storage access: page
//! and limit must be non-negative integers, and the computed offset must
//! not overflow. The parsing contract lives here so every boundary that
//! accepts page parameters rejects malformed input the same way.

use serde::Serialize;

use crate::errors::{StoreError, StoreResult};

/// A validated pagination request
///
/// `page` is a zero-based page index, `limit` the page size. The storage
/// offset is `page * limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Create a request from already-typed values
    pub fn new(page: u64, limit: u64) -> Self {
        Self { page, limit }
    }

    /// Parse a request from raw caller input
    ///
    /// Rejects non-numeric and negative values with `InvalidArgument`
    /// without touching storage.
    pub fn parse(page: &str, limit: &str) -> StoreResult<Self> {
        Ok(Self {
            page: parse_non_negative("page", page)?,
            limit: parse_non_negative("limit", limit)?,
        })
    }

    /// Zero-based page index
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Page size
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Storage offset for this page
    ///
    /// Fails with `InvalidArgument` if `page * limit` overflows.
    pub fn offset(&self) -> StoreResult<u64> {
        self.page.checked_mul(self.limit).ok_or_else(|| {
            StoreError::invalid_argument(format!(
                "offset overflows: page {} * limit {}",
                self.page, self.limit
            ))
        })
    }
}

/// One page of results plus the metadata to compute page counts
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Entries on this page, at most `limit`
    pub entries: Vec<T>,
    /// Total entries across all pages
    pub total: u64,
    /// Echo of the requested page index
    pub page: u64,
    /// Echo of the requested page size
    pub limit: u64,
}

fn parse_non_negative(name: &str, raw: &str) -> StoreResult<u64> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| StoreError::invalid_argument(format!("{} must be an integer, got {:?}", name, raw)))?;
    if value < 0 {
        return Err(StoreError::invalid_argument(format!(
            "{} must be non-negative, got {}",
            name, value
        )));
    }
    Ok(value as u64)
}
