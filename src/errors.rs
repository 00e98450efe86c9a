//! # Store Errors
//!
//! Unified error taxonomy for the record store, audit trail, and
//! persistence gateway. Every failure is classified into one of these
//! kinds and returned to the immediate caller; there are no internal
//! retries and no silent recovery. The boundary adapter owns any mapping
//! to a user-facing representation.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the record store and audit trail
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    // ==================
    // Backing Engine
    // ==================
    /// The backing engine failed (connection, constraint, lock poisoning).
    /// Surfaced verbatim; the caller decides whether to retry.
    #[error("Persistence failure: {0}")]
    Persistence(String),

    // ==================
    // Record Store
    // ==================
    /// A conditional update matched zero rows. The supplied version was
    /// stale, or the id does not exist; the affected-row count cannot
    /// distinguish the two. Callers needing the distinction perform an
    /// explicit get first.
    #[error("Version conflict on record {id}: stored version no longer matches {expected}")]
    VersionConflict {
        /// Record the update targeted
        id: i64,
        /// Version the caller expected to find
        expected: i64,
    },

    /// A point lookup or delete found no matching record.
    #[error("Record {0} not found")]
    NotFound(i64),

    // ==================
    // Caller Input
    // ==================
    /// Malformed pagination parameters (negative, non-numeric, or
    /// overflowing offset arithmetic).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ==================
    // Cancellation
    // ==================
    /// The caller's cancellation or deadline fired before completion.
    /// No storage work was issued after the context expired.
    #[error("Operation cancelled before completion")]
    Cancelled,
}

impl StoreError {
    /// Create a persistence error from any backing-engine failure
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Create an invalid-argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Stable string code for boundary-adapter envelopes
    pub fn code(&self) -> &'static str {
        match self {
            Self::Persistence(_) => "PERSISTENCE_ERROR",
            Self::VersionConflict { .. } => "VERSION_CONFLICT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Persistence(_) => 500,
            Self::VersionConflict { .. } => 409,
            Self::NotFound(_) => 404,
            Self::InvalidArgument(_) => 400,
            Self::Cancelled => 499,
        }
    }

    /// Whether a retry with refreshed state could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(StoreError::persistence("boom").code(), "PERSISTENCE_ERROR");
        assert_eq!(
            StoreError::VersionConflict { id: 1, expected: 3 }.code(),
            "VERSION_CONFLICT"
        );
        assert_eq!(StoreError::NotFound(7).code(), "NOT_FOUND");
        assert_eq!(
            StoreError::invalid_argument("bad page").code(),
            "INVALID_ARGUMENT"
        );
        assert_eq!(StoreError::Cancelled.code(), "CANCELLED");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(StoreError::persistence("boom").status_code(), 500);
        assert_eq!(
            StoreError::VersionConflict { id: 1, expected: 3 }.status_code(),
            409
        );
        assert_eq!(StoreError::NotFound(7).status_code(), 404);
        assert_eq!(StoreError::invalid_argument("x").status_code(), 400);
        assert_eq!(StoreError::Cancelled.status_code(), 499);
    }

    #[test]
    fn test_only_conflicts_are_retryable() {
        assert!(StoreError::VersionConflict { id: 1, expected: 2 }.is_retryable());
        assert!(!StoreError::NotFound(1).is_retryable());
        assert!(!StoreError::Cancelled.is_retryable());
        assert!(!StoreError::persistence("down").is_retryable());
    }

    #[test]
    fn test_conflict_display_names_record_and_version() {
        let err = StoreError::VersionConflict { id: 42, expected: 5 };
        let msg = format!("{}", err);
        assert!(msg.contains("42"));
        assert!(msg.contains("5"));
    }
}
