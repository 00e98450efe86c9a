//! # Persistence Gateway
//!
//! The only seam touching physical storage.
//!
//! The record store and audit trail are written against these traits and
//! never see engine-specific types. Implementations must provide
//! row-level atomicity for `conditional_update`: the version match and
//! the field mutation are one operation, with the affected-row count as
//! the only signal of whether it applied. All methods participate in the
//! caller's cancellation by checking the context before doing work.

pub mod memory;

use chrono::{DateTime, Utc};

use crate::audit::entry::{AuditEntry, AuditEvent};
use crate::context::CallContext;
use crate::errors::StoreResult;
use crate::store::record::{ConfigRecord, NewRecord, RecordPatch};

pub use memory::MemoryGateway;

/// Storage operations backing the record store
pub trait RecordGateway: Send + Sync {
    /// Insert a record, assigning its id, and return the stored row
    fn insert(&self, ctx: &CallContext, record: NewRecord) -> StoreResult<ConfigRecord>;

    /// Atomically apply `patch` to the row whose id and version both
    /// match, bumping the version and stamping `modified_at`
    ///
    /// Returns the affected-row count: 1 if the compare-and-set applied,
    /// 0 if no row matched (missing id or stale version).
    fn conditional_update(
        &self,
        ctx: &CallContext,
        id: i64,
        expected_version: i64,
        patch: &RecordPatch,
        modified_at: DateTime<Utc>,
    ) -> StoreResult<u64>;

    /// Delete the row with this id, returning the affected-row count
    fn delete(&self, ctx: &CallContext, id: i64) -> StoreResult<u64>;

    /// Point lookup by id
    fn find_by_id(&self, ctx: &CallContext, id: i64) -> StoreResult<Option<ConfigRecord>>;

    /// All rows owned by one scope, in storage-natural order
    fn find_by_scope(&self, ctx: &CallContext, scope_name: &str) -> StoreResult<Vec<ConfigRecord>>;

    /// All rows whose id is in `ids`; absent ids are omitted
    fn find_by_ids(&self, ctx: &CallContext, ids: &[i64]) -> StoreResult<Vec<ConfigRecord>>;
}

/// Storage operations backing the audit trail
pub trait AuditGateway: Send + Sync {
    /// Append an entry, assigning its id, and return the stored row
    fn append(
        &self,
        ctx: &CallContext,
        event: &AuditEvent,
        recorded_at: DateTime<Utc>,
    ) -> StoreResult<AuditEntry>;

    /// Delete every entry whose id is in `ids`, returning how many
    /// existed; absent ids are ignored
    fn delete_batch(&self, ctx: &CallContext, ids: &[i64]) -> StoreResult<u64>;

    /// One page of entries in the engine's stable ordering, plus the
    /// total entry count
    fn list_page(
        &self,
        ctx: &CallContext,
        offset: u64,
        limit: u64,
    ) -> StoreResult<(Vec<AuditEntry>, u64)>;
}
