//! # Record Store
//!
//! Owns the versioned-record lifecycle: creation with a fresh version
//! counter, conditional update by compare-and-set, hard delete, point
//! lookup, scoped listing, and batch lookup.
//!
//! The store keeps no mutable state of its own. All coordination is
//! delegated to the gateway's atomic conditional write, so any number of
//! process instances can share one backing engine without extra locking.

use std::sync::Arc;

use crate::clock::Clock;
use crate::context::CallContext;
use crate::errors::{StoreError, StoreResult};
use crate::gateway::RecordGateway;
use crate::observability::Logger;

use super::record::{initial_record, ConfigRecord, RecordPatch};

/// Versioned configuration record store
pub struct RecordStore<G: RecordGateway> {
    gateway: G,
    clock: Arc<dyn Clock>,
    logger: Logger,
}

impl<G: RecordGateway> RecordStore<G> {
    pub fn new(gateway: G, clock: Arc<dyn Clock>, logger: Logger) -> Self {
        Self {
            gateway,
            clock,
            logger,
        }
    }

    /// Create a record in `scope_name` with the given payload
    ///
    /// Stamps both timestamps to the clock's current instant, seeds the
    /// version counter, and returns the stored record with its assigned
    /// id. A failed write surfaces as `Persistence` with no retry.
    pub fn create(
        &self,
        ctx: &CallContext,
        scope_name: impl Into<String>,
        payload: impl Into<String>,
    ) -> StoreResult<ConfigRecord> {
        ctx.check()?;

        let record = initial_record(scope_name, payload, self.clock.now());
        let stored = match self.gateway.insert(ctx, record) {
            Ok(stored) => stored,
            Err(e) => {
                self.logger.error(
                    "RECORD_CREATE_FAILED",
                    &[
                        ("call_id", &ctx.call_id().to_string()),
                        ("reason", &e.to_string()),
                    ],
                );
                return Err(e);
            }
        };

        self.logger.info(
            "RECORD_CREATED",
            &[
                ("call_id", &ctx.call_id().to_string()),
                ("id", &stored.id.to_string()),
                ("scope", &stored.scope_name),
            ],
        );
        Ok(stored)
    }

    /// Conditionally update the record identified by `id`
    ///
    /// Applies `patch` only if the stored version still equals
    /// `expected_version`; on success the stored version becomes
    /// `expected_version + 1` and `modified_at` moves to now, atomically
    /// with the field changes. Zero matched rows is a `VersionConflict`,
    /// whether the version was stale or the id never existed; callers
    /// needing the distinction call `get` first.
    pub fn update(
        &self,
        ctx: &CallContext,
        id: i64,
        expected_version: i64,
        patch: &RecordPatch,
    ) -> StoreResult<()> {
        ctx.check()?;

        let affected =
            self.gateway
                .conditional_update(ctx, id, expected_version, patch, self.clock.now())?;
        if affected == 0 {
            self.logger.warn(
                "RECORD_VERSION_CONFLICT",
                &[
                    ("call_id", &ctx.call_id().to_string()),
                    ("expected_version", &expected_version.to_string()),
                    ("id", &id.to_string()),
                ],
            );
            return Err(StoreError::VersionConflict {
                id,
                expected: expected_version,
            });
        }

        self.logger.info(
            "RECORD_UPDATED",
            &[
                ("call_id", &ctx.call_id().to_string()),
                ("id", &id.to_string()),
                ("new_version", &(expected_version + 1).to_string()),
            ],
        );
        Ok(())
    }

    /// Hard-delete the record identified by `id`
    ///
    /// Deleting an id that does not exist reports `NotFound`.
    pub fn delete(&self, ctx: &CallContext, id: i64) -> StoreResult<()> {
        ctx.check()?;

        let affected = self.gateway.delete(ctx, id)?;
        if affected == 0 {
            return Err(StoreError::NotFound(id));
        }

        self.logger.info(
            "RECORD_DELETED",
            &[
                ("call_id", &ctx.call_id().to_string()),
                ("id", &id.to_string()),
            ],
        );
        Ok(())
    }

    /// Point lookup by id
    pub fn get(&self, ctx: &CallContext, id: i64) -> StoreResult<ConfigRecord> {
        ctx.check()?;
        self.gateway
            .find_by_id(ctx, id)?
            .ok_or(StoreError::NotFound(id))
    }

    /// All records owned by one scope, in storage-natural order
    pub fn list_by_scope(
        &self,
        ctx: &CallContext,
        scope_name: &str,
    ) -> StoreResult<Vec<ConfigRecord>> {
        ctx.check()?;
        self.gateway.find_by_scope(ctx, scope_name)
    }

    /// Batch lookup by id set
    ///
    /// An empty input returns empty without a storage round-trip.
    /// Missing ids are omitted from the result, not errored.
    pub fn list_by_ids(&self, ctx: &CallContext, ids: &[i64]) -> StoreResult<Vec<ConfigRecord>> {
        ctx.check()?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.gateway.find_by_ids(ctx, ids)
    }
}
