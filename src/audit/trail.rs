//! # Audit Trail
//!
//! Append-only log of mutation events with batch deletion and
//! offset/limit pagination. Entries are appended by the collaborator
//! that performed the mutation and are immutable afterwards; the only
//! way out is an explicit batch delete.

use std::sync::Arc;

use crate::clock::Clock;
use crate::context::CallContext;
use crate::errors::StoreResult;
use crate::gateway::AuditGateway;
use crate::observability::Logger;
use crate::page::{Page, PageRequest};

use super::entry::{AuditEntry, AuditEvent};

/// One page of audit entries
pub type AuditPage = Page<AuditEntry>;

/// Append-only audit log over a persistence gateway
pub struct AuditTrail<G: AuditGateway> {
    gateway: G,
    clock: Arc<dyn Clock>,
    logger: Logger,
}

impl<G: AuditGateway> AuditTrail<G> {
    pub fn new(gateway: G, clock: Arc<dyn Clock>, logger: Logger) -> Self {
        Self {
            gateway,
            clock,
            logger,
        }
    }

    /// Append an event, stamping it with the clock's current instant
    pub fn append(&self, ctx: &CallContext, event: AuditEvent) -> StoreResult<AuditEntry> {
        ctx.check()?;
        let entry = self.gateway.append(ctx, &event, self.clock.now())?;

        self.logger.trace(
            "AUDIT_APPENDED",
            &[
                ("call_id", &ctx.call_id().to_string()),
                ("id", &entry.id.to_string()),
            ],
        );
        Ok(entry)
    }

    /// Delete every entry whose id is in `ids`
    ///
    /// Ids with no matching entry are ignored. An empty set is a no-op
    /// that never reaches storage. Returns the number of entries removed.
    pub fn delete_batch(&self, ctx: &CallContext, ids: &[i64]) -> StoreResult<u64> {
        ctx.check()?;
        if ids.is_empty() {
            return Ok(0);
        }

        let removed = self.gateway.delete_batch(ctx, ids)?;
        self.logger.info(
            "AUDIT_BATCH_DELETED",
            &[
                ("call_id", &ctx.call_id().to_string()),
                ("removed", &removed.to_string()),
                ("requested", &ids.len().to_string()),
            ],
        );
        Ok(removed)
    }

    /// One page of entries plus the total count
    ///
    /// The request is validated before any storage access; the engine
    /// serves entries in its stable most-recent-first ordering.
    pub fn list_page(&self, ctx: &CallContext, request: PageRequest) -> StoreResult<AuditPage> {
        ctx.check()?;
        let offset = request.offset()?;

        let (entries, total) = self.gateway.list_page(ctx, offset, request.limit())?;
        Ok(AuditPage {
            entries,
            total,
            page: request.page(),
            limit: request.limit(),
        })
    }
}
