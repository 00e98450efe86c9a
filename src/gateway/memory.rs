//! # In-Memory Engine
//!
//! In-process backing engine implementing both gateway traits.
//!
//! Each table is a `RwLock`-guarded vector with a monotonic id sequence.
//! A conditional update runs entirely under the table's write lock, so
//! the version check and the field mutation are a single atomic
//! operation; concurrent racers on the same stale version see exactly
//! one winner. Lock poisoning is reported as a persistence failure
//! rather than a panic.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use super::{AuditGateway, RecordGateway};
use crate::audit::entry::{AuditEntry, AuditEvent};
use crate::context::CallContext;
use crate::errors::{StoreError, StoreResult};
use crate::store::record::{apply_patch, ConfigRecord, NewRecord, RecordPatch};

const LOCK_POISONED: &str = "table lock poisoned";

/// In-memory backing engine for records and audit entries
#[derive(Debug, Default)]
pub struct MemoryGateway {
    records: RwLock<Vec<ConfigRecord>>,
    entries: RwLock<Vec<AuditEntry>>,
    next_record_id: AtomicI64,
    next_entry_id: AtomicI64,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            entries: RwLock::new(Vec::new()),
            next_record_id: AtomicI64::new(1),
            next_entry_id: AtomicI64::new(1),
        }
    }
}

impl RecordGateway for MemoryGateway {
    fn insert(&self, ctx: &CallContext, record: NewRecord) -> StoreResult<ConfigRecord> {
        ctx.check()?;
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::persistence(LOCK_POISONED))?;

        let stored = ConfigRecord {
            id: self.next_record_id.fetch_add(1, Ordering::Relaxed),
            scope_name: record.scope_name,
            payload: record.payload,
            version: record.version,
            created_at: record.created_at,
            modified_at: record.modified_at,
        };
        records.push(stored.clone());
        Ok(stored)
    }

    fn conditional_update(
        &self,
        ctx: &CallContext,
        id: i64,
        expected_version: i64,
        patch: &RecordPatch,
        modified_at: DateTime<Utc>,
    ) -> StoreResult<u64> {
        ctx.check()?;
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::persistence(LOCK_POISONED))?;

        // Match on (id, version) and mutate in place while still holding
        // the write lock.
        match records
            .iter_mut()
            .find(|r| r.id == id && r.version == expected_version)
        {
            Some(row) => {
                *row = apply_patch(row, patch, modified_at);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete(&self, ctx: &CallContext, id: i64) -> StoreResult<u64> {
        ctx.check()?;
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::persistence(LOCK_POISONED))?;

        let before = records.len();
        records.retain(|r| r.id != id);
        Ok((before - records.len()) as u64)
    }

    fn find_by_id(&self, ctx: &CallContext, id: i64) -> StoreResult<Option<ConfigRecord>> {
        ctx.check()?;
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::persistence(LOCK_POISONED))?;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    fn find_by_scope(&self, ctx: &CallContext, scope_name: &str) -> StoreResult<Vec<ConfigRecord>> {
        ctx.check()?;
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::persistence(LOCK_POISONED))?;
        Ok(records
            .iter()
            .filter(|r| r.scope_name == scope_name)
            .cloned()
            .collect())
    }

    fn find_by_ids(&self, ctx: &CallContext, ids: &[i64]) -> StoreResult<Vec<ConfigRecord>> {
        ctx.check()?;
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::persistence(LOCK_POISONED))?;
        Ok(records
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }
}

impl AuditGateway for MemoryGateway {
    fn append(
        &self,
        ctx: &CallContext,
        event: &AuditEvent,
        recorded_at: DateTime<Utc>,
    ) -> StoreResult<AuditEntry> {
        ctx.check()?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::persistence(LOCK_POISONED))?;

        let stored = AuditEntry {
            id: self.next_entry_id.fetch_add(1, Ordering::Relaxed),
            operator: event.operator.clone(),
            action: event.action.clone(),
            target: event.target.clone(),
            outcome: event.outcome.clone(),
            detail: event.detail.clone(),
            recorded_at,
        };
        entries.push(stored.clone());
        Ok(stored)
    }

    fn delete_batch(&self, ctx: &CallContext, ids: &[i64]) -> StoreResult<u64> {
        ctx.check()?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::persistence(LOCK_POISONED))?;

        let before = entries.len();
        entries.retain(|e| !ids.contains(&e.id));
        Ok((before - entries.len()) as u64)
    }

    fn list_page(
        &self,
        ctx: &CallContext,
        offset: u64,
        limit: u64,
    ) -> StoreResult<(Vec<AuditEntry>, u64)> {
        ctx.check()?;
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::persistence(LOCK_POISONED))?;

        let total = entries.len() as u64;

        // Newest first; ids come from a monotonic sequence so this is
        // stable across repeated reads with no intervening writes.
        let mut ordered: Vec<AuditEntry> = entries.clone();
        ordered.sort_by(|a, b| b.id.cmp(&a.id));

        let page = ordered
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();

        Ok((page, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::record::{initial_record, INITIAL_VERSION};
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap()
    }

    fn insert_sample(gateway: &MemoryGateway, scope: &str) -> ConfigRecord {
        let ctx = CallContext::background();
        gateway
            .insert(&ctx, initial_record(scope, "blob", instant()))
            .unwrap()
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let gateway = MemoryGateway::new();
        let first = insert_sample(&gateway, "prod");
        let second = insert_sample(&gateway, "prod");

        assert!(second.id > first.id);
        assert_eq!(first.version, INITIAL_VERSION);
    }

    #[test]
    fn test_conditional_update_matching_version_affects_one_row() {
        let gateway = MemoryGateway::new();
        let ctx = CallContext::background();
        let record = insert_sample(&gateway, "prod");

        let affected = gateway
            .conditional_update(
                &ctx,
                record.id,
                record.version,
                &RecordPatch::new().payload("rotated"),
                instant(),
            )
            .unwrap();

        assert_eq!(affected, 1);
        let stored = gateway.find_by_id(&ctx, record.id).unwrap().unwrap();
        assert_eq!(stored.version, record.version + 1);
        assert_eq!(stored.payload, "rotated");
        assert_eq!(stored.modified_at, instant());
    }

    #[test]
    fn test_conditional_update_stale_version_affects_zero_rows() {
        let gateway = MemoryGateway::new();
        let ctx = CallContext::background();
        let record = insert_sample(&gateway, "prod");

        let affected = gateway
            .conditional_update(
                &ctx,
                record.id,
                record.version + 5,
                &RecordPatch::new().payload("rotated"),
                instant(),
            )
            .unwrap();

        assert_eq!(affected, 0);
        // Row untouched
        let stored = gateway.find_by_id(&ctx, record.id).unwrap().unwrap();
        assert_eq!(stored, record);
    }

    #[test]
    fn test_conditional_update_missing_id_affects_zero_rows() {
        let gateway = MemoryGateway::new();
        let ctx = CallContext::background();

        let affected = gateway
            .conditional_update(&ctx, 999, 1, &RecordPatch::new(), instant())
            .unwrap();
        assert_eq!(affected, 0);
    }

    #[test]
    fn test_delete_reports_affected_rows() {
        let gateway = MemoryGateway::new();
        let ctx = CallContext::background();
        let record = insert_sample(&gateway, "prod");

        assert_eq!(gateway.delete(&ctx, record.id).unwrap(), 1);
        assert_eq!(gateway.delete(&ctx, record.id).unwrap(), 0);
        assert!(gateway.find_by_id(&ctx, record.id).unwrap().is_none());
    }

    #[test]
    fn test_find_by_scope_filters() {
        let gateway = MemoryGateway::new();
        let ctx = CallContext::background();
        insert_sample(&gateway, "prod");
        insert_sample(&gateway, "prod");
        insert_sample(&gateway, "staging");

        let prod = gateway.find_by_scope(&ctx, "prod").unwrap();
        assert_eq!(prod.len(), 2);
        assert!(prod.iter().all(|r| r.scope_name == "prod"));
        assert!(gateway.find_by_scope(&ctx, "missing").unwrap().is_empty());
    }

    #[test]
    fn test_find_by_ids_omits_missing() {
        let gateway = MemoryGateway::new();
        let ctx = CallContext::background();
        let first = insert_sample(&gateway, "prod");
        let second = insert_sample(&gateway, "prod");

        let found = gateway
            .find_by_ids(&ctx, &[first.id, second.id, 999])
            .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_cancelled_context_issues_no_work() {
        let gateway = MemoryGateway::new();
        let (ctx, handle) = CallContext::cancellable();
        handle.cancel();

        let result = gateway.insert(&ctx, initial_record("prod", "blob", instant()));
        assert!(matches!(result, Err(StoreError::Cancelled)));
        assert!(gateway
            .find_by_scope(&CallContext::background(), "prod")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_audit_append_and_page_newest_first() {
        let gateway = MemoryGateway::new();
        let ctx = CallContext::background();

        for i in 0..3 {
            let event = AuditEvent::new("admin", "CREATE", format!("record/{}", i), "SUCCESS");
            gateway.append(&ctx, &event, instant()).unwrap();
        }

        let (page, total) = gateway.list_page(&ctx, 0, 10).unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.len(), 3);
        assert!(page[0].id > page[1].id);
        assert!(page[1].id > page[2].id);
    }

    #[test]
    fn test_audit_page_offset_and_limit() {
        let gateway = MemoryGateway::new();
        let ctx = CallContext::background();

        for i in 0..5 {
            let event = AuditEvent::new("admin", "CREATE", format!("record/{}", i), "SUCCESS");
            gateway.append(&ctx, &event, instant()).unwrap();
        }

        let (page, total) = gateway.list_page(&ctx, 4, 2).unwrap();
        assert_eq!(total, 5);
        assert_eq!(page.len(), 1);

        let (page, _) = gateway.list_page(&ctx, 10, 2).unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn test_audit_delete_batch_ignores_missing_ids() {
        let gateway = MemoryGateway::new();
        let ctx = CallContext::background();

        let kept = gateway
            .append(
                &ctx,
                &AuditEvent::new("admin", "CREATE", "record/1", "SUCCESS"),
                instant(),
            )
            .unwrap();
        let removed = gateway
            .append(
                &ctx,
                &AuditEvent::new("admin", "DELETE", "record/2", "SUCCESS"),
                instant(),
            )
            .unwrap();

        let count = gateway.delete_batch(&ctx, &[removed.id, 999]).unwrap();
        assert_eq!(count, 1);

        let (page, total) = gateway.list_page(&ctx, 0, 10).unwrap();
        assert_eq!(total, 1);
        assert_eq!(page[0].id, kept.id);
    }
}
