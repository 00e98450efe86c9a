//! # Config Records
//!
//! The versioned record entity and its pure state transitions.
//!
//! Timestamp and version stamping are explicit functions of the prior
//! state and a supplied instant, not side effects of a save hook: the
//! record store passes in the clock's time, and the same functions are
//! what the backing engine applies under its write lock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version assigned to every newly created record
pub const INITIAL_VERSION: i64 = 1;

/// A stored configuration record
///
/// The payload is an opaque credential/config blob; the store persists
/// and returns it but never interprets it. `version` is owned by the
/// record store: it starts at `INITIAL_VERSION` and moves up by exactly
/// one per successful conditional update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    /// Store-assigned identity, immutable
    pub id: i64,

    /// Name of the owning cluster entry; several records may share one
    pub scope_name: String,

    /// Opaque configuration content
    pub payload: String,

    /// Optimistic-concurrency counter
    pub version: i64,

    /// Set once at creation
    pub created_at: DateTime<Utc>,

    /// Set at creation and on every successful update
    pub modified_at: DateTime<Utc>,
}

/// A record as handed to the gateway for insertion, before an id exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub scope_name: String,
    pub payload: String,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Field changes applied by a conditional update
///
/// Unset fields are left untouched. An empty patch is legal: the update
/// still bumps the version and modification time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    payload: Option<String>,
    scope_name: Option<String>,
}

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the payload
    pub fn payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Move the record to a different scope
    pub fn scope_name(mut self, scope_name: impl Into<String>) -> Self {
        self.scope_name = Some(scope_name.into());
        self
    }

    /// True if no field is set
    pub fn is_empty(&self) -> bool {
        self.payload.is_none() && self.scope_name.is_none()
    }
}

/// Initial state for a record created at `now`
///
/// Both timestamps are stamped to the same instant and the version
/// counter is seeded fresh; a record recreated after a delete starts
/// over at `INITIAL_VERSION`.
pub fn initial_record(
    scope_name: impl Into<String>,
    payload: impl Into<String>,
    now: DateTime<Utc>,
) -> NewRecord {
    NewRecord {
        scope_name: scope_name.into(),
        payload: payload.into(),
        version: INITIAL_VERSION,
        created_at: now,
        modified_at: now,
    }
}

/// Next state for `record` after a successful conditional update at `now`
///
/// Applies the patch fields, bumps the version by exactly one, and moves
/// `modified_at` forward. `created_at` and `id` never change.
pub fn apply_patch(record: &ConfigRecord, patch: &RecordPatch, now: DateTime<Utc>) -> ConfigRecord {
    ConfigRecord {
        id: record.id,
        scope_name: patch
            .scope_name
            .clone()
            .unwrap_or_else(|| record.scope_name.clone()),
        payload: patch
            .payload
            .clone()
            .unwrap_or_else(|| record.payload.clone()),
        version: record.version + 1,
        created_at: record.created_at,
        modified_at: now,
    }
}
