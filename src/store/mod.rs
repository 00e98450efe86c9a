//! # Record Store Module
//!
//! Versioned configuration records with compare-and-swap update
//! semantics: creation seeds a fresh version counter, every successful
//! update bumps it by exactly one, and a stale caller version is
//! rejected as a conflict instead of silently overwriting.

pub mod record;
pub mod store;

pub use record::{
    apply_patch, initial_record, ConfigRecord, NewRecord, RecordPatch, INITIAL_VERSION,
};
pub use store::RecordStore;
