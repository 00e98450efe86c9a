//! credstore - versioned configuration records with compare-and-swap updates
//!
//! Holds named configuration blobs scoped to a parent cluster entry and
//! guarantees that concurrent updates to the same record cannot silently
//! overwrite each other, alongside an append-only paginated audit trail.

pub mod audit;
pub mod clock;
pub mod context;
pub mod errors;
pub mod gateway;
pub mod observability;
pub mod page;
pub mod store;
