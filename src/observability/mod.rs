//! # Observability Module
//!
//! Structured logging for the store.
//!
//! The logger is an explicitly constructed value passed to each
//! component at construction time; its lifecycle belongs to the process
//! entry point, never to the store itself. Logging is read-only with no
//! side effects on execution and no background threads.

mod logger;

pub use logger::{Logger, Severity};
