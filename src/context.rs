//! # Call Context
//!
//! Context carried through every store and gateway call.
//!
//! Carries a call id for log correlation plus the caller's cancellation
//! and deadline state. Operations check the context before issuing any
//! storage work; a cancelled or expired context yields `Cancelled` and
//! nothing is written. Cancellation is cooperative: it cannot interrupt
//! a storage operation already in flight, but the engine's atomicity
//! means there is never a partial mutation to undo.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::errors::{StoreError, StoreResult};

/// Context for a single store or audit operation
#[derive(Debug, Clone)]
pub struct CallContext {
    /// Call ID for tracing
    call_id: Uuid,

    /// Cooperative cancellation flag, shared with the handle
    cancelled: Arc<AtomicBool>,

    /// Absolute deadline, if the caller set one
    deadline: Option<Instant>,
}

impl CallContext {
    /// Create a context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Self {
            call_id: Uuid::new_v4(),
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// Create a cancellable context and the handle that cancels it
    pub fn cancellable() -> (Self, CancelHandle) {
        let flag = Arc::new(AtomicBool::new(false));
        let ctx = Self {
            call_id: Uuid::new_v4(),
            cancelled: Arc::clone(&flag),
            deadline: None,
        };
        (ctx, CancelHandle { flag })
    }

    /// Derive a context that also expires after `timeout`
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            ..self
        }
    }

    /// The id identifying this call in log output
    pub fn call_id(&self) -> Uuid {
        self.call_id
    }

    /// Whether the caller has cancelled or the deadline has passed
    pub fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::Acquire) {
            return true;
        }
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }

    /// Fail with `Cancelled` if the context is no longer live
    pub fn check(&self) -> StoreResult<()> {
        if self.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        Ok(())
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::background()
    }
}

/// Handle that cancels the context it was created with
///
/// Cloneable and sendable so a supervising task can cancel from another
/// thread.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Cancel the associated context; idempotent
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }
}
