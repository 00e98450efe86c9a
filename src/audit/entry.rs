//! # Audit Entries
//!
//! The stored audit row and the event type collaborators submit.
//!
//! Entry content is opaque to the store: who did what to which target
//! with what outcome. The trail persists and retrieves entries but never
//! interprets these fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored audit entry describing one mutation event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Store-assigned identity
    pub id: i64,

    /// Who performed the action
    pub operator: String,

    /// What was done
    pub action: String,

    /// What it was done to
    pub target: String,

    /// How it ended
    pub outcome: String,

    /// Free-form context, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// When the trail accepted the entry
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Serialize to a JSON line for downstream log sinks
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

/// An audit event as submitted by the collaborator that witnessed it
///
/// The trail assigns the id and the `recorded_at` stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    pub operator: String,
    pub action: String,
    pub target: String,
    pub outcome: String,
    pub detail: Option<String>,
}

impl AuditEvent {
    /// Create an event with the required fields
    pub fn new(
        operator: impl Into<String>,
        action: impl Into<String>,
        target: impl Into<String>,
        outcome: impl Into<String>,
    ) -> Self {
        Self {
            operator: operator.into(),
            action: action.into(),
            target: target.into(),
            outcome: outcome.into(),
            detail: None,
        }
    }

    /// Attach free-form context
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
