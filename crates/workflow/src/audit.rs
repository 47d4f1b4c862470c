//! Append-only audit log attached to each workflow record.
//!
//! One entry per mutating operation, attributed to actor and timestamp.
//! Entries are immutable once written; nothing ever removes or rewrites
//! them (clearing a pending proposal does not touch the log).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use makerstore_core::UserId;

use crate::state::WorkflowState;

/// Stable identifier of what a log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    DesignSubmitted,
    StateChanged,
    PriceProposed,
    ProposalAccepted,
    ChangesSubmitted,
    InternalNoteAdded,
    Archived,
    DeleteRequested,
}

/// One immutable audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub actor_id: UserId,
    pub actor_name: String,
    pub action: AuditAction,
    pub from_state: Option<WorkflowState>,
    pub to_state: Option<WorkflowState>,
    pub notes: Option<String>,
    /// Staff-only entry; excluded from designer-facing reads.
    pub internal: bool,
    /// Action-specific detail (prices, reasons, file counts).
    pub payload: JsonValue,
}

/// Ordered append-only sequence of [`LogEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditLog {
    entries: Vec<LogEntry>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries newest-first, the usual read order for consumers.
    pub fn iter_latest_first(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().rev()
    }

    /// Entries visible to the record's designer (internal notes excluded).
    pub fn visible(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|e| !e.internal)
    }

    /// Most recent entry matching `action`.
    pub fn latest_matching(&self, action: AuditAction) -> Option<&LogEntry> {
        self.iter_latest_first().find(|e| e.action == action)
    }

    /// Most recent entry carrying non-empty notes among `actions`.
    ///
    /// Reverse scan with early exit; this feeds the "latest reviewer
    /// feedback" display.
    pub fn latest_notes(&self, actions: &[AuditAction]) -> Option<&LogEntry> {
        self.iter_latest_first().find(|e| {
            actions.contains(&e.action)
                && e.notes.as_deref().is_some_and(|n| !n.trim().is_empty())
        })
    }

    /// Timestamp of the first entry (the submission date for records created
    /// through the normal flow).
    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.entries.first().map(|e| e.timestamp)
    }
}
