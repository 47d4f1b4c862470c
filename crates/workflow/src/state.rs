use serde::{Deserialize, Serialize};

/// Review-pipeline stage of a product workflow record.
///
/// Archival is tracked as a flag on the record, not a state: an archived
/// record remains `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Draft,
    Submitted,
    ChangesRequested,
    Prototyping,
    Approved,
    Rejected,
}

impl WorkflowState {
    pub const ALL: [WorkflowState; 6] = [
        WorkflowState::Draft,
        WorkflowState::Submitted,
        WorkflowState::ChangesRequested,
        WorkflowState::Prototyping,
        WorkflowState::Approved,
        WorkflowState::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Draft => "draft",
            WorkflowState::Submitted => "submitted",
            WorkflowState::ChangesRequested => "changes_requested",
            WorkflowState::Prototyping => "prototyping",
            WorkflowState::Approved => "approved",
            WorkflowState::Rejected => "rejected",
        }
    }

    /// Whether the record belongs to the development pipeline view
    /// (everything that is not live in the store).
    pub fn in_development(&self) -> bool {
        !matches!(self, WorkflowState::Approved)
    }
}

impl core::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
