//! Uniform role-gated transition table.
//!
//! Every workflow action is described by one [`TransitionRule`] row and
//! checked generically by [`evaluate`]; there is no per-action
//! special-casing. Ownership (for designer actions) is established by the
//! caller before evaluation.

use serde::{Deserialize, Serialize};

use makerstore_auth::Capabilities;
use makerstore_core::{DomainError, DomainResult};

use crate::state::WorkflowState;
use crate::state::WorkflowState::{
    Approved, ChangesRequested, Draft, Prototyping, Rejected, Submitted,
};

/// Actions gated by the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    RequestChanges,
    MoveToPrototyping,
    Approve,
    Reject,
    SubmitChanges,
    ProposePrice,
    Archive,
    Delete,
    AddNote,
}

impl WorkflowAction {
    pub const ALL: [WorkflowAction; 9] = [
        WorkflowAction::RequestChanges,
        WorkflowAction::MoveToPrototyping,
        WorkflowAction::Approve,
        WorkflowAction::Reject,
        WorkflowAction::SubmitChanges,
        WorkflowAction::ProposePrice,
        WorkflowAction::Archive,
        WorkflowAction::Delete,
        WorkflowAction::AddNote,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowAction::RequestChanges => "request_changes",
            WorkflowAction::MoveToPrototyping => "move_to_prototyping",
            WorkflowAction::Approve => "approve",
            WorkflowAction::Reject => "reject",
            WorkflowAction::SubmitChanges => "submit_changes",
            WorkflowAction::ProposePrice => "propose_price",
            WorkflowAction::Archive => "archive",
            WorkflowAction::Delete => "delete",
            WorkflowAction::AddNote => "add_note",
        }
    }
}

impl core::fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the transition table: the source states each capability may
/// trigger the action from, and the resulting state.
///
/// `target == None` means the action mutates bookkeeping only (archive flag,
/// internal note, soft-delete signal); the recorded state is unchanged.
#[derive(Debug, Clone, Copy)]
pub struct TransitionRule {
    pub action: WorkflowAction,
    pub admin_from: &'static [WorkflowState],
    pub moderator_from: &'static [WorkflowState],
    /// Source states for the owning designer. Ownership is verified by the
    /// caller; `evaluate` only receives the result.
    pub owner_from: &'static [WorkflowState],
    pub target: Option<WorkflowState>,
}

pub const TRANSITION_TABLE: &[TransitionRule] = &[
    TransitionRule {
        action: WorkflowAction::RequestChanges,
        admin_from: &[Submitted, Prototyping],
        moderator_from: &[Submitted],
        owner_from: &[],
        target: Some(ChangesRequested),
    },
    TransitionRule {
        action: WorkflowAction::MoveToPrototyping,
        admin_from: &[Submitted],
        moderator_from: &[Submitted],
        owner_from: &[],
        target: Some(Prototyping),
    },
    TransitionRule {
        action: WorkflowAction::Approve,
        admin_from: &[Prototyping, Draft, Rejected],
        moderator_from: &[],
        owner_from: &[],
        target: Some(Approved),
    },
    TransitionRule {
        action: WorkflowAction::Reject,
        admin_from: &[Draft, Submitted, ChangesRequested, Prototyping, Approved, Rejected],
        moderator_from: &[Submitted],
        owner_from: &[],
        target: Some(Rejected),
    },
    TransitionRule {
        action: WorkflowAction::SubmitChanges,
        admin_from: &[],
        moderator_from: &[],
        owner_from: &[ChangesRequested],
        target: Some(Submitted),
    },
    TransitionRule {
        action: WorkflowAction::ProposePrice,
        admin_from: &[Submitted],
        moderator_from: &[],
        owner_from: &[],
        target: Some(ChangesRequested),
    },
    TransitionRule {
        action: WorkflowAction::Archive,
        admin_from: &[Rejected],
        moderator_from: &[],
        owner_from: &[],
        target: None,
    },
    TransitionRule {
        action: WorkflowAction::Delete,
        admin_from: &[Rejected],
        moderator_from: &[],
        owner_from: &[],
        target: None,
    },
    TransitionRule {
        action: WorkflowAction::AddNote,
        admin_from: &[Prototyping],
        moderator_from: &[Prototyping],
        owner_from: &[],
        target: None,
    },
];

/// Look up the rule for an action.
pub fn rule_for(action: WorkflowAction) -> Option<&'static TransitionRule> {
    TRANSITION_TABLE.iter().find(|r| r.action == action)
}

/// Check an action against the table.
///
/// Returns the target state on success (`None` for bookkeeping-only
/// actions). On failure, distinguishes "nobody may do this from the current
/// state" (`InvalidTransition`) from "someone may, but not this actor"
/// (`PermissionDenied`).
pub fn evaluate(
    action: WorkflowAction,
    capabilities: &Capabilities,
    is_owner: bool,
    state: WorkflowState,
) -> DomainResult<Option<WorkflowState>> {
    let Some(rule) = rule_for(action) else {
        return Err(DomainError::invalid_transition(format!(
            "unknown action '{action}'"
        )));
    };

    if capabilities.is_admin() && rule.admin_from.contains(&state) {
        return Ok(rule.target);
    }
    if capabilities.is_moderator() && rule.moderator_from.contains(&state) {
        return Ok(rule.target);
    }
    if is_owner && capabilities.is_designer() && rule.owner_from.contains(&state) {
        return Ok(rule.target);
    }

    let reachable = rule.admin_from.contains(&state)
        || rule.moderator_from.contains(&state)
        || rule.owner_from.contains(&state);

    if reachable {
        Err(DomainError::permission_denied(format!(
            "'{action}' is not permitted for this actor in state '{state}'"
        )))
    } else {
        Err(DomainError::invalid_transition(format!(
            "'{action}' is not allowed from state '{state}'"
        )))
    }
}
