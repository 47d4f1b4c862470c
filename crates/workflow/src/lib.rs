//! `makerstore-workflow` — the submission review pipeline.
//!
//! Pure domain crate: the product workflow record (aggregate), the uniform
//! role-gated transition table, the price-proposal negotiation rules, and the
//! append-only audit log. No IO; persistence and side effects live in
//! `makerstore-infra`.

pub mod audit;
pub mod proposal;
pub mod state;
pub mod submission;
pub mod transitions;

pub use audit::{AuditAction, AuditLog, LogEntry};
pub use proposal::PendingProposal;
pub use state::WorkflowState;
pub use submission::{
    AddNote, ApproveDesign, ArchiveDesign, ConfirmChanges, DeleteDesign, MoveToPrototyping,
    ProposePrice, RejectDesign, RejectionReason, RequestChanges, SubmitDesign, Submission,
    SubmissionCommand, SubmissionEvent,
};
pub use transitions::{TransitionRule, WorkflowAction, TRANSITION_TABLE};
