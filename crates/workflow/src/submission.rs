use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use makerstore_auth::Actor;
use makerstore_core::{
    Aggregate, AggregateRoot, DomainError, FileRef, Price, ProductId, RoyaltyPercent, UserId,
};

use crate::audit::{AuditAction, AuditLog, LogEntry};
use crate::proposal::PendingProposal;
use crate::state::WorkflowState;
use crate::transitions::{evaluate, WorkflowAction};

/// Structured reason attached to a rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    NotManufacturable,
    PoorQuality,
    IntellectualProperty,
    Other(String),
}

/// Aggregate root: product workflow record.
///
/// The catalog entry itself (description, images, storefront data) is owned
/// by the external store; this record tracks the review pipeline: state,
/// negotiated pricing, archival bookkeeping and the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    id: ProductId,
    designer_id: Option<UserId>,
    title: String,
    state: WorkflowState,
    proposed_price: Option<Price>,
    final_price: Option<Price>,
    royalty_percent: Option<RoyaltyPercent>,
    pending_proposal: Option<PendingProposal>,
    archived: bool,
    archived_at: Option<DateTime<Utc>>,
    archived_by: Option<UserId>,
    audit_log: AuditLog,
    version: u64,
    created: bool,
}

impl Submission {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: ProductId) -> Self {
        Self {
            id,
            designer_id: None,
            title: String::new(),
            state: WorkflowState::Draft,
            proposed_price: None,
            final_price: None,
            royalty_percent: None,
            pending_proposal: None,
            archived: false,
            archived_at: None,
            archived_by: None,
            audit_log: AuditLog::new(),
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn designer_id(&self) -> Option<UserId> {
        self.designer_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn proposed_price(&self) -> Option<Price> {
        self.proposed_price
    }

    pub fn final_price(&self) -> Option<Price> {
        self.final_price
    }

    pub fn royalty_percent(&self) -> Option<RoyaltyPercent> {
        self.royalty_percent
    }

    pub fn pending_proposal(&self) -> Option<&PendingProposal> {
        self.pending_proposal.as_ref()
    }

    pub fn has_pending_proposal(&self) -> bool {
        self.pending_proposal.is_some()
    }

    pub fn archived(&self) -> bool {
        self.archived
    }

    pub fn archived_at(&self) -> Option<DateTime<Utc>> {
        self.archived_at
    }

    pub fn archived_by(&self) -> Option<UserId> {
        self.archived_by
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.audit_log
    }

    /// The price shown to buyers: final if set, else the designer's proposal.
    pub fn effective_price(&self) -> Option<Price> {
        self.final_price.or(self.proposed_price)
    }

    pub fn price_is_final(&self) -> bool {
        self.final_price.is_some()
    }

    fn is_owner(&self, actor: &Actor) -> bool {
        self.designer_id == Some(actor.id)
    }
}

impl AggregateRoot for Submission {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: SubmitDesign (creates the record).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitDesign {
    pub product_id: ProductId,
    pub actor: Actor,
    pub title: String,
    pub estimated_price: Price,
    /// `None` applies the standard marketplace rate.
    pub royalty: Option<RoyaltyPercent>,
    pub files: Vec<FileRef>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RequestChanges (content-change request, no price effect).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestChanges {
    pub product_id: ProductId,
    pub actor: Actor,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: MoveToPrototyping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveToPrototyping {
    pub product_id: ProductId,
    pub actor: Actor,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ApproveDesign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveDesign {
    pub product_id: ProductId,
    pub actor: Actor,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RejectDesign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectDesign {
    pub product_id: ProductId,
    pub actor: Actor,
    pub reason: RejectionReason,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ProposePrice (admin price proposal, requires designer
/// confirmation before it takes effect).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposePrice {
    pub product_id: ProductId,
    pub actor: Actor,
    pub price: Price,
    pub royalty: RoyaltyPercent,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ConfirmChanges.
///
/// One atomic operation: commits price/royalty (from the pending proposal if
/// present, else from the designer's input), clears the proposal, and
/// transitions back to `Submitted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmChanges {
    pub product_id: ProductId,
    pub actor: Actor,
    pub price: Price,
    pub royalty: RoyaltyPercent,
    pub notes: Option<String>,
    pub files: Vec<FileRef>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddNote (staff-only, prototyping stage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddNote {
    pub product_id: ProductId,
    pub actor: Actor,
    pub notes: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ArchiveDesign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveDesign {
    pub product_id: ProductId,
    pub actor: Actor,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeleteDesign (soft-delete signal; requires prior archive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteDesign {
    pub product_id: ProductId,
    pub actor: Actor,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionCommand {
    SubmitDesign(SubmitDesign),
    RequestChanges(RequestChanges),
    MoveToPrototyping(MoveToPrototyping),
    Approve(ApproveDesign),
    Reject(RejectDesign),
    ProposePrice(ProposePrice),
    ConfirmChanges(ConfirmChanges),
    AddNote(AddNote),
    Archive(ArchiveDesign),
    Delete(DeleteDesign),
}

/// Event: DesignSubmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignSubmitted {
    pub product_id: ProductId,
    pub designer_id: UserId,
    pub designer_name: String,
    pub title: String,
    pub estimated_price: Price,
    pub royalty: RoyaltyPercent,
    pub files: Vec<FileRef>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ChangesWereRequested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangesWereRequested {
    pub product_id: ProductId,
    pub actor_id: UserId,
    pub actor_name: String,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: MovedIntoPrototyping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovedIntoPrototyping {
    pub product_id: ProductId,
    pub actor_id: UserId,
    pub actor_name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: DesignApproved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignApproved {
    pub product_id: ProductId,
    pub actor_id: UserId,
    pub actor_name: String,
    /// Effective price at approval time; published to the catalog.
    pub sale_price: Option<Price>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: DesignRejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignRejected {
    pub product_id: ProductId,
    pub actor_id: UserId,
    pub actor_name: String,
    pub reason: RejectionReason,
    pub notes: Option<String>,
    /// The record was live in the store; the catalog listing must be pulled.
    pub was_published: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PriceWasProposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceWasProposed {
    pub product_id: ProductId,
    pub actor_id: UserId,
    pub actor_name: String,
    pub price: Price,
    pub royalty: RoyaltyPercent,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ChangesSubmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangesSubmitted {
    pub product_id: ProductId,
    pub actor_id: UserId,
    pub actor_name: String,
    pub price: Price,
    pub royalty: RoyaltyPercent,
    pub notes: Option<String>,
    pub files: Vec<FileRef>,
    /// The committed values came from a pending admin proposal.
    pub accepted_proposal: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Event: InternalNoteAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalNoteAdded {
    pub product_id: ProductId,
    pub actor_id: UserId,
    pub actor_name: String,
    pub notes: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: DesignArchived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignArchived {
    pub product_id: ProductId,
    pub actor_id: UserId,
    pub actor_name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: DeleteRequested (soft-delete signal for the external store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequested {
    pub product_id: ProductId,
    pub actor_id: UserId,
    pub actor_name: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionEvent {
    DesignSubmitted(DesignSubmitted),
    ChangesWereRequested(ChangesWereRequested),
    MovedIntoPrototyping(MovedIntoPrototyping),
    DesignApproved(DesignApproved),
    DesignRejected(DesignRejected),
    PriceWasProposed(PriceWasProposed),
    ChangesSubmitted(ChangesSubmitted),
    InternalNoteAdded(InternalNoteAdded),
    DesignArchived(DesignArchived),
    DeleteRequested(DeleteRequested),
}

impl SubmissionEvent {
    /// Stable event name/type identifier.
    pub fn event_type(&self) -> &'static str {
        match self {
            SubmissionEvent::DesignSubmitted(_) => "workflow.design.submitted",
            SubmissionEvent::ChangesWereRequested(_) => "workflow.changes.requested",
            SubmissionEvent::MovedIntoPrototyping(_) => "workflow.prototyping.started",
            SubmissionEvent::DesignApproved(_) => "workflow.design.approved",
            SubmissionEvent::DesignRejected(_) => "workflow.design.rejected",
            SubmissionEvent::PriceWasProposed(_) => "workflow.price.proposed",
            SubmissionEvent::ChangesSubmitted(_) => "workflow.changes.submitted",
            SubmissionEvent::InternalNoteAdded(_) => "workflow.note.added",
            SubmissionEvent::DesignArchived(_) => "workflow.design.archived",
            SubmissionEvent::DeleteRequested(_) => "workflow.design.delete_requested",
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SubmissionEvent::DesignSubmitted(e) => e.occurred_at,
            SubmissionEvent::ChangesWereRequested(e) => e.occurred_at,
            SubmissionEvent::MovedIntoPrototyping(e) => e.occurred_at,
            SubmissionEvent::DesignApproved(e) => e.occurred_at,
            SubmissionEvent::DesignRejected(e) => e.occurred_at,
            SubmissionEvent::PriceWasProposed(e) => e.occurred_at,
            SubmissionEvent::ChangesSubmitted(e) => e.occurred_at,
            SubmissionEvent::InternalNoteAdded(e) => e.occurred_at,
            SubmissionEvent::DesignArchived(e) => e.occurred_at,
            SubmissionEvent::DeleteRequested(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Submission {
    type Command = SubmissionCommand;
    type Event = SubmissionEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        let from = self.state;

        match event {
            SubmissionEvent::DesignSubmitted(e) => {
                self.id = e.product_id;
                self.designer_id = Some(e.designer_id);
                self.title = e.title.clone();
                self.state = WorkflowState::Submitted;
                self.proposed_price = Some(e.estimated_price);
                self.royalty_percent = Some(e.royalty);
                self.created = true;
                self.audit_log.append(LogEntry {
                    timestamp: e.occurred_at,
                    actor_id: e.designer_id,
                    actor_name: e.designer_name.clone(),
                    action: AuditAction::DesignSubmitted,
                    from_state: None,
                    to_state: Some(WorkflowState::Submitted),
                    notes: None,
                    internal: false,
                    payload: json!({
                        "proposed_price": e.estimated_price,
                        "royalty": e.royalty,
                        "files_uploaded": e.files.len(),
                    }),
                });
            }
            SubmissionEvent::ChangesWereRequested(e) => {
                self.state = WorkflowState::ChangesRequested;
                self.audit_log.append(LogEntry {
                    timestamp: e.occurred_at,
                    actor_id: e.actor_id,
                    actor_name: e.actor_name.clone(),
                    action: AuditAction::StateChanged,
                    from_state: Some(from),
                    to_state: Some(WorkflowState::ChangesRequested),
                    notes: e.notes.clone(),
                    internal: false,
                    payload: json!({ "action": "request_changes" }),
                });
            }
            SubmissionEvent::MovedIntoPrototyping(e) => {
                self.state = WorkflowState::Prototyping;
                self.audit_log.append(LogEntry {
                    timestamp: e.occurred_at,
                    actor_id: e.actor_id,
                    actor_name: e.actor_name.clone(),
                    action: AuditAction::StateChanged,
                    from_state: Some(from),
                    to_state: Some(WorkflowState::Prototyping),
                    notes: None,
                    internal: false,
                    payload: json!({ "action": "move_to_prototyping" }),
                });
            }
            SubmissionEvent::DesignApproved(e) => {
                // The accepted proposed price becomes final at approval time.
                self.final_price = self.final_price.or(self.proposed_price);
                self.state = WorkflowState::Approved;
                self.audit_log.append(LogEntry {
                    timestamp: e.occurred_at,
                    actor_id: e.actor_id,
                    actor_name: e.actor_name.clone(),
                    action: AuditAction::StateChanged,
                    from_state: Some(from),
                    to_state: Some(WorkflowState::Approved),
                    notes: None,
                    internal: false,
                    payload: json!({ "action": "approve", "sale_price": e.sale_price }),
                });
            }
            SubmissionEvent::DesignRejected(e) => {
                // A proposal only has meaning while the record awaits the
                // designer's confirmation.
                self.pending_proposal = None;
                self.state = WorkflowState::Rejected;
                self.audit_log.append(LogEntry {
                    timestamp: e.occurred_at,
                    actor_id: e.actor_id,
                    actor_name: e.actor_name.clone(),
                    action: AuditAction::StateChanged,
                    from_state: Some(from),
                    to_state: Some(WorkflowState::Rejected),
                    notes: e.notes.clone(),
                    internal: false,
                    payload: json!({
                        "action": "reject",
                        "reason": e.reason,
                        "was_published": e.was_published,
                    }),
                });
            }
            SubmissionEvent::PriceWasProposed(e) => {
                self.pending_proposal = Some(PendingProposal {
                    price: e.price,
                    royalty: e.royalty,
                    notes: e.notes.clone(),
                    proposed_by: e.actor_id,
                    proposed_at: e.occurred_at,
                });
                self.state = WorkflowState::ChangesRequested;
                self.audit_log.append(LogEntry {
                    timestamp: e.occurred_at,
                    actor_id: e.actor_id,
                    actor_name: e.actor_name.clone(),
                    action: AuditAction::PriceProposed,
                    from_state: Some(from),
                    to_state: Some(WorkflowState::ChangesRequested),
                    notes: e.notes.clone(),
                    internal: false,
                    payload: json!({
                        "price": e.price,
                        "royalty": e.royalty,
                        "requires_designer_confirmation": true,
                    }),
                });
            }
            SubmissionEvent::ChangesSubmitted(e) => {
                self.proposed_price = Some(e.price);
                self.royalty_percent = Some(e.royalty);
                self.pending_proposal = None;
                self.state = WorkflowState::Submitted;
                let action = if e.accepted_proposal {
                    AuditAction::ProposalAccepted
                } else {
                    AuditAction::ChangesSubmitted
                };
                self.audit_log.append(LogEntry {
                    timestamp: e.occurred_at,
                    actor_id: e.actor_id,
                    actor_name: e.actor_name.clone(),
                    action,
                    from_state: Some(from),
                    to_state: Some(WorkflowState::Submitted),
                    notes: e.notes.clone(),
                    internal: false,
                    payload: json!({
                        "price": e.price,
                        "royalty": e.royalty,
                        "files_uploaded": e.files.len(),
                        "accepted_proposal": e.accepted_proposal,
                    }),
                });
            }
            SubmissionEvent::InternalNoteAdded(e) => {
                self.audit_log.append(LogEntry {
                    timestamp: e.occurred_at,
                    actor_id: e.actor_id,
                    actor_name: e.actor_name.clone(),
                    action: AuditAction::InternalNoteAdded,
                    from_state: None,
                    to_state: None,
                    notes: Some(e.notes.clone()),
                    internal: true,
                    payload: json!({}),
                });
            }
            SubmissionEvent::DesignArchived(e) => {
                self.archived = true;
                self.archived_at = Some(e.occurred_at);
                self.archived_by = Some(e.actor_id);
                self.audit_log.append(LogEntry {
                    timestamp: e.occurred_at,
                    actor_id: e.actor_id,
                    actor_name: e.actor_name.clone(),
                    action: AuditAction::Archived,
                    from_state: None,
                    to_state: None,
                    notes: None,
                    internal: false,
                    payload: json!({}),
                });
            }
            SubmissionEvent::DeleteRequested(e) => {
                self.audit_log.append(LogEntry {
                    timestamp: e.occurred_at,
                    actor_id: e.actor_id,
                    actor_name: e.actor_name.clone(),
                    action: AuditAction::DeleteRequested,
                    from_state: None,
                    to_state: None,
                    notes: None,
                    internal: false,
                    payload: json!({}),
                });
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            SubmissionCommand::SubmitDesign(cmd) => self.handle_submit(cmd),
            SubmissionCommand::RequestChanges(cmd) => self.handle_request_changes(cmd),
            SubmissionCommand::MoveToPrototyping(cmd) => self.handle_move_to_prototyping(cmd),
            SubmissionCommand::Approve(cmd) => self.handle_approve(cmd),
            SubmissionCommand::Reject(cmd) => self.handle_reject(cmd),
            SubmissionCommand::ProposePrice(cmd) => self.handle_propose_price(cmd),
            SubmissionCommand::ConfirmChanges(cmd) => self.handle_confirm_changes(cmd),
            SubmissionCommand::AddNote(cmd) => self.handle_add_note(cmd),
            SubmissionCommand::Archive(cmd) => self.handle_archive(cmd),
            SubmissionCommand::Delete(cmd) => self.handle_delete(cmd),
        }
    }
}

impl Submission {
    fn ensure_created(&self) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        Ok(())
    }

    fn ensure_target(&self, product_id: ProductId) -> Result<(), DomainError> {
        if self.id != product_id {
            return Err(DomainError::validation(
                "product_id",
                "command targets a different submission",
            ));
        }
        Ok(())
    }

    fn handle_submit(&self, cmd: &SubmitDesign) -> Result<Vec<SubmissionEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("submission already exists"));
        }
        if cmd.title.trim().is_empty() {
            return Err(DomainError::validation("title", "must not be empty"));
        }
        if !cmd.actor.capabilities.can_submit() {
            return Err(DomainError::permission_denied(
                "designer role required to submit designs",
            ));
        }

        Ok(vec![SubmissionEvent::DesignSubmitted(DesignSubmitted {
            product_id: cmd.product_id,
            designer_id: cmd.actor.id,
            designer_name: cmd.actor.name.clone(),
            title: cmd.title.clone(),
            estimated_price: cmd.estimated_price,
            royalty: cmd.royalty.unwrap_or_else(RoyaltyPercent::standard),
            files: cmd.files.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_request_changes(
        &self,
        cmd: &RequestChanges,
    ) -> Result<Vec<SubmissionEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_target(cmd.product_id)?;
        evaluate(
            WorkflowAction::RequestChanges,
            &cmd.actor.capabilities,
            self.is_owner(&cmd.actor),
            self.state,
        )?;

        Ok(vec![SubmissionEvent::ChangesWereRequested(
            ChangesWereRequested {
                product_id: cmd.product_id,
                actor_id: cmd.actor.id,
                actor_name: cmd.actor.name.clone(),
                notes: cmd.notes.clone(),
                occurred_at: cmd.occurred_at,
            },
        )])
    }

    fn handle_move_to_prototyping(
        &self,
        cmd: &MoveToPrototyping,
    ) -> Result<Vec<SubmissionEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_target(cmd.product_id)?;
        evaluate(
            WorkflowAction::MoveToPrototyping,
            &cmd.actor.capabilities,
            self.is_owner(&cmd.actor),
            self.state,
        )?;

        Ok(vec![SubmissionEvent::MovedIntoPrototyping(
            MovedIntoPrototyping {
                product_id: cmd.product_id,
                actor_id: cmd.actor.id,
                actor_name: cmd.actor.name.clone(),
                occurred_at: cmd.occurred_at,
            },
        )])
    }

    fn handle_approve(&self, cmd: &ApproveDesign) -> Result<Vec<SubmissionEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_target(cmd.product_id)?;
        evaluate(
            WorkflowAction::Approve,
            &cmd.actor.capabilities,
            self.is_owner(&cmd.actor),
            self.state,
        )?;

        Ok(vec![SubmissionEvent::DesignApproved(DesignApproved {
            product_id: cmd.product_id,
            actor_id: cmd.actor.id,
            actor_name: cmd.actor.name.clone(),
            sale_price: self.effective_price(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_reject(&self, cmd: &RejectDesign) -> Result<Vec<SubmissionEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_target(cmd.product_id)?;
        evaluate(
            WorkflowAction::Reject,
            &cmd.actor.capabilities,
            self.is_owner(&cmd.actor),
            self.state,
        )?;

        Ok(vec![SubmissionEvent::DesignRejected(DesignRejected {
            product_id: cmd.product_id,
            actor_id: cmd.actor.id,
            actor_name: cmd.actor.name.clone(),
            reason: cmd.reason.clone(),
            notes: cmd.notes.clone(),
            was_published: self.state == WorkflowState::Approved,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_propose_price(
        &self,
        cmd: &ProposePrice,
    ) -> Result<Vec<SubmissionEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_target(cmd.product_id)?;
        evaluate(
            WorkflowAction::ProposePrice,
            &cmd.actor.capabilities,
            self.is_owner(&cmd.actor),
            self.state,
        )?;

        Ok(vec![SubmissionEvent::PriceWasProposed(PriceWasProposed {
            product_id: cmd.product_id,
            actor_id: cmd.actor.id,
            actor_name: cmd.actor.name.clone(),
            price: cmd.price,
            royalty: cmd.royalty,
            notes: cmd.notes.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_confirm_changes(
        &self,
        cmd: &ConfirmChanges,
    ) -> Result<Vec<SubmissionEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_target(cmd.product_id)?;

        // Ownership outranks state: a non-owner is denied whatever the
        // record's current state is.
        if !self.is_owner(&cmd.actor) {
            return Err(DomainError::permission_denied(
                "only the owning designer may submit changes",
            ));
        }
        evaluate(
            WorkflowAction::SubmitChanges,
            &cmd.actor.capabilities,
            true,
            self.state,
        )?;

        // A pending admin proposal wins over the designer's input: confirming
        // commits the proposed values. Without one, the designer's own values
        // are committed.
        let (price, royalty, accepted_proposal) = match &self.pending_proposal {
            Some(proposal) => (proposal.price, proposal.royalty, true),
            None => (cmd.price, cmd.royalty, false),
        };

        Ok(vec![SubmissionEvent::ChangesSubmitted(ChangesSubmitted {
            product_id: cmd.product_id,
            actor_id: cmd.actor.id,
            actor_name: cmd.actor.name.clone(),
            price,
            royalty,
            notes: cmd.notes.clone(),
            files: cmd.files.clone(),
            accepted_proposal,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_note(&self, cmd: &AddNote) -> Result<Vec<SubmissionEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_target(cmd.product_id)?;
        if cmd.notes.trim().is_empty() {
            return Err(DomainError::validation("notes", "must not be empty"));
        }
        evaluate(
            WorkflowAction::AddNote,
            &cmd.actor.capabilities,
            self.is_owner(&cmd.actor),
            self.state,
        )?;

        Ok(vec![SubmissionEvent::InternalNoteAdded(InternalNoteAdded {
            product_id: cmd.product_id,
            actor_id: cmd.actor.id,
            actor_name: cmd.actor.name.clone(),
            notes: cmd.notes.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_archive(&self, cmd: &ArchiveDesign) -> Result<Vec<SubmissionEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_target(cmd.product_id)?;
        evaluate(
            WorkflowAction::Archive,
            &cmd.actor.capabilities,
            self.is_owner(&cmd.actor),
            self.state,
        )?;
        if self.archived {
            return Err(DomainError::invalid_transition("already archived"));
        }

        Ok(vec![SubmissionEvent::DesignArchived(DesignArchived {
            product_id: cmd.product_id,
            actor_id: cmd.actor.id,
            actor_name: cmd.actor.name.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_delete(&self, cmd: &DeleteDesign) -> Result<Vec<SubmissionEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_target(cmd.product_id)?;
        evaluate(
            WorkflowAction::Delete,
            &cmd.actor.capabilities,
            self.is_owner(&cmd.actor),
            self.state,
        )?;
        if !self.archived {
            return Err(DomainError::invalid_transition(
                "submission must be archived before deletion",
            ));
        }

        Ok(vec![SubmissionEvent::DeleteRequested(DeleteRequested {
            product_id: cmd.product_id,
            actor_id: cmd.actor.id,
            actor_name: cmd.actor.name.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use makerstore_auth::Capabilities;
    use rust_decimal::Decimal;

    fn price(s: &str) -> Price {
        Price::new(s.parse().unwrap()).unwrap()
    }

    fn royalty(s: &str) -> RoyaltyPercent {
        RoyaltyPercent::new(s.parse().unwrap()).unwrap()
    }

    fn admin() -> Actor {
        Actor::new(UserId::new(), "admin", Capabilities::admin())
    }

    fn moderator() -> Actor {
        Actor::new(UserId::new(), "moderator", Capabilities::moderator())
    }

    fn designer() -> Actor {
        Actor::new(UserId::new(), "designer", Capabilities::designer())
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    /// Create a record via the normal submission flow.
    fn submitted(designer: &Actor) -> Submission {
        let id = ProductId::new();
        let mut submission = Submission::empty(id);
        let events = submission
            .handle(&SubmissionCommand::SubmitDesign(SubmitDesign {
                product_id: id,
                actor: designer.clone(),
                title: "Lamp shade".to_string(),
                estimated_price: price("100.000"),
                royalty: Some(royalty("10")),
                files: vec![FileRef::new()],
                occurred_at: test_time(),
            }))
            .unwrap();
        submission.apply(&events[0]);
        submission
    }

    fn run(submission: &mut Submission, cmd: SubmissionCommand) -> Vec<SubmissionEvent> {
        let events = submission.handle(&cmd).unwrap();
        for event in &events {
            submission.apply(event);
        }
        events
    }

    #[test]
    fn submit_design_creates_submitted_record() {
        let designer = designer();
        let submission = submitted(&designer);

        assert_eq!(submission.state(), WorkflowState::Submitted);
        assert_eq!(submission.designer_id(), Some(designer.id));
        assert_eq!(submission.proposed_price(), Some(price("100.000")));
        assert_eq!(submission.final_price(), None);
        assert_eq!(submission.royalty_percent(), Some(royalty("10")));
        assert_eq!(submission.version(), 1);
        assert_eq!(submission.audit_log().len(), 1);
        assert_eq!(
            submission.audit_log().entries()[0].action,
            AuditAction::DesignSubmitted
        );
    }

    #[test]
    fn submit_design_defaults_to_standard_royalty() {
        let id = ProductId::new();
        let mut submission = Submission::empty(id);
        let events = submission
            .handle(&SubmissionCommand::SubmitDesign(SubmitDesign {
                product_id: id,
                actor: designer(),
                title: "Vase".to_string(),
                estimated_price: price("10.000"),
                royalty: None,
                files: vec![],
                occurred_at: test_time(),
            }))
            .unwrap();
        submission.apply(&events[0]);

        assert_eq!(
            submission.royalty_percent().unwrap().percent(),
            Decimal::from(10u32)
        );
    }

    #[test]
    fn submit_design_requires_designer_capability() {
        let id = ProductId::new();
        let submission = Submission::empty(id);
        let nobody = Actor::new(UserId::new(), "visitor", Capabilities::none());

        let err = submission
            .handle(&SubmissionCommand::SubmitDesign(SubmitDesign {
                product_id: id,
                actor: nobody,
                title: "Vase".to_string(),
                estimated_price: price("10.000"),
                royalty: None,
                files: vec![],
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::PermissionDenied(_)));
    }

    #[test]
    fn content_change_request_keeps_price_and_proposal_absent() {
        let designer = designer();
        let mut submission = submitted(&designer);

        let pid = submission.id_typed();
        run(
            &mut submission,
            SubmissionCommand::RequestChanges(RequestChanges {
                product_id: pid,
                actor: moderator(),
                notes: Some("resin thickness insufficient".to_string()),
                occurred_at: test_time(),
            }),
        );
        assert_eq!(submission.state(), WorkflowState::ChangesRequested);
        assert!(!submission.has_pending_proposal());
        assert_eq!(submission.proposed_price(), Some(price("100.000")));

        // Designer resubmits with new files; price unchanged because they
        // sent the same values back.
        let pid = submission.id_typed();
        run(
            &mut submission,
            SubmissionCommand::ConfirmChanges(ConfirmChanges {
                product_id: pid,
                actor: designer.clone(),
                price: price("100.000"),
                royalty: royalty("10"),
                notes: Some("thickened the walls".to_string()),
                files: vec![FileRef::new()],
                occurred_at: test_time(),
            }),
        );
        assert_eq!(submission.state(), WorkflowState::Submitted);
        assert_eq!(submission.proposed_price(), Some(price("100.000")));
        assert_eq!(
            submission.audit_log().iter_latest_first().next().unwrap().action,
            AuditAction::ChangesSubmitted
        );
    }

    #[test]
    fn price_proposal_roundtrip_commits_proposed_values() {
        let designer = designer();
        let mut submission = submitted(&designer);

        let pid = submission.id_typed();
        run(
            &mut submission,
            SubmissionCommand::ProposePrice(ProposePrice {
                product_id: pid,
                actor: admin(),
                price: price("120.000"),
                royalty: royalty("15"),
                notes: Some("market rate".to_string()),
                occurred_at: test_time(),
            }),
        );
        assert_eq!(submission.state(), WorkflowState::ChangesRequested);
        let proposal = submission.pending_proposal().unwrap();
        assert_eq!(proposal.price, price("120.000"));
        assert_eq!(proposal.royalty, royalty("15"));

        // Designer confirms; the proposal values win over whatever the
        // designer typed.
        let pid = submission.id_typed();
        run(
            &mut submission,
            SubmissionCommand::ConfirmChanges(ConfirmChanges {
                product_id: pid,
                actor: designer.clone(),
                price: price("999.000"),
                royalty: royalty("50"),
                notes: None,
                files: vec![],
                occurred_at: test_time(),
            }),
        );
        assert_eq!(submission.state(), WorkflowState::Submitted);
        assert_eq!(submission.proposed_price(), Some(price("120.000")));
        assert_eq!(submission.royalty_percent(), Some(royalty("15")));
        assert!(!submission.has_pending_proposal());
        assert_eq!(
            submission.audit_log().iter_latest_first().next().unwrap().action,
            AuditAction::ProposalAccepted
        );
    }

    #[test]
    fn propose_price_is_rejected_once_state_moved_on() {
        let designer = designer();
        let mut submission = submitted(&designer);
        let cmd = ProposePrice {
            product_id: submission.id_typed(),
            actor: admin(),
            price: price("45.500"),
            royalty: royalty("12"),
            notes: None,
            occurred_at: test_time(),
        };

        run(&mut submission, SubmissionCommand::ProposePrice(cmd.clone()));
        assert_eq!(submission.state(), WorkflowState::ChangesRequested);

        let err = submission
            .handle(&SubmissionCommand::ProposePrice(cmd))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
    }

    #[test]
    fn confirm_changes_by_non_owner_is_denied_regardless_of_state() {
        let designer = designer();
        let other = designer_with_name("other designer");
        let mut submission = submitted(&designer);

        // Wrong owner while Submitted (not even the right state).
        let err = submission
            .handle(&SubmissionCommand::ConfirmChanges(confirm_cmd(
                &submission,
                &other,
            )))
            .unwrap_err();
        assert!(matches!(err, DomainError::PermissionDenied(_)));

        // Wrong owner in the right state.
        let pid = submission.id_typed();
        run(
            &mut submission,
            SubmissionCommand::RequestChanges(RequestChanges {
                product_id: pid,
                actor: moderator(),
                notes: None,
                occurred_at: test_time(),
            }),
        );
        let err = submission
            .handle(&SubmissionCommand::ConfirmChanges(confirm_cmd(
                &submission,
                &other,
            )))
            .unwrap_err();
        assert!(matches!(err, DomainError::PermissionDenied(_)));
    }

    fn designer_with_name(name: &str) -> Actor {
        Actor::new(UserId::new(), name, Capabilities::designer())
    }

    fn confirm_cmd(submission: &Submission, actor: &Actor) -> ConfirmChanges {
        ConfirmChanges {
            product_id: submission.id_typed(),
            actor: actor.clone(),
            price: price("50.000"),
            royalty: royalty("10"),
            notes: None,
            files: vec![],
            occurred_at: test_time(),
        }
    }

    #[test]
    fn approval_publishes_effective_price_and_freezes_it_as_final() {
        let designer = designer();
        let mut submission = submitted(&designer);

        let pid = submission.id_typed();
        run(
            &mut submission,
            SubmissionCommand::MoveToPrototyping(MoveToPrototyping {
                product_id: pid,
                actor: moderator(),
                occurred_at: test_time(),
            }),
        );
        assert!(submission.final_price().is_none());

        let pid = submission.id_typed();
        let events = run(
            &mut submission,
            SubmissionCommand::Approve(ApproveDesign {
                product_id: pid,
                actor: admin(),
                occurred_at: test_time(),
            }),
        );
        match &events[0] {
            SubmissionEvent::DesignApproved(e) => {
                assert_eq!(e.sale_price, Some(price("100.000")));
            }
            other => panic!("expected DesignApproved, got {other:?}"),
        }
        assert_eq!(submission.state(), WorkflowState::Approved);
        assert_eq!(submission.final_price(), Some(price("100.000")));
        assert_eq!(submission.effective_price(), Some(price("100.000")));
        assert!(submission.price_is_final());
    }

    #[test]
    fn rejecting_a_published_design_flags_unpublish() {
        let designer = designer();
        let mut submission = submitted(&designer);
        let pid = submission.id_typed();
        run(
            &mut submission,
            SubmissionCommand::MoveToPrototyping(MoveToPrototyping {
                product_id: pid,
                actor: admin(),
                occurred_at: test_time(),
            }),
        );
        let pid = submission.id_typed();
        run(
            &mut submission,
            SubmissionCommand::Approve(ApproveDesign {
                product_id: pid,
                actor: admin(),
                occurred_at: test_time(),
            }),
        );

        let pid = submission.id_typed();
        let events = run(
            &mut submission,
            SubmissionCommand::Reject(RejectDesign {
                product_id: pid,
                actor: admin(),
                reason: RejectionReason::PoorQuality,
                notes: None,
                occurred_at: test_time(),
            }),
        );
        match &events[0] {
            SubmissionEvent::DesignRejected(e) => assert!(e.was_published),
            other => panic!("expected DesignRejected, got {other:?}"),
        }
        assert_eq!(submission.state(), WorkflowState::Rejected);
    }

    #[test]
    fn moderator_may_reject_submitted_but_not_prototyping() {
        let designer = designer();
        let mut submission = submitted(&designer);

        let pid = submission.id_typed();
        run(
            &mut submission,
            SubmissionCommand::MoveToPrototyping(MoveToPrototyping {
                product_id: pid,
                actor: moderator(),
                occurred_at: test_time(),
            }),
        );

        let err = submission
            .handle(&SubmissionCommand::Reject(RejectDesign {
                product_id: submission.id_typed(),
                actor: moderator(),
                reason: RejectionReason::Other("out of scope".to_string()),
                notes: None,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::PermissionDenied(_)));
    }

    #[test]
    fn archive_then_delete_ordering_is_enforced() {
        let designer = designer();
        let mut submission = submitted(&designer);
        let admin = admin();
        let pid = submission.id_typed();
        run(
            &mut submission,
            SubmissionCommand::Reject(RejectDesign {
                product_id: pid,
                actor: admin.clone(),
                reason: RejectionReason::NotManufacturable,
                notes: None,
                occurred_at: test_time(),
            }),
        );

        // Delete before archive is refused.
        let err = submission
            .handle(&SubmissionCommand::Delete(DeleteDesign {
                product_id: submission.id_typed(),
                actor: admin.clone(),
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));

        let pid = submission.id_typed();
        run(
            &mut submission,
            SubmissionCommand::Archive(ArchiveDesign {
                product_id: pid,
                actor: admin.clone(),
                occurred_at: test_time(),
            }),
        );
        assert!(submission.archived());
        assert_eq!(submission.archived_by(), Some(admin.id));
        assert!(submission.archived_at().is_some());
        // Still Rejected: archival is a flag, not a state.
        assert_eq!(submission.state(), WorkflowState::Rejected);

        let pid = submission.id_typed();
        let events = run(
            &mut submission,
            SubmissionCommand::Delete(DeleteDesign {
                product_id: pid,
                actor: admin,
                occurred_at: test_time(),
            }),
        );
        assert!(matches!(events[0], SubmissionEvent::DeleteRequested(_)));
    }

    #[test]
    fn internal_notes_are_prototyping_only_and_staff_only() {
        let designer = designer();
        let mut submission = submitted(&designer);

        let err = submission
            .handle(&SubmissionCommand::AddNote(AddNote {
                product_id: submission.id_typed(),
                actor: moderator(),
                notes: "premature".to_string(),
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));

        let pid = submission.id_typed();
        run(
            &mut submission,
            SubmissionCommand::MoveToPrototyping(MoveToPrototyping {
                product_id: pid,
                actor: moderator(),
                occurred_at: test_time(),
            }),
        );
        let state_before = submission.state();
        let pid = submission.id_typed();
        run(
            &mut submission,
            SubmissionCommand::AddNote(AddNote {
                product_id: pid,
                actor: moderator(),
                notes: "mold A looks usable".to_string(),
                occurred_at: test_time(),
            }),
        );
        assert_eq!(submission.state(), state_before);

        let latest = submission.audit_log().iter_latest_first().next().unwrap();
        assert_eq!(latest.action, AuditAction::InternalNoteAdded);
        assert!(latest.internal);
        assert!(submission
            .audit_log()
            .visible()
            .all(|e| e.action != AuditAction::InternalNoteAdded));

        // The designer cannot add staff notes.
        let err = submission
            .handle(&SubmissionCommand::AddNote(AddNote {
                product_id: submission.id_typed(),
                actor: designer.clone(),
                notes: "can I help?".to_string(),
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::PermissionDenied(_)));
    }

    #[test]
    fn rejecting_a_pending_proposal_clears_it() {
        let designer = designer();
        let mut submission = submitted(&designer);
        let pid = submission.id_typed();
        run(
            &mut submission,
            SubmissionCommand::ProposePrice(ProposePrice {
                product_id: pid,
                actor: admin(),
                price: price("60.000"),
                royalty: royalty("20"),
                notes: None,
                occurred_at: test_time(),
            }),
        );
        assert!(submission.has_pending_proposal());

        let pid = submission.id_typed();
        run(
            &mut submission,
            SubmissionCommand::Reject(RejectDesign {
                product_id: pid,
                actor: admin(),
                reason: RejectionReason::Other("designer unresponsive".to_string()),
                notes: None,
                occurred_at: test_time(),
            }),
        );
        assert_eq!(submission.state(), WorkflowState::Rejected);
        assert!(!submission.has_pending_proposal());
        // The proposal entry survives in the audit log.
        assert!(submission
            .audit_log()
            .latest_matching(AuditAction::PriceProposed)
            .is_some());
    }

    #[test]
    fn admin_may_republish_a_rejected_design() {
        let designer = designer();
        let mut submission = submitted(&designer);
        let pid = submission.id_typed();
        run(
            &mut submission,
            SubmissionCommand::Reject(RejectDesign {
                product_id: pid,
                actor: admin(),
                reason: RejectionReason::PoorQuality,
                notes: None,
                occurred_at: test_time(),
            }),
        );

        let pid = submission.id_typed();
        run(
            &mut submission,
            SubmissionCommand::Approve(ApproveDesign {
                product_id: pid,
                actor: admin(),
                occurred_at: test_time(),
            }),
        );
        assert_eq!(submission.state(), WorkflowState::Approved);
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let designer = designer();
        let submission = submitted(&designer);
        let before = submission.clone();

        let cmd = SubmissionCommand::ProposePrice(ProposePrice {
            product_id: submission.id_typed(),
            actor: admin(),
            price: price("45.500"),
            royalty: royalty("12"),
            notes: None,
            occurred_at: test_time(),
        });
        let events1 = submission.handle(&cmd).unwrap();
        let events2 = submission.handle(&cmd).unwrap();

        assert_eq!(submission, before);
        assert_eq!(events1, events2);
    }

    #[test]
    fn version_increments_once_per_applied_event() {
        let designer = designer();
        let mut submission = submitted(&designer);
        assert_eq!(submission.version(), 1);

        let pid = submission.id_typed();
        run(
            &mut submission,
            SubmissionCommand::MoveToPrototyping(MoveToPrototyping {
                product_id: pid,
                actor: admin(),
                occurred_at: test_time(),
            }),
        );
        assert_eq!(submission.version(), 2);
    }

    /// Every (state, role, action) combination outside the transition table
    /// fails with PermissionDenied or InvalidTransition and leaves the
    /// record untouched.
    #[test]
    fn off_table_combinations_never_mutate() {
        let designer = designer();
        let roles: [(&str, Actor); 4] = [
            ("admin", admin()),
            ("moderator", moderator()),
            ("owner", designer.clone()),
            ("stranger", designer_with_name("stranger")),
        ];

        for state in WorkflowState::ALL {
            for (role_name, actor) in &roles {
                for action in WorkflowAction::ALL {
                    let mut submission = submitted(&designer);
                    force_state(&mut submission, state);
                    let before = submission.clone();

                    let cmd = command_for(action, &submission, actor);
                    match submission.handle(&cmd) {
                        Ok(events) => {
                            // Allowed by the table; sanity-check by replaying
                            // the rule evaluation.
                            let is_owner = submission.designer_id() == Some(actor.id);
                            assert!(
                                evaluate(action, &actor.capabilities, is_owner, state).is_ok(),
                                "{role_name} unexpectedly allowed {action} from {state}"
                            );
                            assert!(!events.is_empty());
                        }
                        Err(err) => {
                            assert!(
                                matches!(
                                    err,
                                    DomainError::PermissionDenied(_)
                                        | DomainError::InvalidTransition(_)
                                ),
                                "{role_name}/{action}/{state} failed with unexpected error {err:?}"
                            );
                            assert_eq!(
                                submission, before,
                                "record mutated on failed {action} from {state}"
                            );
                        }
                    }
                }
            }
        }
    }

    fn force_state(submission: &mut Submission, state: WorkflowState) {
        submission.state = state;
        if state == WorkflowState::Rejected {
            // Let the delete row exercise the happy path too.
            submission.archived = true;
        }
    }

    fn command_for(
        action: WorkflowAction,
        submission: &Submission,
        actor: &Actor,
    ) -> SubmissionCommand {
        let product_id = submission.id_typed();
        let actor = actor.clone();
        let occurred_at = test_time();
        match action {
            WorkflowAction::RequestChanges => SubmissionCommand::RequestChanges(RequestChanges {
                product_id,
                actor,
                notes: Some("check tolerances".to_string()),
                occurred_at,
            }),
            WorkflowAction::MoveToPrototyping => {
                SubmissionCommand::MoveToPrototyping(MoveToPrototyping {
                    product_id,
                    actor,
                    occurred_at,
                })
            }
            WorkflowAction::Approve => SubmissionCommand::Approve(ApproveDesign {
                product_id,
                actor,
                occurred_at,
            }),
            WorkflowAction::Reject => SubmissionCommand::Reject(RejectDesign {
                product_id,
                actor,
                reason: RejectionReason::PoorQuality,
                notes: None,
                occurred_at,
            }),
            WorkflowAction::SubmitChanges => SubmissionCommand::ConfirmChanges(ConfirmChanges {
                product_id,
                actor,
                price: price("10.000"),
                royalty: royalty("10"),
                notes: None,
                files: vec![],
                occurred_at,
            }),
            WorkflowAction::ProposePrice => SubmissionCommand::ProposePrice(ProposePrice {
                product_id,
                actor,
                price: price("10.000"),
                royalty: royalty("10"),
                notes: None,
                occurred_at,
            }),
            WorkflowAction::Archive => SubmissionCommand::Archive(ArchiveDesign {
                product_id,
                actor,
                occurred_at,
            }),
            WorkflowAction::Delete => SubmissionCommand::Delete(DeleteDesign {
                product_id,
                actor,
                occurred_at,
            }),
            WorkflowAction::AddNote => SubmissionCommand::AddNote(AddNote {
                product_id,
                actor,
                notes: "looks fine".to_string(),
                occurred_at,
            }),
        }
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: any valid admin proposal round-trips exactly through
            /// designer confirmation.
            #[test]
            fn proposal_roundtrip_commits_exact_values(
                millimes in 1u64..10_000_000,
                royalty_tenths in 10u32..=500,
            ) {
                let proposed = Price::new(Decimal::new(millimes as i64, 3)).unwrap();
                let proposed_royalty =
                    RoyaltyPercent::new(Decimal::new(royalty_tenths as i64, 1)).unwrap();

                let designer = designer();
                let mut submission = submitted(&designer);

                let pid = submission.id_typed();
                run(&mut submission, SubmissionCommand::ProposePrice(ProposePrice {
                    product_id: pid,
                    actor: admin(),
                    price: proposed,
                    royalty: proposed_royalty,
                    notes: None,
                    occurred_at: test_time(),
                }));
                let pid = submission.id_typed();
                run(&mut submission, SubmissionCommand::ConfirmChanges(ConfirmChanges {
                    product_id: pid,
                    actor: designer.clone(),
                    price: price("1.000"),
                    royalty: royalty("1"),
                    notes: None,
                    files: vec![],
                    occurred_at: test_time(),
                }));

                prop_assert_eq!(submission.proposed_price(), Some(proposed));
                prop_assert_eq!(submission.royalty_percent(), Some(proposed_royalty));
                prop_assert!(!submission.has_pending_proposal());
                prop_assert_eq!(submission.state(), WorkflowState::Submitted);
            }

            /// Property: handle is deterministic and never mutates state.
            #[test]
            fn handle_is_deterministic(
                title in "[A-Za-z][A-Za-z0-9 ]{0,40}",
                millimes in 1u64..10_000_000,
            ) {
                let id = ProductId::new();
                let submission = Submission::empty(id);
                let cmd = SubmissionCommand::SubmitDesign(SubmitDesign {
                    product_id: id,
                    actor: designer(),
                    title,
                    estimated_price: Price::new(Decimal::new(millimes as i64, 3)).unwrap(),
                    royalty: None,
                    files: vec![],
                    occurred_at: test_time(),
                });

                let before = submission.clone();
                let events1 = submission.handle(&cmd).unwrap();
                let events2 = submission.handle(&cmd).unwrap();

                prop_assert_eq!(&submission, &before);
                prop_assert_eq!(events1, events2);
            }
        }
    }
}
