//! Request-scoped workflow execution pipeline.
//!
//! One request = one record = one atomic check-then-apply:
//!
//! ```text
//! Request (actor, action, product_id, payload)
//!   ↓
//! 1. Resolve capabilities (role directory)
//!   ↓
//! 2. Load the record from the store (version = concurrency token)
//!   ↓
//! 3. Handle the command (pure decision logic, produces events)
//!   ↓
//! 4. Apply events and save with compare-and-swap; on conflict, re-read
//!    and re-validate, a bounded number of times
//!   ↓
//! 5. Catalog side effects (publish / unpublish / soft delete)
//!   ↓
//! 6. Fire-and-forget notifications (failures logged, never rolled back)
//! ```
//!
//! Nothing is written until validation passes; a failed validation leaves
//! the record and its audit log untouched.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use makerstore_auth::{Actor, RoleDirectory};
use makerstore_core::{
    Aggregate, AggregateRoot, DomainError, ExpectedVersion, FileRef, Price, ProductId,
    RoyaltyPercent, UserId,
};
use makerstore_workflow::{
    AddNote, ApproveDesign, ArchiveDesign, ConfirmChanges, DeleteDesign, MoveToPrototyping,
    ProposePrice, RejectDesign, RejectionReason, RequestChanges, SubmitDesign, Submission,
    SubmissionCommand, SubmissionEvent, WorkflowState,
};

use crate::notify::{Notification, NotificationDispatcher};
use crate::store::{ProductRecordStore, StoreError};

/// Bounded CAS retries before a conflict surfaces to the caller.
const DEFAULT_SAVE_RETRIES: u32 = 3;

/// Engine-level error: domain failures plus store backend failures.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("store failure: {0}")]
    Store(StoreError),
}

fn map_store_err(err: StoreError) -> EngineError {
    match err {
        StoreError::NotFound => EngineError::Domain(DomainError::NotFound),
        StoreError::Conflict(msg) => EngineError::Domain(DomainError::Conflict(msg)),
        StoreError::AlreadyExists => {
            EngineError::Domain(DomainError::conflict("submission already exists"))
        }
        other => EngineError::Store(other),
    }
}

/// Caller-supplied actor identity; capabilities are resolved by the engine,
/// never taken from the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorRef {
    pub id: UserId,
    pub name: String,
}

impl ActorRef {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// External request payload. Money fields arrive as raw decimals and are
/// validated here, before anything is loaded or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowRequest {
    SubmitDesign {
        product_id: ProductId,
        title: String,
        estimated_price: Decimal,
        /// `None` applies the standard marketplace royalty.
        royalty: Option<Decimal>,
        files: Vec<FileRef>,
    },
    RequestChanges {
        product_id: ProductId,
        notes: Option<String>,
    },
    MoveToPrototyping {
        product_id: ProductId,
    },
    Approve {
        product_id: ProductId,
    },
    Reject {
        product_id: ProductId,
        reason: RejectionReason,
        notes: Option<String>,
    },
    ProposePrice {
        product_id: ProductId,
        price: Decimal,
        royalty: Decimal,
        notes: Option<String>,
    },
    ConfirmChanges {
        product_id: ProductId,
        price: Decimal,
        royalty: Decimal,
        notes: Option<String>,
        files: Vec<FileRef>,
    },
    AddNote {
        product_id: ProductId,
        notes: String,
    },
    Archive {
        product_id: ProductId,
    },
    Delete {
        product_id: ProductId,
    },
}

impl WorkflowRequest {
    pub fn product_id(&self) -> ProductId {
        match self {
            WorkflowRequest::SubmitDesign { product_id, .. }
            | WorkflowRequest::RequestChanges { product_id, .. }
            | WorkflowRequest::MoveToPrototyping { product_id }
            | WorkflowRequest::Approve { product_id }
            | WorkflowRequest::Reject { product_id, .. }
            | WorkflowRequest::ProposePrice { product_id, .. }
            | WorkflowRequest::ConfirmChanges { product_id, .. }
            | WorkflowRequest::AddNote { product_id, .. }
            | WorkflowRequest::Archive { product_id }
            | WorkflowRequest::Delete { product_id } => *product_id,
        }
    }
}

/// Reusable request execution engine.
///
/// Generic over the store, the role directory and the notifier so tests can
/// run entirely in memory and production can plug in real backends.
pub struct WorkflowEngine<S, R, N> {
    store: S,
    directory: R,
    notifier: N,
    max_save_retries: u32,
}

impl<S, R, N> WorkflowEngine<S, R, N>
where
    S: ProductRecordStore,
    R: RoleDirectory,
    N: NotificationDispatcher,
{
    pub fn new(store: S, directory: R, notifier: N) -> Self {
        Self {
            store,
            directory,
            notifier,
            max_save_retries: DEFAULT_SAVE_RETRIES,
        }
    }

    pub fn with_save_retries(mut self, retries: u32) -> Self {
        self.max_save_retries = retries;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Execute one workflow request and return the committed record.
    ///
    /// `occurred_at` is the business time stamped on events and audit
    /// entries; callers pass `Utc::now()` outside of tests.
    pub fn execute(
        &self,
        actor: &ActorRef,
        request: WorkflowRequest,
        occurred_at: DateTime<Utc>,
    ) -> Result<Submission, EngineError> {
        let capabilities = self.directory.roles_of(actor.id);
        let actor = Actor::new(actor.id, actor.name.clone(), capabilities);
        let command = build_command(&actor, &request, occurred_at)?;

        if let SubmissionCommand::SubmitDesign(_) = &command {
            return self.create(&actor, &command, request.product_id());
        }

        let product_id = request.product_id();
        let mut attempts = 0u32;
        loop {
            let record = self.store.get(product_id).map_err(map_store_err)?;
            let expected = ExpectedVersion::Exact(record.version());
            let events = record.handle(&command).map_err(EngineError::Domain)?;

            let mut updated = record;
            for event in &events {
                updated.apply(event);
            }

            match self.store.save(updated.clone(), expected) {
                Ok(()) => {
                    for event in &events {
                        tracing::debug!(
                            event = event.event_type(),
                            at = %event.occurred_at(),
                            "event committed"
                        );
                    }
                    self.apply_catalog_side_effects(product_id, &events)?;
                    self.dispatch_notifications(&actor, product_id, &events);
                    tracing::info!(
                        product_id = %product_id,
                        actor_id = %actor.id,
                        state = %updated.state(),
                        "workflow request applied"
                    );
                    return Ok(updated);
                }
                Err(StoreError::Conflict(msg)) => {
                    attempts += 1;
                    if attempts > self.max_save_retries {
                        // Surfaced to the caller as a transition failure:
                        // the state they validated against is gone.
                        return Err(EngineError::Domain(DomainError::invalid_transition(
                            format!("concurrent modification: {msg}"),
                        )));
                    }
                    tracing::debug!(
                        product_id = %product_id,
                        attempt = attempts,
                        "save conflict, re-reading record"
                    );
                }
                Err(other) => return Err(map_store_err(other)),
            }
        }
    }

    fn create(
        &self,
        actor: &Actor,
        command: &SubmissionCommand,
        product_id: ProductId,
    ) -> Result<Submission, EngineError> {
        let record = Submission::empty(product_id);
        let events = record.handle(command).map_err(EngineError::Domain)?;

        let mut created = record;
        for event in &events {
            created.apply(event);
        }
        self.store.insert(created.clone()).map_err(map_store_err)?;
        tracing::info!(
            product_id = %product_id,
            designer_id = %actor.id,
            "design submitted"
        );
        Ok(created)
    }

    fn apply_catalog_side_effects(
        &self,
        product_id: ProductId,
        events: &[SubmissionEvent],
    ) -> Result<(), EngineError> {
        for event in events {
            let result = match event {
                SubmissionEvent::DesignApproved(e) => self.store.publish(product_id, e.sale_price),
                SubmissionEvent::DesignRejected(e) if e.was_published => {
                    self.store.unpublish(product_id)
                }
                SubmissionEvent::DeleteRequested(_) => self.store.soft_delete(product_id),
                _ => Ok(()),
            };
            if let Err(err) = result {
                tracing::error!(product_id = %product_id, error = %err, "catalog side effect failed");
                return Err(map_store_err(err));
            }
        }
        Ok(())
    }

    fn dispatch_notifications(
        &self,
        actor: &Actor,
        product_id: ProductId,
        events: &[SubmissionEvent],
    ) {
        for event in events {
            let notification = match event {
                SubmissionEvent::ChangesWereRequested(_) => Some(Notification::StateChange {
                    product_id,
                    actor_id: actor.id,
                    new_state: WorkflowState::ChangesRequested,
                }),
                SubmissionEvent::MovedIntoPrototyping(_) => Some(Notification::StateChange {
                    product_id,
                    actor_id: actor.id,
                    new_state: WorkflowState::Prototyping,
                }),
                SubmissionEvent::DesignApproved(_) => Some(Notification::StateChange {
                    product_id,
                    actor_id: actor.id,
                    new_state: WorkflowState::Approved,
                }),
                SubmissionEvent::DesignRejected(_) => Some(Notification::StateChange {
                    product_id,
                    actor_id: actor.id,
                    new_state: WorkflowState::Rejected,
                }),
                SubmissionEvent::ChangesSubmitted(_) => Some(Notification::StateChange {
                    product_id,
                    actor_id: actor.id,
                    new_state: WorkflowState::Submitted,
                }),
                SubmissionEvent::PriceWasProposed(e) => Some(Notification::PriceProposal {
                    product_id,
                    actor_id: actor.id,
                    price: e.price,
                    royalty: e.royalty,
                }),
                _ => None,
            };

            if let Some(notification) = notification {
                if let Err(err) = self.notifier.dispatch(notification) {
                    // Best-effort: the transition is already committed.
                    tracing::warn!(
                        product_id = %product_id,
                        error = %err,
                        "notification dispatch failed"
                    );
                }
            }
        }
    }
}

fn build_command(
    actor: &Actor,
    request: &WorkflowRequest,
    occurred_at: DateTime<Utc>,
) -> Result<SubmissionCommand, DomainError> {
    let actor = actor.clone();
    let command = match request {
        WorkflowRequest::SubmitDesign {
            product_id,
            title,
            estimated_price,
            royalty,
            files,
        } => SubmissionCommand::SubmitDesign(SubmitDesign {
            product_id: *product_id,
            actor,
            title: title.clone(),
            estimated_price: Price::new(*estimated_price)?,
            royalty: royalty.map(RoyaltyPercent::new).transpose()?,
            files: files.clone(),
            occurred_at,
        }),
        WorkflowRequest::RequestChanges { product_id, notes } => {
            SubmissionCommand::RequestChanges(RequestChanges {
                product_id: *product_id,
                actor,
                notes: notes.clone(),
                occurred_at,
            })
        }
        WorkflowRequest::MoveToPrototyping { product_id } => {
            SubmissionCommand::MoveToPrototyping(MoveToPrototyping {
                product_id: *product_id,
                actor,
                occurred_at,
            })
        }
        WorkflowRequest::Approve { product_id } => SubmissionCommand::Approve(ApproveDesign {
            product_id: *product_id,
            actor,
            occurred_at,
        }),
        WorkflowRequest::Reject {
            product_id,
            reason,
            notes,
        } => SubmissionCommand::Reject(RejectDesign {
            product_id: *product_id,
            actor,
            reason: reason.clone(),
            notes: notes.clone(),
            occurred_at,
        }),
        WorkflowRequest::ProposePrice {
            product_id,
            price,
            royalty,
            notes,
        } => SubmissionCommand::ProposePrice(ProposePrice {
            product_id: *product_id,
            actor,
            price: Price::new(*price)?,
            royalty: RoyaltyPercent::new(*royalty)?,
            notes: notes.clone(),
            occurred_at,
        }),
        WorkflowRequest::ConfirmChanges {
            product_id,
            price,
            royalty,
            notes,
            files,
        } => SubmissionCommand::ConfirmChanges(ConfirmChanges {
            product_id: *product_id,
            actor,
            price: Price::new(*price)?,
            royalty: RoyaltyPercent::new(*royalty)?,
            notes: notes.clone(),
            files: files.clone(),
            occurred_at,
        }),
        WorkflowRequest::AddNote { product_id, notes } => SubmissionCommand::AddNote(AddNote {
            product_id: *product_id,
            actor,
            notes: notes.clone(),
            occurred_at,
        }),
        WorkflowRequest::Archive { product_id } => SubmissionCommand::Archive(ArchiveDesign {
            product_id: *product_id,
            actor,
            occurred_at,
        }),
        WorkflowRequest::Delete { product_id } => SubmissionCommand::Delete(DeleteDesign {
            product_id: *product_id,
            actor,
            occurred_at,
        }),
    };
    Ok(command)
}
