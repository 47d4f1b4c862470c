//! Fire-and-forget notification dispatch.
//!
//! The engine emits one event per committed state change or price proposal;
//! delivery (email, alerting) is the external dispatcher's problem. Failures
//! are logged and never roll back the committed transition (at-most-once,
//! best-effort).

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use makerstore_core::{Price, ProductId, RoyaltyPercent, UserId};
use makerstore_workflow::WorkflowState;

/// Out-of-band event handed to the external dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    StateChange {
        product_id: ProductId,
        actor_id: UserId,
        new_state: WorkflowState,
    },
    PriceProposal {
        product_id: ProductId,
        actor_id: UserId,
        price: Price,
        royalty: RoyaltyPercent,
    },
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification dispatch failed: {0}")]
    Dispatch(String),
}

/// Contract for the external notification dispatcher.
pub trait NotificationDispatcher: Send + Sync {
    fn dispatch(&self, notification: Notification) -> Result<(), NotifyError>;
}

impl<N> NotificationDispatcher for std::sync::Arc<N>
where
    N: NotificationDispatcher + ?Sized,
{
    fn dispatch(&self, notification: Notification) -> Result<(), NotifyError> {
        (**self).dispatch(notification)
    }
}

/// Buffering dispatcher for tests/dev.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl NotificationDispatcher for RecordingDispatcher {
    fn dispatch(&self, notification: Notification) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .map_err(|_| NotifyError::Dispatch("lock poisoned".to_string()))?
            .push(notification);
        Ok(())
    }
}
