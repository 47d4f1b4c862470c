use serde::{Deserialize, Serialize};

use makerstore_core::UserId;

use crate::capabilities::Capabilities;

/// A fully resolved actor for workflow decisions.
///
/// Every mutating operation receives one of these explicitly; the domain
/// never reaches into ambient "current user" state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    /// Display name recorded in audit entries.
    pub name: String,
    pub capabilities: Capabilities,
}

impl Actor {
    pub fn new(id: UserId, name: impl Into<String>, capabilities: Capabilities) -> Self {
        Self {
            id,
            name: name.into(),
            capabilities,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.capabilities.is_admin()
    }

    pub fn is_moderator(&self) -> bool {
        self.capabilities.is_moderator()
    }

    pub fn is_designer(&self) -> bool {
        self.capabilities.is_designer()
    }
}
