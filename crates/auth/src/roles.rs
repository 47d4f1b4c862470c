use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role label assigned to a principal by the external user directory.
///
/// Roles are intentionally opaque strings at this layer; mapping labels to
/// workflow capabilities is done by [`crate::resolve_capabilities`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
