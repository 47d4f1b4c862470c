use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// Capability set resolved for a principal.
///
/// Capabilities are non-exclusive: admin implies moderator and designer for
/// permission checks, which the accessors encode so call sites never have to
/// spell the implication out.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    admin: bool,
    moderator: bool,
    designer: bool,
}

impl Capabilities {
    /// No capabilities at all (unknown principal).
    pub fn none() -> Self {
        Self::default()
    }

    pub fn admin() -> Self {
        Self {
            admin: true,
            moderator: false,
            designer: false,
        }
    }

    pub fn moderator() -> Self {
        Self {
            admin: false,
            moderator: true,
            designer: false,
        }
    }

    pub fn designer() -> Self {
        Self {
            admin: false,
            moderator: false,
            designer: true,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn is_moderator(&self) -> bool {
        self.admin || self.moderator
    }

    pub fn is_designer(&self) -> bool {
        self.admin || self.designer
    }

    /// Whether the principal may take review actions (request changes, move
    /// to prototyping, reject from review).
    pub fn can_moderate(&self) -> bool {
        self.is_moderator()
    }

    /// Whether the principal may author submissions. Moderators may submit
    /// on the platform as well, mirroring the directory's role layering.
    pub fn can_submit(&self) -> bool {
        self.admin || self.moderator || self.designer
    }
}

/// Map role labels to a capability set.
///
/// Pure function, no side effects. Unknown labels contribute nothing, so an
/// unknown principal resolves to all-false.
pub fn resolve_capabilities(roles: &[Role]) -> Capabilities {
    let mut caps = Capabilities::none();
    for role in roles {
        match role.as_str() {
            "admin" | "administrator" => caps.admin = true,
            "moderator" => caps.moderator = true,
            "designer" => caps.designer = true,
            _ => {}
        }
    }
    caps
}
