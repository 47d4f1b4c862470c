use std::collections::HashMap;

use makerstore_core::UserId;

use crate::capabilities::{resolve_capabilities, Capabilities};
use crate::roles::Role;

/// Contract for the external user/role directory.
///
/// Implementations look up the roles granted to a principal and return the
/// resolved capability set. Unknown principals resolve to no capabilities;
/// the lookup itself has no failure mode.
pub trait RoleDirectory: Send + Sync {
    fn roles_of(&self, user_id: UserId) -> Capabilities;
}

impl<R> RoleDirectory for std::sync::Arc<R>
where
    R: RoleDirectory + ?Sized,
{
    fn roles_of(&self, user_id: UserId) -> Capabilities {
        (**self).roles_of(user_id)
    }
}

/// Fixed in-memory directory for tests/dev: role labels per user, resolved
/// through [`resolve_capabilities`] on lookup.
#[derive(Debug, Default)]
pub struct StaticRoleDirectory {
    entries: HashMap<UserId, Vec<Role>>,
}

impl StaticRoleDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(mut self, user_id: UserId, roles: impl IntoIterator<Item = Role>) -> Self {
        self.entries
            .entry(user_id)
            .or_default()
            .extend(roles);
        self
    }
}

impl RoleDirectory for StaticRoleDirectory {
    fn roles_of(&self, user_id: UserId) -> Capabilities {
        self.entries
            .get(&user_id)
            .map(|roles| resolve_capabilities(roles))
            .unwrap_or_else(Capabilities::none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_principal_has_no_capabilities() {
        let directory = StaticRoleDirectory::new();
        assert_eq!(directory.roles_of(UserId::new()), Capabilities::none());
    }

    #[test]
    fn granted_roles_resolve_on_lookup() {
        let user = UserId::new();
        let directory = StaticRoleDirectory::new().grant(user, [Role::new("moderator")]);
        assert!(directory.roles_of(user).is_moderator());
        assert!(!directory.roles_of(user).is_admin());
    }

    #[test]
    fn roles_accumulate_across_grants() {
        let user = UserId::new();
        let directory = StaticRoleDirectory::new()
            .grant(user, [Role::new("designer")])
            .grant(user, [Role::new("moderator")]);

        let caps = directory.roles_of(user);
        assert!(caps.is_moderator());
        assert!(caps.is_designer());
        assert!(!caps.is_admin());
    }
}
