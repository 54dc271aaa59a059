//! Backend trait for group/permission storage
//!
//! The role layer treats the persisted store as a black box reachable
//! through this trait: atomic create-or-get for groups, set/add/clear for
//! their permission and member sets, and permission lookup by natural key.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::error::StoreResult;
use crate::group::Group;
use crate::permission::PermissionRef;

/// Storage operations the role layer depends on.
///
/// Implementations are expected to make [`get_or_create_group`] atomic:
/// concurrent creators for the same name must observe a single group.
///
/// [`get_or_create_group`]: RoleBackend::get_or_create_group
pub trait RoleBackend {
    /// Fetch the group with this name, creating it if absent.
    fn get_or_create_group(&self, name: &str) -> StoreResult<Group>;

    /// Fetch the group with this name, if it exists.
    fn find_group(&self, name: &str) -> StoreResult<Option<Group>>;

    /// The permissions currently bound to a group.
    fn group_permissions(&self, group: &Group) -> StoreResult<BTreeSet<PermissionRef>>;

    /// Add permissions to a group, keeping existing ones.
    fn add_permissions(&self, group: &Group, perms: &[PermissionRef]) -> StoreResult<()>;

    /// Replace a group's permissions with exactly this set.
    fn set_permissions(&self, group: &Group, perms: &[PermissionRef]) -> StoreResult<()>;

    /// Remove every permission from a group.
    fn clear_permissions(&self, group: &Group) -> StoreResult<()>;

    /// Look up permissions by codename within an app.
    ///
    /// With a model, only the natural triple can match; without one, every
    /// model of the app is searched. Returns all matches so the caller can
    /// enforce uniqueness.
    fn find_permissions(
        &self,
        app_label: &str,
        codename: &str,
        model: Option<&str>,
    ) -> StoreResult<Vec<PermissionRef>>;

    /// Add users to a group's member set.
    fn add_members(&self, group: &Group, users: &[Uuid]) -> StoreResult<()>;

    /// Remove users from a group's member set.
    fn remove_members(&self, group: &Group, users: &[Uuid]) -> StoreResult<()>;

    /// Replace a group's member set with exactly these users.
    fn set_members(&self, group: &Group, users: &[Uuid]) -> StoreResult<()>;

    /// Remove every member from a group.
    fn clear_members(&self, group: &Group) -> StoreResult<()>;

    /// The users currently in a group.
    fn members(&self, group: &Group) -> StoreResult<BTreeSet<Uuid>>;

    /// Whether a user is in a group.
    fn is_member(&self, group: &Group, user: Uuid) -> StoreResult<bool> {
        Ok(self.members(group)?.contains(&user))
    }
}
