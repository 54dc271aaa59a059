//! In-memory backend implementation
//!
//! This is suitable for tests and for the CLI's file-backed store: the
//! whole backend state serializes as [`StoreState`], so a JSON snapshot can
//! be loaded, synchronized against and written back.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::RoleBackend;
use crate::error::{StoreError, StoreResult};
use crate::group::Group;
use crate::permission::PermissionRef;

/// Serializable state of one group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupState {
    /// Permissions bound to the group.
    #[serde(default)]
    pub permissions: BTreeSet<PermissionRef>,

    /// Users in the group.
    #[serde(default)]
    pub members: BTreeSet<Uuid>,
}

/// Serializable snapshot of the whole backend.
///
/// This is the CLI's `--store` file format and the fixture format for
/// tests: a permission catalog (what would be the permission table in a
/// relational store) plus the groups with their bound permissions and
/// members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreState {
    /// Every permission that exists in the store.
    #[serde(default)]
    pub permissions: Vec<PermissionRef>,

    /// Groups by name, in creation order.
    #[serde(default)]
    pub groups: IndexMap<String, GroupState>,
}

#[derive(Debug, Default)]
struct Inner {
    state: StoreState,
    handles: IndexMap<String, Group>,
}

/// In-memory [`RoleBackend`] implementation.
///
/// State lives behind a `Mutex` so the trait's `&self` operations work on
/// a shared backend; the synchronization workflow itself stays
/// single-threaded.
///
/// # Examples
///
/// ```
/// use grouprole_store::{MemoryBackend, PermissionRef, RoleBackend};
///
/// let backend = MemoryBackend::new();
/// backend.register_permission(PermissionRef::new("auth", "user", "view_user"));
///
/// let group = backend.get_or_create_group("Users").unwrap();
/// assert_eq!(backend.get_or_create_group("Users").unwrap(), group);
/// ```
#[derive(Debug, Default)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
}

impl MemoryBackend {
    /// Create an empty backend with no permissions and no groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend from a serialized snapshot.
    pub fn from_state(state: StoreState) -> Self {
        let handles = state
            .groups
            .keys()
            .map(|name| (name.clone(), Group::new(name)))
            .collect();
        Self {
            inner: Mutex::new(Inner { state, handles }),
        }
    }

    /// Snapshot the current state.
    pub fn state(&self) -> StoreState {
        self.lock().state.clone()
    }

    /// Add a permission to the catalog.
    ///
    /// Duplicate registrations are ignored.
    pub fn register_permission(&self, perm: PermissionRef) {
        let mut inner = self.lock();
        if !inner.state.permissions.contains(&perm) {
            inner.state.permissions.push(perm);
        }
    }

    /// Add several permissions to the catalog.
    pub fn register_permissions<I>(&self, perms: I)
    where
        I: IntoIterator<Item = PermissionRef>,
    {
        for perm in perms {
            self.register_permission(perm);
        }
    }

    /// Names of the groups currently in the store, in creation order.
    pub fn group_names(&self) -> Vec<String> {
        self.lock().state.groups.keys().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("store lock poisoned")
    }
}

impl Inner {
    fn group_state(&mut self, group: &Group) -> StoreResult<&mut GroupState> {
        self.state
            .groups
            .get_mut(&group.name)
            .ok_or_else(|| StoreError::GroupNotFound(group.name.clone()))
    }
}

impl RoleBackend for MemoryBackend {
    fn get_or_create_group(&self, name: &str) -> StoreResult<Group> {
        let mut inner = self.lock();
        if let Some(handle) = inner.handles.get(name) {
            return Ok(handle.clone());
        }
        let handle = Group::new(name);
        inner.state.groups.insert(name.to_string(), GroupState::default());
        inner.handles.insert(name.to_string(), handle.clone());
        Ok(handle)
    }

    fn find_group(&self, name: &str) -> StoreResult<Option<Group>> {
        Ok(self.lock().handles.get(name).cloned())
    }

    fn group_permissions(&self, group: &Group) -> StoreResult<BTreeSet<PermissionRef>> {
        Ok(self.lock().group_state(group)?.permissions.clone())
    }

    fn add_permissions(&self, group: &Group, perms: &[PermissionRef]) -> StoreResult<()> {
        let mut inner = self.lock();
        let state = inner.group_state(group)?;
        state.permissions.extend(perms.iter().cloned());
        Ok(())
    }

    fn set_permissions(&self, group: &Group, perms: &[PermissionRef]) -> StoreResult<()> {
        let mut inner = self.lock();
        let state = inner.group_state(group)?;
        state.permissions = perms.iter().cloned().collect();
        Ok(())
    }

    fn clear_permissions(&self, group: &Group) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.group_state(group)?.permissions.clear();
        Ok(())
    }

    fn find_permissions(
        &self,
        app_label: &str,
        codename: &str,
        model: Option<&str>,
    ) -> StoreResult<Vec<PermissionRef>> {
        Ok(self
            .lock()
            .state
            .permissions
            .iter()
            .filter(|perm| {
                perm.app_label == app_label
                    && perm.codename == codename
                    && model.map(|m| perm.model == m).unwrap_or(true)
            })
            .cloned()
            .collect())
    }

    fn add_members(&self, group: &Group, users: &[Uuid]) -> StoreResult<()> {
        let mut inner = self.lock();
        let state = inner.group_state(group)?;
        state.members.extend(users.iter().copied());
        Ok(())
    }

    fn remove_members(&self, group: &Group, users: &[Uuid]) -> StoreResult<()> {
        let mut inner = self.lock();
        let state = inner.group_state(group)?;
        for user in users {
            state.members.remove(user);
        }
        Ok(())
    }

    fn set_members(&self, group: &Group, users: &[Uuid]) -> StoreResult<()> {
        let mut inner = self.lock();
        let state = inner.group_state(group)?;
        state.members = users.iter().copied().collect();
        Ok(())
    }

    fn clear_members(&self, group: &Group) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.group_state(group)?.members.clear();
        Ok(())
    }

    fn members(&self, group: &Group) -> StoreResult<BTreeSet<Uuid>> {
        Ok(self.lock().group_state(group)?.members.clone())
    }
}
