//! Role instances: synchronization and queries
//!
//! A [`RoleInstance`] binds a role definition to a storage backend for the
//! duration of one workflow. It lazily creates or fetches the persisted
//! group named after the role, synchronizes the composed permission map
//! onto it and answers permission-membership queries.

use std::cell::OnceCell;

use grouprole_rbac::ModelSlot;
use grouprole_store::{Group, PermissionRef, RoleBackend};
use uuid::Uuid;

use crate::definition::RoleDefinition;
use crate::error::{RoleError, RoleResult};
use crate::signals::SignalHub;

/// Resolve one canonical map entry to a concrete permission reference.
///
/// A wildcard slot looks the codename up scoped to the app only, so the
/// codename must be unique within the app; a model slot looks up the
/// natural triple. No match or more than one match fails with
/// [`RoleError::PermissionBinding`] carrying the dotted identifier.
pub fn resolve_permission(
    backend: &dyn RoleBackend,
    app_label: &str,
    slot: &ModelSlot,
    codename: &str,
) -> RoleResult<PermissionRef> {
    let mut matches = backend.find_permissions(app_label, codename, slot.model_name())?;
    if matches.len() == 1 {
        return Ok(matches.remove(0));
    }

    tracing::warn!(
        app_label = %app_label,
        slot = %slot,
        codename = %codename,
        matches = matches.len(),
        "permission resolution failed"
    );
    Err(RoleError::PermissionBinding {
        permission: format!("{app_label}.{codename}"),
    })
}

/// A runtime handle binding a role definition to a backend.
///
/// The persisted group is created on first access and cached for the
/// instance's lifetime.
///
/// # Examples
///
/// ```
/// use grouprole_roles::{RoleDefinition, RoleInstance};
/// use grouprole_store::{MemoryBackend, PermissionRef};
///
/// let users = RoleDefinition::builder("Users")
///     .permissions(["auth.view_user"])
///     .build()
///     .unwrap();
///
/// let backend = MemoryBackend::new();
/// backend.register_permission(PermissionRef::new("auth", "user", "view_user"));
///
/// let instance = RoleInstance::new(&users, &backend);
/// instance.setup_permissions(false).unwrap();
/// assert_eq!(instance.group().unwrap().name, "Users");
/// ```
pub struct RoleInstance<'a> {
    definition: &'a RoleDefinition,
    backend: &'a dyn RoleBackend,
    signals: Option<&'a SignalHub>,
    group: OnceCell<Group>,
}

impl<'a> RoleInstance<'a> {
    /// Bind a definition to a backend.
    pub fn new(definition: &'a RoleDefinition, backend: &'a dyn RoleBackend) -> Self {
        Self {
            definition,
            backend,
            signals: None,
            group: OnceCell::new(),
        }
    }

    /// Attach a signal hub for setup notifications.
    pub fn with_signals(mut self, signals: &'a SignalHub) -> Self {
        self.signals = Some(signals);
        self
    }

    /// The definition this instance is bound to.
    pub fn definition(&self) -> &RoleDefinition {
        self.definition
    }

    /// The persisted group for this role, created if absent.
    ///
    /// Cached after the first access; the create-or-get is the backend's
    /// atomic operation, so concurrent creators observe one group.
    pub fn group(&self) -> RoleResult<&Group> {
        if let Some(group) = self.group.get() {
            return Ok(group);
        }
        let group = self.backend.get_or_create_group(self.definition.name())?;
        Ok(self.group.get_or_init(|| group))
    }

    /// Synchronize the composed permission map onto the group.
    ///
    /// Every map entry is resolved to a concrete permission before the
    /// group is touched, so a binding failure leaves the group unchanged.
    /// With `clear` the group's permission set is replaced with exactly
    /// the resolved set; otherwise the resolved set is added to whatever
    /// the group already holds.
    pub fn setup_permissions(&self, clear: bool) -> RoleResult<()> {
        if let Some(signals) = self.signals {
            signals.emit_pre_setup(self.definition, clear);
        }

        let resolved = self.resolve_all()?;
        let group = self.group()?;
        if clear {
            self.backend.set_permissions(group, &resolved)?;
        } else {
            self.backend.add_permissions(group, &resolved)?;
        }
        tracing::debug!(
            role = %self.definition.name(),
            resolved = resolved.len(),
            clear,
            "synchronized group permissions"
        );

        if let Some(signals) = self.signals {
            signals.emit_post_setup(self.definition);
        }
        Ok(())
    }

    fn resolve_all(&self) -> RoleResult<Vec<PermissionRef>> {
        let mut resolved = Vec::new();
        for (app_label, slot, codename) in self.definition.permission_map().entries() {
            let perm = resolve_permission(self.backend, app_label, slot, codename)?;
            if !resolved.contains(&perm) {
                resolved.push(perm);
            }
        }
        Ok(resolved)
    }

    /// Whether this role grants the dotted `app_label.codename`.
    pub fn has_perm(&self, perm: &str) -> bool {
        self.definition.has_perm(perm)
    }

    /// Whether this role grants every one of the given permissions.
    pub fn has_perms<'p, I>(&self, perms: I) -> bool
    where
        I: IntoIterator<Item = &'p str>,
    {
        perms.into_iter().all(|perm| self.has_perm(perm))
    }

    /// Whether this role grants at least one of the given permissions.
    pub fn has_any_perm<'p, I>(&self, perms: I) -> bool
    where
        I: IntoIterator<Item = &'p str>,
    {
        perms.into_iter().any(|perm| self.has_perm(perm))
    }

    /// Add users to the role's group.
    pub fn add_members(&self, users: &[Uuid]) -> RoleResult<()> {
        Ok(self.backend.add_members(self.group()?, users)?)
    }

    /// Remove users from the role's group.
    pub fn remove_members(&self, users: &[Uuid]) -> RoleResult<()> {
        Ok(self.backend.remove_members(self.group()?, users)?)
    }

    /// Replace the role's group members with exactly these users.
    pub fn set_members(&self, users: &[Uuid]) -> RoleResult<()> {
        Ok(self.backend.set_members(self.group()?, users)?)
    }

    /// Remove every member from the role's group.
    pub fn clear_members(&self) -> RoleResult<()> {
        Ok(self.backend.clear_members(self.group()?)?)
    }

    /// Whether a user is in the role's group.
    ///
    /// A role whose group does not exist yet has no members; the group is
    /// not created by this query.
    pub fn has_member(&self, user: Uuid) -> RoleResult<bool> {
        if let Some(group) = self.group.get() {
            return Ok(self.backend.is_member(group, user)?);
        }
        match self.backend.find_group(self.definition.name())? {
            Some(group) => Ok(self.backend.is_member(&group, user)?),
            None => Ok(false),
        }
    }
}

impl std::fmt::Debug for RoleInstance<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleInstance")
            .field("role", &self.definition.name())
            .field("group", &self.group.get().map(|g| g.id))
            .finish()
    }
}
