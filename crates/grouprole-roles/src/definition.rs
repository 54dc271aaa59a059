//! Role definitions and composition
//!
//! A role definition is a declarative unit: a name, the permissions it
//! declares, an abstract flag, and the composed permission map resulting
//! from merging its own declarations with its parents'. Definitions are
//! immutable once built; all validation happens in [`RoleBuilder::build`].

use grouprole_rbac::{PermissionDeclaration, PermissionMap};

use crate::error::{RoleError, RoleResult};

/// An immutable role declaration.
///
/// Built through [`RoleDefinition::builder`]; composition with parent
/// roles happens at build time, so the composed map is always consistent
/// with the declaration.
///
/// # Examples
///
/// ```
/// use grouprole_roles::RoleDefinition;
///
/// let users = RoleDefinition::builder("Users")
///     .permissions(["auth.view_user", "auth.view_group"])
///     .build()
///     .unwrap();
///
/// let managers = RoleDefinition::builder("User-Managers")
///     .extends(&users)
///     .permissions(["auth.add_user", "auth.change_user"])
///     .build()
///     .unwrap();
///
/// // Inherited and own permissions compose into one map.
/// assert!(managers.has_perm("auth.view_user"));
/// assert!(managers.has_perm("auth.add_user"));
/// assert_eq!(managers.permission_map().len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefinition {
    name: String,
    declared: Vec<PermissionDeclaration>,
    composed: PermissionMap,
    is_abstract: bool,
}

impl RoleDefinition {
    /// Start building a role definition with this name.
    pub fn builder(name: impl Into<String>) -> RoleBuilder {
        RoleBuilder {
            name: name.into(),
            declarations: Vec::new(),
            parents: Vec::new(),
            is_abstract: false,
        }
    }

    /// The role name, equal to the name of its persisted group.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The permission declarations as authored, before composition.
    pub fn declared(&self) -> &[PermissionDeclaration] {
        &self.declared
    }

    /// The composed permission map: own declarations unioned with every
    /// parent's composed map.
    pub fn permission_map(&self) -> &PermissionMap {
        &self.composed
    }

    /// Whether this definition is abstract.
    ///
    /// Abstract roles are permission-inheritance bases only and are never
    /// registered.
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Whether the composed map grants the dotted `app_label.codename`.
    ///
    /// True iff the app is mapped and the codename appears in any of its
    /// slots, wildcard or model-scoped. A value without a dot never
    /// matches.
    pub fn has_perm(&self, perm: &str) -> bool {
        match perm.split_once('.') {
            Some((app_label, codename)) => self.composed.has_codename(app_label, codename),
            None => false,
        }
    }
}

/// Builder for [`RoleDefinition`].
///
/// Parents contribute their already-composed permission maps, accumulated
/// left-to-right in the order `extends` is called; own declarations are
/// merged last. Everything is set union, so ordering only matters for
/// which malformed declaration is reported first.
#[derive(Debug, Clone)]
pub struct RoleBuilder {
    name: String,
    declarations: Vec<PermissionDeclaration>,
    parents: Vec<PermissionMap>,
    is_abstract: bool,
}

impl RoleBuilder {
    /// Declare flat `app_label.codename` permissions.
    pub fn permissions<I, S>(self, perms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declaration(PermissionDeclaration::flat(perms))
    }

    /// Declare permissions in any shape.
    pub fn declaration(mut self, declaration: PermissionDeclaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Inherit a parent role's composed permissions.
    ///
    /// Only permissions are inherited: the parent's abstract flag does not
    /// propagate.
    pub fn extends(mut self, parent: &RoleDefinition) -> Self {
        self.parents.push(parent.permission_map().clone());
        self
    }

    /// Mark the definition abstract: usable as a base, never registered.
    pub fn abstract_role(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Validate and compose the definition.
    ///
    /// Fails with [`RoleError::EmptyName`] on an empty name, with a
    /// declaration error on a malformed permission shape, and with
    /// [`RoleError::NoPermissions`] when the composed map ends up empty.
    pub fn build(self) -> RoleResult<RoleDefinition> {
        if self.name.is_empty() {
            return Err(RoleError::EmptyName);
        }

        let mut composed = PermissionMap::new();
        for parent in &self.parents {
            composed.union(parent);
        }
        for declaration in &self.declarations {
            composed.merge_declaration(declaration)?;
        }

        if composed.is_empty() {
            return Err(RoleError::NoPermissions);
        }

        Ok(RoleDefinition {
            name: self.name,
            declared: self.declarations,
            composed,
            is_abstract: self.is_abstract,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grouprole_rbac::{ModelSlot, NestedEntry};

    fn basic_role() -> RoleDefinition {
        RoleDefinition::builder("Users")
            .permissions(["auth.view_user", "auth.view_group"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = RoleDefinition::builder("")
            .permissions(["auth.view_user"])
            .build()
            .unwrap_err();
        assert!(matches!(err, RoleError::EmptyName));
    }

    #[test]
    fn test_no_permissions_rejected() {
        let err = RoleDefinition::builder("Users").build().unwrap_err();
        assert!(matches!(err, RoleError::NoPermissions));

        // An empty declaration contributes nothing.
        let err = RoleDefinition::builder("Users")
            .declaration(PermissionDeclaration::Flat(vec![]))
            .build()
            .unwrap_err();
        assert!(matches!(err, RoleError::NoPermissions));
    }

    #[test]
    fn test_malformed_declaration_rejected() {
        let err = RoleDefinition::builder("Users")
            .permissions(["view_user"])
            .build()
            .unwrap_err();
        assert!(matches!(err, RoleError::Declaration(_)));
    }

    #[test]
    fn test_composition_with_parent() {
        let managers = RoleDefinition::builder("User-Managers")
            .extends(&basic_role())
            .permissions(["auth.add_user", "auth.change_user"])
            .build()
            .unwrap();

        let codenames: Vec<_> = managers
            .permission_map()
            .codenames("auth", &ModelSlot::Wildcard)
            .collect();
        assert_eq!(
            codenames,
            vec!["add_user", "change_user", "view_group", "view_user"]
        );
    }

    #[test]
    fn test_inherited_only_role_is_valid() {
        // No own permissions, but a parent contributes some.
        let child = RoleDefinition::builder("Readers")
            .extends(&basic_role())
            .build()
            .unwrap();
        assert!(child.has_perm("auth.view_user"));
    }

    #[test]
    fn test_abstract_flag_not_inherited() {
        let base = RoleDefinition::builder("Abstract")
            .abstract_role()
            .permissions(["auth.view_user"])
            .build()
            .unwrap();
        assert!(base.is_abstract());

        let child = RoleDefinition::builder("Concrete").extends(&base).build().unwrap();
        assert!(!child.is_abstract());
    }

    #[test]
    fn test_grandparent_composition_uses_composed_maps() {
        let managers = RoleDefinition::builder("Group Managers")
            .extends(&basic_role())
            .permissions(["auth.add_group", "auth.view_group", "auth.delete_group"])
            .build()
            .unwrap();
        let top = RoleDefinition::builder("Top-Managers")
            .extends(&managers)
            .permissions(["auth.add_permission"])
            .build()
            .unwrap();

        // Permissions flow through the whole ancestor chain.
        assert!(top.has_perm("auth.view_user"));
        assert!(top.has_perm("auth.delete_group"));
        assert!(top.has_perm("auth.add_permission"));
    }

    #[test]
    fn test_has_perm_with_nested_declaration() {
        let erasers = RoleDefinition::builder("Erasers")
            .declaration(PermissionDeclaration::nested([(
                "auth",
                NestedEntry::per_model([("user", ["delete_user"])]),
            )]))
            .build()
            .unwrap();

        assert!(erasers.has_perm("auth.delete_user"));
        assert!(!erasers.has_perm("auth.add_user"));
        assert!(!erasers.has_perm("delete_user"));
    }
}
