//! End-to-end synchronization scenarios: a catalog of role modules, a
//! pre-seeded store, and full registry-load-then-sync workflows.

use std::collections::BTreeSet;

use grouprole_rbac::{NestedEntry, PermissionDeclaration};
use grouprole_roles::testing::{setup_test_roles, TestRoleSetup};
use grouprole_roles::{
    LoadOptions, RoleDefinition, RoleInstance, RoleRegistry, RolesConfig, SourceCatalog,
};
use grouprole_store::{MemoryBackend, PermissionRef, RoleBackend};

fn example_roles() -> Vec<RoleDefinition> {
    let users = RoleDefinition::builder("Users")
        .permissions(["auth.view_user", "auth.view_group"])
        .build()
        .unwrap();
    let user_managers = RoleDefinition::builder("User-Managers")
        .extends(&users)
        .permissions(["auth.add_user", "auth.change_user"])
        .build()
        .unwrap();
    let group_managers = RoleDefinition::builder("Group-Managers")
        .extends(&users)
        .permissions(["auth.add_group", "auth.view_group", "auth.delete_group"])
        .build()
        .unwrap();
    let abstract_role = RoleDefinition::builder("Abstract")
        .abstract_role()
        .permissions(["auth.add_group", "auth.view_group", "auth.delete_group"])
        .build()
        .unwrap();
    let erasers = RoleDefinition::builder("Erasers")
        .declaration(PermissionDeclaration::nested([(
            "auth",
            NestedEntry::per_model([("user", ["delete_user"]), ("group", ["delete_group"])]),
        )]))
        .build()
        .unwrap();
    let broken = RoleDefinition::builder("Broken")
        .permissions(["auth.non_existing_perm"])
        .build()
        .unwrap();
    vec![users, user_managers, group_managers, abstract_role, erasers, broken]
}

fn secondary_roles() -> Vec<RoleDefinition> {
    let base = RoleDefinition::builder("Base")
        .permissions(["auth.view_user", "auth.view_group"])
        .build()
        .unwrap();
    let managers = RoleDefinition::builder("Managers")
        .extends(&base)
        .permissions(["auth.add_user", "auth.change_user"])
        .build()
        .unwrap();
    let groupers = RoleDefinition::builder("Groupers")
        .extends(&base)
        .permissions(["auth.add_group", "auth.view_group", "auth.delete_group"])
        .build()
        .unwrap();
    vec![base, managers, groupers]
}

fn catalog() -> SourceCatalog {
    SourceCatalog::new()
        .with_source("example.roles", example_roles)
        .with_source("example.roles_secondary", secondary_roles)
}

fn seeded_backend() -> MemoryBackend {
    let backend = MemoryBackend::new();
    backend.register_permissions([
        PermissionRef::new("auth", "user", "view_user"),
        PermissionRef::new("auth", "user", "add_user"),
        PermissionRef::new("auth", "user", "change_user"),
        PermissionRef::new("auth", "user", "delete_user"),
        PermissionRef::new("auth", "group", "view_group"),
        PermissionRef::new("auth", "group", "add_group"),
        PermissionRef::new("auth", "group", "delete_group"),
    ]);
    backend
}

fn group_perms(backend: &MemoryBackend, name: &str) -> BTreeSet<String> {
    let group = backend.find_group(name).unwrap().unwrap();
    backend
        .group_permissions(&group)
        .unwrap()
        .iter()
        .map(PermissionRef::dotted)
        .collect()
}

#[test]
fn load_then_sync_all_registered_roles() {
    let backend = seeded_backend();
    let mut registry = RoleRegistry::new();
    registry
        .load(&catalog(), &RolesConfig::module("example.roles"), LoadOptions::default())
        .unwrap();

    // The abstract base is discovered but never registered.
    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec!["Users", "User-Managers", "Group-Managers", "Erasers", "Broken"]
    );

    let mut failures = Vec::new();
    for (name, definition) in registry.iter() {
        let instance = RoleInstance::new(definition, &backend);
        if let Err(err) = instance.setup_permissions(false) {
            failures.push((name.to_string(), err.to_string()));
        }
    }

    // One role fails to bind; the rest of the batch still completed.
    assert_eq!(
        failures,
        vec![(
            "Broken".to_string(),
            "permission auth.non_existing_perm cannot be bound to role".to_string()
        )]
    );
    assert_eq!(
        group_perms(&backend, "User-Managers"),
        BTreeSet::from([
            "auth.view_user".to_string(),
            "auth.view_group".to_string(),
            "auth.add_user".to_string(),
            "auth.change_user".to_string(),
        ])
    );
    assert_eq!(
        group_perms(&backend, "Erasers"),
        BTreeSet::from(["auth.delete_user".to_string(), "auth.delete_group".to_string()])
    );
}

#[test]
fn clear_sync_removes_stale_permissions_only_for_selected_roles() {
    let backend = seeded_backend();

    // Pre-seed two groups with a stale permission each.
    for name in ["Users", "User-Managers"] {
        let group = backend.get_or_create_group(name).unwrap();
        backend
            .add_permissions(&group, &[PermissionRef::new("auth", "user", "delete_user")])
            .unwrap();
    }

    let mut registry = RoleRegistry::new();
    registry
        .load(&catalog(), &RolesConfig::module("example.roles"), LoadOptions::default())
        .unwrap();

    let users = registry.get("Users").unwrap();
    RoleInstance::new(users, &backend).setup_permissions(true).unwrap();

    assert_eq!(
        group_perms(&backend, "Users"),
        BTreeSet::from(["auth.view_user".to_string(), "auth.view_group".to_string()])
    );
    // The unselected group kept its stale permission.
    assert_eq!(
        group_perms(&backend, "User-Managers"),
        BTreeSet::from(["auth.delete_user".to_string()])
    );
}

#[test]
fn test_hook_with_allowlist_creates_only_selected_groups() {
    let backend = seeded_backend();
    let mut registry = RoleRegistry::new();
    setup_test_roles(
        &mut registry,
        &catalog(),
        &RolesConfig::module("example.roles_secondary"),
        &backend,
        &TestRoleSetup::default().roles(["Base", "Managers"]),
    )
    .unwrap();

    assert_eq!(
        backend.group_names(),
        vec!["Base".to_string(), "Managers".to_string()]
    );
    assert_eq!(
        group_perms(&backend, "Managers"),
        BTreeSet::from([
            "auth.view_user".to_string(),
            "auth.view_group".to_string(),
            "auth.add_user".to_string(),
            "auth.change_user".to_string(),
        ])
    );
}

#[test]
fn test_hook_alternate_module_forces_reload() {
    let backend = seeded_backend();
    let mut registry = RoleRegistry::new();

    // First load the standard module...
    registry
        .load(&catalog(), &RolesConfig::module("example.roles"), LoadOptions::default())
        .unwrap();
    assert!(registry.contains("Users"));

    // ...then override with the secondary one, clearing previous bindings.
    setup_test_roles(
        &mut registry,
        &catalog(),
        &RolesConfig::module("example.roles"),
        &backend,
        &TestRoleSetup {
            roles_from: Some("example.roles_secondary".to_string()),
            clear_registry: true,
            ..TestRoleSetup::default()
        },
    )
    .unwrap();

    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec!["Base", "Managers", "Groupers"]
    );
    assert_eq!(
        group_perms(&backend, "Groupers"),
        BTreeSet::from([
            "auth.view_user".to_string(),
            "auth.view_group".to_string(),
            "auth.add_group".to_string(),
            "auth.delete_group".to_string(),
        ])
    );
}

#[test]
fn test_hook_surfaces_binding_errors() {
    let backend = seeded_backend();
    let mut registry = RoleRegistry::new();
    let err = setup_test_roles(
        &mut registry,
        &catalog(),
        &RolesConfig::module("example.roles"),
        &backend,
        &TestRoleSetup::default(),
    )
    .unwrap_err();
    assert!(err.is_binding());
}
