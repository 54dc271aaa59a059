//! Test-support helpers
//!
//! A reusable setup routine for test suites that need synchronized roles:
//! load the registry (optionally forced, cleared, or from an alternate
//! module) and synchronize a selection of roles against a backend. Binding
//! errors are returned, not swallowed — in a test they are a hard failure.

use grouprole_store::RoleBackend;

use crate::config::RolesConfig;
use crate::error::RoleResult;
use crate::instance::RoleInstance;
use crate::registry::{LoadOptions, RoleRegistry};
use crate::source::SourceCatalog;

/// Options for [`setup_test_roles`].
#[derive(Debug, Clone, Default)]
pub struct TestRoleSetup {
    /// Allowlist of role names to synchronize; `None` means all
    /// registered roles.
    pub roles: Option<Vec<String>>,

    /// Alternate module to load roles from, overriding the configured
    /// one. Forces a reload.
    pub roles_from: Option<String>,

    /// Force a reload even without an alternate module.
    pub force_reload: bool,

    /// Wipe the registry before loading.
    pub clear_registry: bool,
}

impl TestRoleSetup {
    /// Restrict synchronization to these role names.
    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    /// Load roles from this module instead of the configured one.
    pub fn roles_from(mut self, module: impl Into<String>) -> Self {
        self.roles_from = Some(module.into());
        self
    }
}

/// Load the registry and synchronize the selected roles.
///
/// With `roles_from` set, the registry is loaded from that module with a
/// forced reload; otherwise the configured module is loaded honoring
/// `force_reload`/`clear_registry`. Every registered role passing the
/// allowlist is then synchronized additively. Any error — configuration,
/// registration or permission binding — propagates to the caller.
///
/// # Examples
///
/// ```
/// use grouprole_roles::testing::{setup_test_roles, TestRoleSetup};
/// use grouprole_roles::{RoleDefinition, RoleRegistry, RolesConfig, SourceCatalog};
/// use grouprole_store::{MemoryBackend, PermissionRef, RoleBackend};
///
/// let catalog = SourceCatalog::new().with_source("example.roles", || {
///     vec![RoleDefinition::builder("Users")
///         .permissions(["auth.view_user"])
///         .build()
///         .unwrap()]
/// });
/// let backend = MemoryBackend::new();
/// backend.register_permission(PermissionRef::new("auth", "user", "view_user"));
///
/// let mut registry = RoleRegistry::new();
/// setup_test_roles(
///     &mut registry,
///     &catalog,
///     &RolesConfig::module("example.roles"),
///     &backend,
///     &TestRoleSetup::default(),
/// )
/// .expect("role setup failed");
/// assert!(backend.find_group("Users").unwrap().is_some());
/// ```
pub fn setup_test_roles(
    registry: &mut RoleRegistry,
    catalog: &SourceCatalog,
    config: &RolesConfig,
    backend: &dyn RoleBackend,
    options: &TestRoleSetup,
) -> RoleResult<()> {
    match &options.roles_from {
        Some(module) => {
            // An alternate module always forces a reload.
            registry.load(
                catalog,
                &RolesConfig::module(module.clone()),
                LoadOptions {
                    force: true,
                    clear: options.clear_registry,
                },
            )?;
        }
        None => {
            registry.load(
                catalog,
                config,
                LoadOptions {
                    force: options.force_reload,
                    clear: options.clear_registry,
                },
            )?;
        }
    }

    for (name, definition) in registry.iter() {
        let selected = options
            .roles
            .as_ref()
            .map(|roles| roles.iter().any(|r| r == name))
            .unwrap_or(true);
        if selected {
            RoleInstance::new(definition, backend).setup_permissions(false)?;
        }
    }

    Ok(())
}
