//! Role registry
//!
//! Process-wide mapping from role name to definition. Bindings are strict:
//! once a name is bound it is never rebound or removed except through an
//! explicit bulk [`clear`](RoleRegistry::clear). The registry loads its
//! definitions from a configured module in the source catalog, at most once
//! per process unless forced.

use indexmap::IndexMap;

use crate::config::RolesConfig;
use crate::definition::RoleDefinition;
use crate::error::{RoleError, RoleResult};
use crate::source::SourceCatalog;

/// Options for [`RoleRegistry::load`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Re-scan the module even when the registry is already loaded.
    pub force: bool,

    /// Wipe the registry before scanning.
    pub clear: bool,
}

/// Mapping from role name to role definition.
///
/// The registry is a plain value passed by reference; cloning it is the
/// snapshot/restore mechanism tests use. Iteration follows registration
/// order.
///
/// # Examples
///
/// ```
/// use grouprole_roles::{RoleDefinition, RoleRegistry};
///
/// let users = RoleDefinition::builder("Users")
///     .permissions(["auth.view_user"])
///     .build()
///     .unwrap();
///
/// let mut registry = RoleRegistry::new();
/// registry.register(users).unwrap();
/// assert!(registry.contains("Users"));
///
/// // Names are never rebound.
/// let dup = RoleDefinition::builder("Users")
///     .permissions(["auth.view_group"])
///     .build()
///     .unwrap();
/// assert!(registry.register(dup).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoleRegistry {
    roles: IndexMap<String, RoleDefinition>,
    loaded: bool,
}

impl RoleRegistry {
    /// Create an empty, unloaded registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a definition under its name.
    ///
    /// Fails when the name is already bound or the definition is
    /// abstract; abstract roles never enter the registry.
    pub fn register(&mut self, definition: RoleDefinition) -> RoleResult<()> {
        if definition.is_abstract() {
            return Err(RoleError::AbstractRole(definition.name().to_string()));
        }
        if self.roles.contains_key(definition.name()) {
            return Err(RoleError::AlreadyRegistered(definition.name().to_string()));
        }
        self.roles.insert(definition.name().to_string(), definition);
        Ok(())
    }

    /// Remove all bindings and reset the loaded flag.
    ///
    /// Administrative/testing operation; regular code never unbinds roles.
    pub fn clear(&mut self) {
        self.roles.clear();
        self.loaded = false;
    }

    /// Load role definitions from the configured module.
    ///
    /// Requires `config.roles_module`; when the registry is already loaded
    /// and `force` is not set this is an idempotent no-op, so repeated
    /// calls within a process scan the module at most once. The scan skips
    /// abstract definitions and names already bound.
    pub fn load(
        &mut self,
        catalog: &SourceCatalog,
        config: &RolesConfig,
        options: LoadOptions,
    ) -> RoleResult<()> {
        let module = config
            .roles_module
            .as_deref()
            .ok_or(RoleError::MissingModuleSetting)?;

        if self.loaded && !options.force {
            return Ok(());
        }
        if options.clear {
            self.clear();
        }

        let source = catalog
            .get(module)
            .ok_or_else(|| RoleError::ModuleNotFound(module.to_string()))?;

        let mut registered = 0usize;
        for definition in source.roles() {
            if definition.is_abstract() || self.roles.contains_key(definition.name()) {
                continue;
            }
            self.register(definition)?;
            registered += 1;
        }

        self.loaded = true;
        tracing::debug!(module = %module, registered, "loaded role definitions");
        Ok(())
    }

    /// Whether a load has completed since creation or the last clear.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The definition bound to a name, if any.
    pub fn get(&self, name: &str) -> Option<&RoleDefinition> {
        self.roles.get(name)
    }

    /// The definition bound to a name, or [`RoleError::UnknownRole`].
    pub fn require(&self, name: &str) -> RoleResult<&RoleDefinition> {
        self.get(name)
            .ok_or_else(|| RoleError::UnknownRole(name.to_string()))
    }

    /// Whether a name is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.roles.contains_key(name)
    }

    /// Iterate over `(name, definition)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RoleDefinition)> {
        self.roles.iter().map(|(name, def)| (name.as_str(), def))
    }

    /// Bound role names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }

    /// Number of bound roles.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Whether no role is bound.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn definitions() -> Vec<RoleDefinition> {
        let base = RoleDefinition::builder("Base")
            .permissions(["auth.view_user", "auth.view_group"])
            .build()
            .unwrap();
        let managers = RoleDefinition::builder("Managers")
            .extends(&base)
            .permissions(["auth.add_user", "auth.change_user"])
            .build()
            .unwrap();
        let abstract_base = RoleDefinition::builder("Hidden")
            .abstract_role()
            .permissions(["auth.view_user"])
            .build()
            .unwrap();
        vec![base, managers, abstract_base]
    }

    fn catalog() -> SourceCatalog {
        SourceCatalog::new().with_source("example.roles", definitions)
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = RoleRegistry::new();
        let defs = definitions();
        registry.register(defs[0].clone()).unwrap();
        let err = registry.register(defs[0].clone()).unwrap_err();
        assert!(matches!(err, RoleError::AlreadyRegistered(name) if name == "Base"));
    }

    #[test]
    fn test_register_rejects_abstract() {
        let mut registry = RoleRegistry::new();
        let err = registry.register(definitions()[2].clone()).unwrap_err();
        assert!(matches!(err, RoleError::AbstractRole(name) if name == "Hidden"));
    }

    #[test]
    fn test_load_requires_module_setting() {
        let mut registry = RoleRegistry::new();
        let err = registry
            .load(&catalog(), &RolesConfig::default(), LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, RoleError::MissingModuleSetting));
    }

    #[test]
    fn test_load_unknown_module() {
        let mut registry = RoleRegistry::new();
        let err = registry
            .load(
                &catalog(),
                &RolesConfig::module("nowhere.nothing"),
                LoadOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, RoleError::ModuleNotFound(m) if m == "nowhere.nothing"));
    }

    #[test]
    fn test_load_registers_concrete_roles_only() {
        let mut registry = RoleRegistry::new();
        registry
            .load(&catalog(), &RolesConfig::module("example.roles"), LoadOptions::default())
            .unwrap();

        assert!(registry.is_loaded());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Base", "Managers"]);
        assert!(!registry.contains("Hidden"));
    }

    #[test]
    fn test_load_is_idempotent_unless_forced() {
        let scans = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&scans);
        let catalog = SourceCatalog::new().with_source("example.roles", move || {
            counter.set(counter.get() + 1);
            definitions()
        });
        let config = RolesConfig::module("example.roles");

        let mut registry = RoleRegistry::new();
        registry.load(&catalog, &config, LoadOptions::default()).unwrap();
        registry.load(&catalog, &config, LoadOptions::default()).unwrap();
        assert_eq!(scans.get(), 1);

        // A forced load scans again and skips already-bound names.
        registry
            .load(&catalog, &config, LoadOptions { force: true, clear: false })
            .unwrap();
        assert_eq!(scans.get(), 2);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_clear_resets_loaded_flag() {
        let mut registry = RoleRegistry::new();
        registry
            .load(&catalog(), &RolesConfig::module("example.roles"), LoadOptions::default())
            .unwrap();
        registry.clear();

        assert!(registry.is_empty());
        assert!(!registry.is_loaded());
    }

    #[test]
    fn test_load_with_clear_wipes_previous_bindings() {
        let mut registry = RoleRegistry::new();
        registry
            .register(
                RoleDefinition::builder("Stale")
                    .permissions(["auth.view_user"])
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
            .load(
                &catalog(),
                &RolesConfig::module("example.roles"),
                LoadOptions { force: true, clear: true },
            )
            .unwrap();

        assert!(!registry.contains("Stale"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_snapshot_restore_via_clone() {
        let mut registry = RoleRegistry::new();
        registry
            .load(&catalog(), &RolesConfig::module("example.roles"), LoadOptions::default())
            .unwrap();

        let snapshot = registry.clone();
        registry.clear();
        assert!(registry.is_empty());

        registry = snapshot;
        assert_eq!(registry.len(), 2);
        assert!(registry.is_loaded());
    }
}
