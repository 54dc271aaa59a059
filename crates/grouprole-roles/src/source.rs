//! Role sources and the source catalog
//!
//! A source is one "module" of role definitions; the catalog maps module
//! identifiers to sources. Loading the registry resolves the configured
//! module identifier against the catalog and scans the source's exported
//! definitions, which replaces dynamic module import with an explicit
//! plugin-discovery step.

use indexmap::IndexMap;

use crate::definition::RoleDefinition;

/// A module of role definitions the registry can load.
///
/// Sources export their definitions in declaration order; abstract
/// definitions may be exported and are filtered out during load.
///
/// Any `Fn() -> Vec<RoleDefinition>` is a source:
///
/// ```
/// use grouprole_roles::{RoleDefinition, RoleSource, SourceCatalog};
///
/// let catalog = SourceCatalog::new().with_source("myproject.roles", || {
///     vec![RoleDefinition::builder("Users")
///         .permissions(["auth.view_user"])
///         .build()
///         .unwrap()]
/// });
/// assert!(catalog.contains("myproject.roles"));
/// ```
pub trait RoleSource {
    /// The role definitions this source exports.
    fn roles(&self) -> Vec<RoleDefinition>;
}

impl<F> RoleSource for F
where
    F: Fn() -> Vec<RoleDefinition>,
{
    fn roles(&self) -> Vec<RoleDefinition> {
        self()
    }
}

/// Catalog of role sources by module identifier.
#[derive(Default)]
pub struct SourceCatalog {
    sources: IndexMap<String, Box<dyn RoleSource>>,
}

impl SourceCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source under a module identifier.
    ///
    /// A later registration under the same identifier replaces the
    /// earlier one; the registry's no-overwrite rule applies to role
    /// names, not to sources.
    pub fn insert(&mut self, module: impl Into<String>, source: impl RoleSource + 'static) {
        self.sources.insert(module.into(), Box::new(source));
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_source(
        mut self,
        module: impl Into<String>,
        source: impl RoleSource + 'static,
    ) -> Self {
        self.insert(module, source);
        self
    }

    /// The source registered under a module identifier, if any.
    pub fn get(&self, module: &str) -> Option<&dyn RoleSource> {
        self.sources.get(module).map(Box::as_ref)
    }

    /// Whether a module identifier is registered.
    pub fn contains(&self, module: &str) -> bool {
        self.sources.contains_key(module)
    }

    /// Registered module identifiers, in registration order.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for SourceCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceCatalog")
            .field("modules", &self.sources.keys().collect::<Vec<_>>())
            .finish()
    }
}
