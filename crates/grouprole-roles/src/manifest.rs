//! Declarative role manifests
//!
//! Roles can be authored in a JSON manifest instead of code. Each entry
//! names a role, optionally marks it abstract, inherits from earlier
//! entries by name and declares permissions in either declaration shape.
//! A parsed manifest compiles through the role builder into a
//! [`RoleSource`] the registry can load.
//!
//! ```json
//! {
//!   "roles": [
//!     {"name": "Users", "permissions": ["auth.view_user", "auth.view_group"]},
//!     {"name": "User-Managers", "extends": ["Users"],
//!      "permissions": ["auth.add_user", "auth.change_user"]},
//!     {"name": "Erasers", "permissions": {"auth": {"user": ["delete_user"]}}}
//!   ]
//! }
//! ```

use indexmap::IndexMap;
use serde::Deserialize;

use crate::definition::RoleDefinition;
use crate::error::{RoleError, RoleResult};
use crate::source::RoleSource;

use grouprole_rbac::PermissionDeclaration;

/// One role entry of a manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestRole {
    /// Role name.
    pub name: String,

    /// Abstract flag; explicit opt-in per entry, never inherited.
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,

    /// Names of earlier entries whose composed permissions are inherited.
    #[serde(default)]
    pub extends: Vec<String>,

    /// Declared permissions, flat or nested.
    #[serde(default)]
    pub permissions: Option<PermissionDeclaration>,
}

/// A parsed role manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleManifest {
    /// Role entries, in declaration order.
    pub roles: Vec<ManifestRole>,
}

impl RoleManifest {
    /// Parse a manifest from JSON.
    pub fn from_json(json: &str) -> RoleResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compile the manifest into role definitions.
    ///
    /// Entries are built in order; `extends` may reference any earlier
    /// entry, abstract ones included. Validation is the builder's: empty
    /// names, malformed declarations and empty compositions fail here, at
    /// load time rather than at first use.
    pub fn definitions(&self) -> RoleResult<Vec<RoleDefinition>> {
        let mut built: IndexMap<String, RoleDefinition> = IndexMap::new();
        for entry in &self.roles {
            let mut builder = RoleDefinition::builder(&entry.name);
            if entry.is_abstract {
                builder = builder.abstract_role();
            }
            for parent in &entry.extends {
                let parent = built
                    .get(parent)
                    .ok_or_else(|| RoleError::UnknownRole(parent.clone()))?;
                builder = builder.extends(parent);
            }
            if let Some(declaration) = &entry.permissions {
                builder = builder.declaration(declaration.clone());
            }
            let definition = builder.build()?;
            built.insert(entry.name.clone(), definition);
        }
        Ok(built.into_values().collect())
    }

    /// Compile into a [`RoleSource`].
    pub fn into_source(self) -> RoleResult<ManifestSource> {
        Ok(ManifestSource {
            definitions: self.definitions()?,
        })
    }
}

/// A [`RoleSource`] backed by a compiled manifest.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    definitions: Vec<RoleDefinition>,
}

impl RoleSource for ManifestSource {
    fn roles(&self) -> Vec<RoleDefinition> {
        self.definitions.clone()
    }
}
