//! Roles configuration
//!
//! One setting drives loading: the identifier of the module to scan for
//! role definitions. Its absence, or a module the source catalog cannot
//! resolve, are the only configuration-time failure modes.

use serde::Deserialize;

/// Environment variable the roles module is read from.
pub const ROLES_MODULE_ENV: &str = "GROUPROLE_ROLES_MODULE";

/// Configuration for role loading.
///
/// # Examples
///
/// ```
/// use grouprole_roles::RolesConfig;
///
/// let config = RolesConfig::module("myproject.roles");
/// assert_eq!(config.roles_module.as_deref(), Some("myproject.roles"));
/// assert!(RolesConfig::default().roles_module.is_none());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RolesConfig {
    /// Identifier of the module to scan for role definitions.
    #[serde(default)]
    pub roles_module: Option<String>,
}

impl RolesConfig {
    /// Configuration naming a roles module.
    pub fn module(module: impl Into<String>) -> Self {
        Self {
            roles_module: Some(module.into()),
        }
    }

    /// Read the configuration from the environment.
    ///
    /// Looks up [`ROLES_MODULE_ENV`]; an unset variable leaves the module
    /// unconfigured.
    pub fn from_env() -> Self {
        Self {
            roles_module: std::env::var(ROLES_MODULE_ENV).ok().filter(|v| !v.is_empty()),
        }
    }
}
