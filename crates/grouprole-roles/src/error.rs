//! Error types for role operations
//!
//! The taxonomy follows how failures are handled: configuration errors are
//! fatal to the calling operation, declaration errors signal a programming
//! error in role definitions and surface at build time, and binding errors
//! are the per-role domain failure drivers report without aborting a batch.

use grouprole_rbac::DeclarationError;
use grouprole_store::StoreError;
use thiserror::Error;

/// Role error types.
#[derive(Debug, Error)]
pub enum RoleError {
    /// No roles module is configured.
    #[error("a roles module setting is required to correctly load roles")]
    MissingModuleSetting,

    /// The configured roles module is not present in the source catalog.
    #[error("no module {0} from which to import roles found")]
    ModuleNotFound(String),

    /// A role was declared without a name.
    #[error("role name must not be empty")]
    EmptyName,

    /// A role's composed permission map is empty.
    #[error("a role must specify at least one permission")]
    NoPermissions,

    /// A permission declaration is malformed.
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    /// A role manifest could not be parsed.
    #[error("invalid role manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    /// The name is already bound in the registry.
    #[error("{0} already bound to role registry")]
    AlreadyRegistered(String),

    /// An abstract definition was passed to `register`.
    #[error("abstract role {0} cannot be registered")]
    AbstractRole(String),

    /// The named role is not in the registry.
    #[error("role {0} is not registered")]
    UnknownRole(String),

    /// A declared permission cannot be resolved against the store.
    ///
    /// Carries the dotted `app_label.codename` for diagnostics. Raised at
    /// synchronization time when the lookup matches no permission or more
    /// than one.
    #[error("permission {permission} cannot be bound to role")]
    PermissionBinding {
        /// The dotted permission that failed to resolve.
        permission: String,
    },

    /// The persisted store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for role operations.
pub type RoleResult<T> = Result<T, RoleError>;

impl RoleError {
    /// Whether this is a per-role binding failure a driver should report
    /// and skip rather than abort the batch on.
    pub fn is_binding(&self) -> bool {
        matches!(self, RoleError::PermissionBinding { .. })
    }
}
