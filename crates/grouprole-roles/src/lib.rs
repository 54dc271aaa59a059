//! # Grouprole Roles
//!
//! Declarative role management: roles are named bundles of permissions,
//! each mapped 1:1 onto a persisted group. This crate provides the role
//! definition builder, inheritance composition, the role registry with its
//! lazily loaded source catalog, and the runtime role instance that
//! synchronizes a role's permissions onto its group.
//!
//! ## Overview
//!
//! The grouprole-roles crate handles:
//! - **Definitions**: builder-constructed, immutable role declarations
//! - **Composition**: merging a role's own permissions with its parents'
//! - **Registry**: process-wide name → definition mapping with strict
//!   no-overwrite registration and idempotent loading
//! - **Sources**: the catalog of role "modules" the registry loads from
//! - **Instances**: lazy group access, additive or exact permission sync,
//!   permission and membership queries
//! - **Signals**: pre/post-setup notification dispatch
//!
//! ## Usage
//!
//! ```rust
//! use grouprole_roles::{RoleDefinition, RoleInstance, RoleRegistry};
//! use grouprole_store::{MemoryBackend, PermissionRef};
//!
//! let users = RoleDefinition::builder("Users")
//!     .permissions(["auth.view_user", "auth.view_group"])
//!     .build()
//!     .unwrap();
//!
//! let managers = RoleDefinition::builder("User-Managers")
//!     .extends(&users)
//!     .permissions(["auth.add_user", "auth.change_user"])
//!     .build()
//!     .unwrap();
//!
//! let mut registry = RoleRegistry::new();
//! registry.register(users).unwrap();
//! registry.register(managers).unwrap();
//!
//! let backend = MemoryBackend::new();
//! backend.register_permissions([
//!     PermissionRef::new("auth", "user", "view_user"),
//!     PermissionRef::new("auth", "group", "view_group"),
//! ]);
//!
//! let role = registry.get("Users").unwrap();
//! let instance = RoleInstance::new(role, &backend);
//! instance.setup_permissions(false).unwrap();
//! assert!(instance.has_perm("auth.view_user"));
//! ```
//!
//! ## Concurrency
//!
//! Everything here is single-threaded and synchronous. The registry is
//! plain mutable state passed by reference; callers running concurrent
//! synchronization workflows must serialize access themselves.

pub mod config;
pub mod definition;
pub mod error;
pub mod instance;
pub mod manifest;
pub mod registry;
pub mod signals;
pub mod source;
pub mod testing;

// Re-export main types for convenience
pub use config::RolesConfig;
pub use definition::{RoleBuilder, RoleDefinition};
pub use error::{RoleError, RoleResult};
pub use instance::RoleInstance;
pub use manifest::{ManifestRole, RoleManifest};
pub use registry::{LoadOptions, RoleRegistry};
pub use signals::{SetupObserver, SignalHub};
pub use source::{RoleSource, SourceCatalog};
