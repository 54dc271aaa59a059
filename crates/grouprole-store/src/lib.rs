//! # Grouprole Store
//!
//! This crate defines the persisted storage surface grouprole synchronizes
//! against: group entities, concrete permission references, and the
//! [`RoleBackend`] trait, plus an in-memory backend.
//!
//! ## Overview
//!
//! The grouprole-store crate handles:
//! - **Groups**: the persisted entity a role maps onto, one per role name
//! - **Permission references**: concrete `(app_label, model, codename)`
//!   triples that exist in the store
//! - **Backend trait**: create-or-get, permission set/add/clear, member
//!   operations and permission lookup
//! - **Memory backend**: a `Mutex`-guarded implementation with a serde
//!   snapshot state, used by tests and the CLI store file
//!
//! The relational schema behind a production backend is out of scope here;
//! this crate only fixes the operations the role layer relies on.
//!
//! ## Usage
//!
//! ```rust
//! use grouprole_store::{MemoryBackend, PermissionRef, RoleBackend};
//!
//! let backend = MemoryBackend::new();
//! backend.register_permission(PermissionRef::new("auth", "user", "view_user"));
//!
//! let group = backend.get_or_create_group("Users").unwrap();
//! let found = backend.find_permissions("auth", "view_user", None).unwrap();
//! backend.add_permissions(&group, &found).unwrap();
//! ```

pub mod backend;
pub mod error;
pub mod group;
pub mod memory;
pub mod permission;

// Re-export main types for convenience
pub use backend::RoleBackend;
pub use error::{StoreError, StoreResult};
pub use group::Group;
pub use memory::{GroupState, MemoryBackend, StoreState};
pub use permission::PermissionRef;
