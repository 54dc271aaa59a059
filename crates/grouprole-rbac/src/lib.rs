//! # Grouprole RBAC
//!
//! This crate provides the permission-mapping core for grouprole: the
//! declaration shapes roles are authored in, and the canonical permission
//! map they are merged into.
//!
//! ## Overview
//!
//! The grouprole-rbac crate handles:
//! - **Declarations**: the raw permission forms a role may declare
//! - **Model slots**: grouping of codenames by model, with a wildcard slot
//! - **Canonical map**: `app_label -> model slot -> set of codenames`
//! - **Merging**: pure set-union folding of declarations into one map
//!
//! ## Declaration shapes
//!
//! Permissions can be declared flat, as dotted identifiers:
//!
//! ```text
//! ["auth.view_user", "auth.view_group"]
//! ```
//!
//! or nested, grouped by app and model:
//!
//! ```text
//! { "auth.user": ["view_user", "change_user"],
//!   "auth": { "group": ["view_group"] } }
//! ```
//!
//! Flat identifiers are not grouped by model and land in the
//! [`ModelSlot::Wildcard`] slot of their app.
//!
//! ## Usage
//!
//! ```rust
//! use grouprole_rbac::{merge, ModelSlot, PermissionDeclaration};
//!
//! let decl = PermissionDeclaration::flat(["auth.view_user", "auth.view_group"]);
//! let map = merge([&decl]).unwrap();
//!
//! assert!(map.has_codename("auth", "view_user"));
//! assert_eq!(map.codenames("auth", &ModelSlot::Wildcard).count(), 2);
//! ```
//!
//! Merging is pure: no external permission store is consulted here.
//! Resolution of map entries against a store is the concern of
//! `grouprole-roles`.

pub mod declaration;
pub mod error;
pub mod map;

// Re-export main types for convenience
pub use declaration::{NestedEntry, PermissionDeclaration};
pub use error::DeclarationError;
pub use map::{merge, ModelSlot, PermissionMap};
