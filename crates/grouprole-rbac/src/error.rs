//! Error types for permission mapping
//!
//! Declaration shapes are mostly enforced by the type system; the checks
//! that remain are performed at merge time and fail fast with these errors.

use thiserror::Error;

/// Errors raised while merging permission declarations.
///
/// These signal a malformed role declaration and are never recovered from:
/// they surface synchronously when the declaration is composed, not at
/// first use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// A flat permission entry is missing its `app_label.` prefix.
    #[error("permissions should be defined in the format 'app_label.codename' (is {0})")]
    BadFormat(String),

    /// A bare app-label key was given a plain codename list instead of a
    /// model-to-codenames mapping.
    #[error("permissions for app {app_label} must be provided on a per-model basis")]
    PerModelRequired {
        /// The app label whose value had the wrong shape.
        app_label: String,
    },
}
