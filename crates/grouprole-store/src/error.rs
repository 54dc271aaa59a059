//! Error types for store operations

use thiserror::Error;

/// Storage error types.
///
/// These cover failures of the persisted group/permission store itself;
/// unresolvable permissions are not a store error but a domain error of
/// the role layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The named group does not exist in the store.
    #[error("group {0} does not exist")]
    GroupNotFound(String),

    /// The backend failed outside of the modeled cases.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
