//! Group domain model
//!
//! The persisted entity a role synchronizes onto. Groups are keyed by name
//! (one per role) and own a set of permission references and a member set;
//! both live behind the backend, the entity itself is a plain handle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted group, created on demand for each role name.
///
/// # Examples
///
/// ```
/// use grouprole_store::Group;
///
/// let group = Group::new("Users");
/// assert_eq!(group.name, "Users");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique group ID.
    pub id: Uuid,

    /// Group name, equal to the role name it was created for.
    pub name: String,

    /// When the group was created.
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Create a new group handle with a fresh ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}
