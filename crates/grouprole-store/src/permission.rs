//! Concrete permission references
//!
//! A [`PermissionRef`] is a permission that actually exists in the store,
//! identified by its natural `(app_label, model, codename)` triple. The
//! role layer resolves canonical map entries into these before touching a
//! group.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Natural key of a permission persisted in the store.
///
/// # Examples
///
/// ```
/// use grouprole_store::PermissionRef;
///
/// let perm = PermissionRef::new("auth", "user", "view_user");
/// assert_eq!(perm.dotted(), "auth.view_user");
/// assert_eq!(perm.to_string(), "auth.user.view_user");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PermissionRef {
    /// Application the permission belongs to.
    pub app_label: String,

    /// Model the permission is defined on.
    pub model: String,

    /// Permission codename within the app.
    pub codename: String,
}

impl PermissionRef {
    /// Create a permission reference from its natural triple.
    pub fn new(
        app_label: impl Into<String>,
        model: impl Into<String>,
        codename: impl Into<String>,
    ) -> Self {
        Self {
            app_label: app_label.into(),
            model: model.into(),
            codename: codename.into(),
        }
    }

    /// The dotted `app_label.codename` identifier used in declarations
    /// and diagnostics.
    pub fn dotted(&self) -> String {
        format!("{}.{}", self.app_label, self.codename)
    }
}

impl fmt::Display for PermissionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.app_label, self.model, self.codename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_identifier() {
        let perm = PermissionRef::new("auth", "group", "view_group");
        assert_eq!(perm.dotted(), "auth.view_group");
    }

    #[test]
    fn test_serde_round_trip() {
        let perm = PermissionRef::new("auth", "user", "delete_user");
        let json = serde_json::to_string(&perm).unwrap();
        assert_eq!(serde_json::from_str::<PermissionRef>(&json).unwrap(), perm);
    }
}
