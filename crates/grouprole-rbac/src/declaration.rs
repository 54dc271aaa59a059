//! Permission declaration shapes
//!
//! Roles author their permissions in one of two forms: a flat list of
//! dotted `app_label.codename` identifiers, or a nested mapping grouped by
//! app and model. Both forms deserialize from the role manifest format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A raw permission declaration, as authored on a role.
///
/// Later declarations merged on top of earlier ones are unioned; an empty
/// declaration is a no-op.
///
/// # Examples
///
/// ```
/// use grouprole_rbac::PermissionDeclaration;
///
/// let flat = PermissionDeclaration::flat(["auth.view_user"]);
/// assert!(!flat.is_empty());
///
/// let empty = PermissionDeclaration::flat::<[&str; 0], &str>([]);
/// assert!(empty.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissionDeclaration {
    /// A sequence of dotted `app_label.codename` identifiers.
    ///
    /// Codenames declared this way are not grouped by model and land in
    /// the wildcard slot of their app.
    Flat(Vec<String>),

    /// A mapping keyed by `app_label` or `app_label.model`.
    ///
    /// Values under an `app_label.model` key are codename lists; values
    /// under a bare `app_label` key must group codenames per model.
    Nested(BTreeMap<String, NestedEntry>),
}

/// The value side of a nested declaration entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NestedEntry {
    /// Codenames for the model named by an `app_label.model` key.
    Codenames(Vec<String>),

    /// Model-to-codenames mapping for a bare `app_label` key.
    PerModel(BTreeMap<String, Vec<String>>),
}

impl PermissionDeclaration {
    /// Build a flat declaration from dotted identifiers.
    ///
    /// # Examples
    ///
    /// ```
    /// use grouprole_rbac::PermissionDeclaration;
    ///
    /// let decl = PermissionDeclaration::flat(["auth.view_user", "auth.view_group"]);
    /// ```
    pub fn flat<I, S>(perms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Flat(perms.into_iter().map(Into::into).collect())
    }

    /// Build a nested declaration from key/entry pairs.
    ///
    /// Keys are `app_label` or `app_label.model`, exactly as in the
    /// manifest format.
    pub fn nested<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, NestedEntry)>,
        S: Into<String>,
    {
        Self::Nested(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Whether this declaration contributes nothing to a merge.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Flat(perms) => perms.is_empty(),
            Self::Nested(entries) => entries.is_empty(),
        }
    }
}

impl NestedEntry {
    /// Codename-list entry, for `app_label.model` keys.
    pub fn codenames<I, S>(codenames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Codenames(codenames.into_iter().map(Into::into).collect())
    }

    /// Per-model entry, for bare `app_label` keys.
    pub fn per_model<I, S, C, P>(models: I) -> Self
    where
        I: IntoIterator<Item = (S, C)>,
        S: Into<String>,
        C: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self::PerModel(
            models
                .into_iter()
                .map(|(model, perms)| {
                    (
                        model.into(),
                        perms.into_iter().map(Into::into).collect(),
                    )
                })
                .collect(),
        )
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionDeclaration {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::flat(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_from_json() {
        let decl: PermissionDeclaration =
            serde_json::from_str(r#"["auth.view_user", "auth.view_group"]"#).unwrap();
        assert_eq!(
            decl,
            PermissionDeclaration::flat(["auth.view_user", "auth.view_group"])
        );
    }

    #[test]
    fn test_nested_from_json() {
        let decl: PermissionDeclaration = serde_json::from_str(
            r#"{
                "auth.user": ["view_user", "change_user"],
                "auth": {"group": ["view_group"]}
            }"#,
        )
        .unwrap();
        assert_eq!(
            decl,
            PermissionDeclaration::nested([
                ("auth.user", NestedEntry::codenames(["view_user", "change_user"])),
                ("auth", NestedEntry::per_model([("group", ["view_group"])])),
            ])
        );
    }

    #[test]
    fn test_is_empty() {
        assert!(PermissionDeclaration::Flat(vec![]).is_empty());
        assert!(PermissionDeclaration::Nested(BTreeMap::new()).is_empty());
        assert!(!PermissionDeclaration::flat(["auth.view_user"]).is_empty());
    }
}
