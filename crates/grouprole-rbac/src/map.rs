//! # Canonical permission map
//!
//! Core merge algorithm turning heterogeneous permission declarations into
//! one canonical nested structure: `app_label -> model slot -> codenames`.
//! Merging is pure set union, so it is associative and commutative in
//! value; only the error reported for a malformed declaration depends on
//! argument order (the first invalid declaration wins).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::declaration::{NestedEntry, PermissionDeclaration};
use crate::error::DeclarationError;

/// The model grouping of a codename within an app.
///
/// Flat `app_label.codename` declarations carry no model information and
/// land in the [`ModelSlot::Wildcard`] slot; nested declarations name their
/// model explicitly.
///
/// # Examples
///
/// ```
/// use grouprole_rbac::ModelSlot;
///
/// assert_eq!(ModelSlot::Wildcard.to_string(), "*");
/// assert_eq!(ModelSlot::model("user").to_string(), "user");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModelSlot {
    /// Codename not grouped by a specific model.
    Wildcard,

    /// Codename scoped to a named model.
    Model(String),
}

impl ModelSlot {
    /// Model slot for a named model.
    pub fn model(name: impl Into<String>) -> Self {
        Self::Model(name.into())
    }

    /// The model name, if this slot is model-scoped.
    pub fn model_name(&self) -> Option<&str> {
        match self {
            Self::Wildcard => None,
            Self::Model(name) => Some(name),
        }
    }

    /// Whether this is the wildcard slot.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }
}

impl fmt::Display for ModelSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard => f.write_str("*"),
            Self::Model(name) => f.write_str(name),
        }
    }
}

/// Canonical permission map: `app_label -> model slot -> set of codenames`.
///
/// Keys are unique and set membership is idempotent under union, so the
/// only observable state is which codenames are present where.
///
/// # Examples
///
/// ```
/// use grouprole_rbac::{merge, ModelSlot, PermissionDeclaration};
///
/// let decl = PermissionDeclaration::flat(["auth.view_user", "myapp.view_mymodel"]);
/// let map = merge([&decl]).unwrap();
///
/// assert_eq!(map.app_count(), 2);
/// assert!(map.has_codename("auth", "view_user"));
/// assert!(!map.has_codename("auth", "view_mymodel"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionMap {
    apps: BTreeMap<String, BTreeMap<ModelSlot, BTreeSet<String>>>,
}

impl PermissionMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Union one declaration into this map.
    ///
    /// Empty declarations are skipped. Shape violations fail with a
    /// [`DeclarationError`] and leave already-merged entries in place; a
    /// caller that needs all-or-nothing should merge into a fresh map.
    pub fn merge_declaration(
        &mut self,
        declaration: &PermissionDeclaration,
    ) -> Result<(), DeclarationError> {
        if declaration.is_empty() {
            return Ok(());
        }

        match declaration {
            PermissionDeclaration::Nested(entries) => {
                for (label, entry) in entries {
                    self.merge_nested_entry(label, entry)?;
                }
            }
            PermissionDeclaration::Flat(perms) => {
                for perm in perms {
                    let (app_label, codename) = perm
                        .split_once('.')
                        .ok_or_else(|| DeclarationError::BadFormat(perm.clone()))?;
                    self.insert(app_label, ModelSlot::Wildcard, codename);
                }
            }
        }

        Ok(())
    }

    fn merge_nested_entry(
        &mut self,
        label: &str,
        entry: &NestedEntry,
    ) -> Result<(), DeclarationError> {
        match label.split_once('.') {
            // "app_label.model" keys carry a plain codename list.
            Some((app_label, model)) => {
                let codenames = match entry {
                    NestedEntry::Codenames(codenames) => codenames.iter(),
                    // A per-model map under a dotted key would nest models
                    // twice; flatten is not meaningful, reject the shape.
                    NestedEntry::PerModel(_) => {
                        return Err(DeclarationError::PerModelRequired {
                            app_label: app_label.to_string(),
                        })
                    }
                };
                for codename in codenames {
                    self.insert(app_label, ModelSlot::model(model), codename);
                }
            }
            // Bare app-label keys must group codenames per model.
            None => match entry {
                NestedEntry::PerModel(models) => {
                    for (model, codenames) in models {
                        for codename in codenames {
                            self.insert(label, ModelSlot::model(model), codename);
                        }
                    }
                }
                NestedEntry::Codenames(_) => {
                    return Err(DeclarationError::PerModelRequired {
                        app_label: label.to_string(),
                    })
                }
            },
        }

        Ok(())
    }

    /// Union another canonical map into this one.
    pub fn union(&mut self, other: &PermissionMap) {
        for (app_label, slots) in &other.apps {
            for (slot, codenames) in slots {
                self.apps
                    .entry(app_label.clone())
                    .or_default()
                    .entry(slot.clone())
                    .or_default()
                    .extend(codenames.iter().cloned());
            }
        }
    }

    fn insert(&mut self, app_label: &str, slot: ModelSlot, codename: &str) {
        self.apps
            .entry(app_label.to_string())
            .or_default()
            .entry(slot)
            .or_default()
            .insert(codename.to_string());
    }

    /// Whether no codename is mapped at all.
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Number of distinct app labels.
    pub fn app_count(&self) -> usize {
        self.apps.len()
    }

    /// Total number of mapped codenames, counted per slot.
    pub fn len(&self) -> usize {
        self.apps
            .values()
            .flat_map(|slots| slots.values())
            .map(|codenames| codenames.len())
            .sum()
    }

    /// Iterate over all `(app_label, slot, codename)` entries in
    /// deterministic order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ModelSlot, &str)> {
        self.apps.iter().flat_map(|(app_label, slots)| {
            slots.iter().flat_map(move |(slot, codenames)| {
                codenames
                    .iter()
                    .map(move |codename| (app_label.as_str(), slot, codename.as_str()))
            })
        })
    }

    /// The model slots mapped for an app, if any.
    pub fn app(&self, app_label: &str) -> Option<&BTreeMap<ModelSlot, BTreeSet<String>>> {
        self.apps.get(app_label)
    }

    /// Iterate over the codenames of one `(app_label, slot)` cell.
    pub fn codenames<'a>(
        &'a self,
        app_label: &str,
        slot: &ModelSlot,
    ) -> impl Iterator<Item = &'a str> {
        self.apps
            .get(app_label)
            .and_then(|slots| slots.get(slot))
            .into_iter()
            .flat_map(|codenames| codenames.iter().map(String::as_str))
    }

    /// Whether `codename` appears under `app_label` in any slot, wildcard
    /// or model-scoped.
    pub fn has_codename(&self, app_label: &str, codename: &str) -> bool {
        self.apps
            .get(app_label)
            .map(|slots| slots.values().any(|codenames| codenames.contains(codename)))
            .unwrap_or(false)
    }
}

/// Merge declarations into one canonical permission map.
///
/// Later declarations are unioned on top of earlier ones; empty
/// declarations are skipped. The first malformed declaration encountered
/// aborts the merge.
///
/// # Examples
///
/// ```
/// use grouprole_rbac::{merge, PermissionDeclaration};
///
/// let base = PermissionDeclaration::flat(["auth.view_user"]);
/// let extra = PermissionDeclaration::flat(["auth.add_user"]);
///
/// let map = merge([&base, &extra]).unwrap();
/// assert_eq!(map.len(), 2);
///
/// // Merging nothing yields an empty map.
/// let none: [&PermissionDeclaration; 0] = [];
/// assert!(merge(none).unwrap().is_empty());
/// ```
pub fn merge<'a, I>(declarations: I) -> Result<PermissionMap, DeclarationError>
where
    I: IntoIterator<Item = &'a PermissionDeclaration>,
{
    let mut map = PermissionMap::new();
    for declaration in declarations {
        map.merge_declaration(declaration)?;
    }
    Ok(map)
}
