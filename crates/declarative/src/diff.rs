//! State comparison
//!
//! Pure functions that compare a desired instance with what a provider
//! observed and decide the single corrective action, if any.

use crate::instance::{Ensure, Instance};
use crate::value::Value;
use serde::Serialize;

/// One attribute whose observed value differs from the desired one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeChange {
    pub attribute: String,
    pub desired: Value,
    /// `None` when the host reports no value at all
    pub observed: Option<Value>,
}

/// The differing attributes of one resource, in schema order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ChangeSet {
    changes: Vec<AttributeChange>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttributeChange> {
        self.changes.iter()
    }

    /// Names of the changed attributes
    pub fn attributes(&self) -> Vec<&str> {
        self.changes.iter().map(|c| c.attribute.as_str()).collect()
    }

    pub fn get(&self, attribute: &str) -> Option<&AttributeChange> {
        self.changes.iter().find(|c| c.attribute == attribute)
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.get(attribute).is_some()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a AttributeChange;
    type IntoIter = std::slice::Iter<'a, AttributeChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

/// Corrective action for an out-of-sync resource
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Action {
    /// Create with the full desired instance
    Create,
    /// Change only these attributes
    Update { changes: ChangeSet },
    Destroy,
}

impl Action {
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update { .. } => "update",
            Self::Destroy => "destroy",
        }
    }
}

/// Outcome of comparing desired and observed state
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    InSync,
    Apply(Action),
}

/// Compare the declared attributes of `desired` with `observed`
///
/// Only attributes set on the desired side are enforced; anything the caller
/// left out is never out of sync. The identity is never compared.
pub fn diff_instances(desired: &Instance, observed: &Instance) -> ChangeSet {
    let changes = desired
        .schema()
        .properties()
        .filter_map(|attr| {
            let want = desired.get(attr.name())?;
            let have = observed.get(attr.name());
            (have != Some(want)).then(|| AttributeChange {
                attribute: attr.name().to_string(),
                desired: want.clone(),
                observed: have.cloned(),
            })
        })
        .collect();
    ChangeSet { changes }
}

/// Decide what, if anything, brings `observed` to `desired`
///
/// `observed` is `None` when the resource does not exist on the host.
pub fn plan(desired: &Instance, observed: Option<&Instance>) -> Disposition {
    let ensure = desired.ensure();
    match observed {
        None if ensure.accepts(Ensure::Absent) => Disposition::InSync,
        None => Disposition::Apply(Action::Create),
        Some(current) if ensure.accepts(Ensure::Present) => {
            let changes = diff_instances(desired, current);
            if changes.is_empty() {
                Disposition::InSync
            } else {
                Disposition::Apply(Action::Update { changes })
            }
        }
        Some(_) => Disposition::Apply(Action::Destroy),
    }
}

/// Counts of planned or applied actions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub additions: usize,
    pub removals: usize,
    pub modifications: usize,
}

impl DiffSummary {
    pub fn from_actions<'a>(actions: impl IntoIterator<Item = &'a Action>) -> Self {
        let mut summary = Self::default();
        for action in actions {
            match action {
                Action::Create => summary.additions += 1,
                Action::Destroy => summary.removals += 1,
                Action::Update { .. } => summary.modifications += 1,
            }
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.removals + self.modifications
    }

    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}
