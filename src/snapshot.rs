//! JSON snapshot acting as the observed host
//!
//! The snapshot maps `type -> identity -> attribute -> raw value`. It stands in
//! for the subscription-manager integration: `plan` reads it, `apply` mutates
//! it in memory and writes it back.

use anyhow::{Context, Result};
use declarative::{ChangeSet, EnsureSpec, Instance, Provider, ProviderError, RawAttributes, Schema};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Observed resources keyed by type, then identity
pub type Snapshot = BTreeMap<String, BTreeMap<String, RawAttributes>>;

/// Provider backed by a snapshot file
#[derive(Debug, Default)]
pub struct SnapshotProvider {
    path: Option<PathBuf>,
    state: Mutex<Snapshot>,
}

impl SnapshotProvider {
    /// Load a snapshot; a missing file is an empty host
    pub fn load(path: &Path) -> Result<Self> {
        let state = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Could not read snapshot: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid snapshot format: {}", path.display()))?
        } else {
            log::debug!("No snapshot at {}, starting empty", path.display());
            Snapshot::new()
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            state: Mutex::new(state),
        })
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            path: None,
            state: Mutex::new(snapshot),
        }
    }

    fn state(&self) -> MutexGuard<'_, Snapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current observed state
    pub fn snapshot(&self) -> Snapshot {
        self.state().clone()
    }

    /// Write the current state back to the file it was loaded from
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&*self.state())?;
        fs::write(path, content + "\n")
            .with_context(|| format!("Could not write snapshot: {}", path.display()))?;
        log::debug!("Saved snapshot to {}", path.display());
        Ok(())
    }
}

/// Register one shared snapshot provider for every known type
pub fn provider_set(
    provider: &Arc<SnapshotProvider>,
    types: &[&str],
) -> declarative::ProviderSet {
    types.iter().fold(declarative::ProviderSet::new(), |set, type_name| {
        let provider: Arc<dyn Provider> = provider.clone();
        set.with(*type_name, provider)
    })
}

impl Provider for SnapshotProvider {
    fn fetch(&self, schema: &Arc<Schema>, identity: &str) -> Result<Option<Instance>, ProviderError> {
        let state = self.state();
        let Some(raw) = state
            .get(schema.type_name())
            .and_then(|resources| resources.get(identity))
        else {
            return Ok(None);
        };

        let mut raw = raw.clone();
        raw.entry(schema.identity().name().to_string())
            .or_insert_with(|| identity.to_string());
        Ok(Some(Instance::build(schema, &raw, EnsureSpec::default())?))
    }

    fn create(&self, schema: &Schema, desired: &Instance) -> Result<(), ProviderError> {
        self.state()
            .entry(schema.type_name().to_string())
            .or_default()
            .insert(desired.identity().to_string(), desired.to_raw());
        Ok(())
    }

    fn update(&self, schema: &Schema, identity: &str, changes: &ChangeSet) -> Result<(), ProviderError> {
        let mut state = self.state();
        let raw = state
            .get_mut(schema.type_name())
            .and_then(|resources| resources.get_mut(identity))
            .ok_or_else(|| {
                ProviderError::Host(format!("{} {identity} vanished before update", schema.type_name()))
            })?;
        for change in changes {
            raw.insert(change.attribute.clone(), change.desired.to_string());
        }
        Ok(())
    }

    fn destroy(&self, schema: &Schema, identity: &str) -> Result<(), ProviderError> {
        let mut state = self.state();
        let removed = state
            .get_mut(schema.type_name())
            .and_then(|resources| resources.remove(identity));
        if removed.is_none() {
            return Err(ProviderError::Host(format!(
                "{} {identity} vanished before destroy",
                schema.type_name()
            )));
        }
        if state.get(schema.type_name()).is_some_and(BTreeMap::is_empty) {
            state.remove(schema.type_name());
        }
        Ok(())
    }
}
