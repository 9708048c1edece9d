//! Provider boundary
//!
//! Providers are the only way the reconciler reaches the host. The core never
//! talks to the operating system itself; it is handed one provider per
//! resource type and calls through this trait.

use crate::diff::ChangeSet;
use crate::error::ProviderError;
use crate::instance::Instance;
use crate::schema::Schema;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Host operations for one or more resource types
///
/// Calls may block on subprocess or network I/O. The reconciler runs each
/// call under a timeout, so implementations must be `Send + Sync` and should
/// not hold locks across calls for different identities.
pub trait Provider: Send + Sync {
    /// Observed state of `identity`, or `None` when it does not exist
    ///
    /// Observed instances are built with [`Instance::build`] so they pass the
    /// same validation as desired state.
    fn fetch(&self, schema: &Arc<Schema>, identity: &str) -> Result<Option<Instance>, ProviderError>;

    /// Create the resource with every desired attribute
    fn create(&self, schema: &Schema, desired: &Instance) -> Result<(), ProviderError>;

    /// Change only the listed attributes
    fn update(&self, schema: &Schema, identity: &str, changes: &ChangeSet) -> Result<(), ProviderError>;

    /// Remove the resource
    fn destroy(&self, schema: &Schema, identity: &str) -> Result<(), ProviderError>;
}

/// Providers keyed by resource type name
#[derive(Clone, Default)]
pub struct ProviderSet {
    providers: BTreeMap<String, Arc<dyn Provider>>,
}

impl ProviderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` for `type_name`, replacing any previous one
    pub fn insert(&mut self, type_name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(type_name.into(), provider);
    }

    /// Builder form of [`ProviderSet::insert`]
    pub fn with(mut self, type_name: impl Into<String>, provider: Arc<dyn Provider>) -> Self {
        self.insert(type_name, provider);
        self
    }

    /// Provider for a type; a missing one means the host integration is unavailable
    pub fn get(&self, type_name: &str) -> Result<Arc<dyn Provider>, ProviderError> {
        self.providers.get(type_name).cloned().ok_or_else(|| {
            ProviderError::Unavailable(format!("no provider registered for {type_name}"))
        })
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.providers.contains_key(type_name)
    }
}

impl fmt::Debug for ProviderSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSet")
            .field("types", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}
