//! # Declarative
//!
//! A framework for declarative resource reconciliation.
//!
//! Callers describe the state they want; providers report the state the host
//! is in; the reconciler makes the single call that closes the gap.
//!
//! ## Core Concepts
//!
//! - **Schema**: A resource type with typed attributes and one identity attribute
//! - **Instance**: A validated, immutable set of attribute values
//! - **Provider**: Host operations (fetch, create, update, destroy) for a type
//! - **Reconciler**: Runs one fetch-compare-apply cycle per resource
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{
//!     Attribute, DesiredResource, ProviderSet, Reconciler, Schema, SchemaRegistry,
//! };
//! use std::sync::Arc;
//!
//! let mut registry = SchemaRegistry::new();
//! registry.register(
//!     Schema::builder("repo")
//!         .attribute(Attribute::identity("id", "[a-z0-9-]+")?)
//!         .attribute(Attribute::text("url"))
//!         .build()?,
//! )?;
//!
//! let providers = ProviderSet::new().with("repo", Arc::new(MyRepoProvider));
//! let reconciler = Reconciler::new(Arc::new(registry), providers);
//!
//! let report = reconciler.reconcile_batch(&[
//!     DesiredResource::new("repo", "epel").attr("url", "https://example.org/epel"),
//! ]);
//! assert!(report.summary().is_success());
//! ```
//!
//! ## Outcomes
//!
//! Every cycle ends in exactly one [`Outcome`]. `Degraded` means the host
//! state could not be determined or a call did not finish in time; `Failed`
//! means the state was known and the corrective call was refused.

pub mod attribute;
pub mod context;
pub mod diff;
pub mod error;
pub mod instance;
pub mod lock;
pub mod provider;
pub mod reconciler;
pub mod retry;
pub mod schema;
pub mod types;
pub mod value;

// Re-export main types at crate root
pub use attribute::{Attribute, AttributeKind};
pub use context::{NoProgress, ProgressCallback};
pub use diff::{
    Action, AttributeChange, ChangeSet, DiffSummary, Disposition, diff_instances, plan,
};
pub use error::{DesiredStateError, ProviderError, RegistryError, SchemaError, ValidationError};
pub use instance::{DesiredResource, Ensure, EnsureSpec, Instance, RawAttributes};
pub use lock::{IdentityGuard, IdentityLocks};
pub use provider::{Provider, ProviderSet};
pub use reconciler::Reconciler;
pub use retry::{NoCallback, RetryCallback, RetryPolicy, reconcile_with_retry};
pub use schema::{Schema, SchemaBuilder, SchemaRegistry};
pub use types::{
    Outcome, ReconcileOptions, ReconcileReport, ReconcileSummary, Rejection, ResourceReport,
};
pub use value::{Number, Value};
