//! Progress callbacks
//!
//! These traits let the reconciler report progress without depending on a
//! particular UI. Cycles run concurrently, so callbacks take `&self` and must
//! be `Sync`.

use crate::types::{ReconcileSummary, ResourceReport};

/// Progress callback for reconciliation
pub trait ProgressCallback: Sync {
    /// Called once the batch is validated, with the number of cycles to run
    fn on_batch_start(&self, count: usize);

    /// Called when a cycle starts
    fn on_resource_start(&self, type_name: &str, identity: &str);

    /// Called when a cycle reaches its outcome
    fn on_resource_complete(&self, report: &ResourceReport);

    /// Called after every cycle has finished
    fn on_batch_complete(&self, summary: &ReconcileSummary);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_batch_start(&self, _count: usize) {}
    fn on_resource_start(&self, _type_name: &str, _identity: &str) {}
    fn on_resource_complete(&self, _report: &ResourceReport) {}
    fn on_batch_complete(&self, _summary: &ReconcileSummary) {}
}
