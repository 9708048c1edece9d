//! Core types for reconciliation results and options

use crate::diff::{Action, DiffSummary};
use crate::error::DesiredStateError;
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Terminal result of one reconciliation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Observed state already matches
    InSync,
    /// The corrective action succeeded
    Applied,
    /// Out of sync, but the action was not run (dry run)
    Skipped,
    /// The state was determined and the corrective action failed
    Failed,
    /// The state could not be determined, or the call did not finish
    Degraded,
}

impl Outcome {
    /// Check if the outcome represents success (nothing left to do or planned)
    pub fn is_success(&self) -> bool {
        matches!(self, Self::InSync | Self::Applied | Self::Skipped)
    }

    /// Whether a caller-side retry might help
    pub fn needs_retry(&self) -> bool {
        matches!(self, Self::Failed | Self::Degraded)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::InSync => "in sync",
            Self::Applied => "applied",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
            Self::Degraded => "degraded",
        }
    }
}

/// Report for one resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceReport {
    pub type_name: String,
    pub identity: String,
    pub outcome: Outcome,
    /// Action planned or taken, if the resource was out of sync
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ResourceReport {
    pub fn new(type_name: impl Into<String>, identity: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            type_name: type_name.into(),
            identity: identity.into(),
            outcome,
            action: None,
            detail: None,
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// A desired resource that never entered reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub type_name: String,
    pub identity: String,
    #[serde(serialize_with = "serialize_display")]
    pub error: DesiredStateError,
}

fn serialize_display<S: Serializer>(error: &DesiredStateError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Everything a batch produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcileReport {
    /// One entry per resource that entered reconciliation, in input order
    pub resources: Vec<ResourceReport>,
    /// Declarations rejected before any provider call
    pub rejected: Vec<Rejection>,
}

impl ReconcileReport {
    pub fn summary(&self) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();
        for report in &self.resources {
            summary.add_report(report);
        }
        summary.rejected = self.rejected.len();
        summary
    }

    /// Find the report for one resource
    pub fn get(&self, type_name: &str, identity: &str) -> Option<&ResourceReport> {
        self.resources
            .iter()
            .find(|r| r.type_name == type_name && r.identity == identity)
    }

    /// Reports whose outcome a retry might change
    pub fn needing_retry(&self) -> impl Iterator<Item = &ResourceReport> {
        self.resources.iter().filter(|r| r.outcome.needs_retry())
    }

    /// Actions of every out-of-sync resource
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.resources.iter().filter_map(|r| r.action.as_ref())
    }

    pub fn diff_summary(&self) -> DiffSummary {
        DiffSummary::from_actions(self.actions())
    }
}

/// Summary of reconciliation results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub in_sync: usize,
    pub created: usize,
    pub updated: usize,
    pub destroyed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub degraded: usize,
    pub rejected: usize,
}

impl ReconcileSummary {
    /// Total number of actual changes made
    pub fn total_changes(&self) -> usize {
        self.created + self.updated + self.destroyed
    }

    /// Check if every resource converged or was planned, and none were rejected
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.degraded == 0 && self.rejected == 0
    }

    /// Total number of resources processed
    pub fn total(&self) -> usize {
        self.in_sync
            + self.total_changes()
            + self.skipped
            + self.failed
            + self.degraded
            + self.rejected
    }

    /// Merge another summary into this one
    pub fn merge(&mut self, other: &ReconcileSummary) {
        self.in_sync += other.in_sync;
        self.created += other.created;
        self.updated += other.updated;
        self.destroyed += other.destroyed;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.degraded += other.degraded;
        self.rejected += other.rejected;
    }

    /// Add a report to the summary
    pub fn add_report(&mut self, report: &ResourceReport) {
        match (report.outcome, &report.action) {
            (Outcome::InSync, _) => self.in_sync += 1,
            (Outcome::Applied, Some(Action::Create)) => self.created += 1,
            (Outcome::Applied, Some(Action::Update { .. })) => self.updated += 1,
            (Outcome::Applied, Some(Action::Destroy)) => self.destroyed += 1,
            (Outcome::Applied, None) => self.in_sync += 1,
            (Outcome::Skipped, _) => self.skipped += 1,
            (Outcome::Failed, _) => self.failed += 1,
            (Outcome::Degraded, _) => self.degraded += 1,
        }
    }
}

/// Options for reconciliation
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Plan only; never call create, update or destroy
    pub dry_run: bool,
    /// Number of resources reconciled concurrently
    pub jobs: usize,
    /// Deadline for each provider call; `None` waits indefinitely
    pub call_timeout: Option<Duration>,
    /// How long a cycle waits for a running cycle of the same resource
    pub lock_wait: Duration,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            jobs: 4,
            call_timeout: Some(Duration::from_secs(30)),
            lock_wait: Duration::from_secs(60),
        }
    }
}
