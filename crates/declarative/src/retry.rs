//! Retry of unconverged resources with exponential backoff
//!
//! The reconciler itself never retries. Callers that want another attempt
//! at `Failed` or `Degraded` resources wrap the batch in
//! [`reconcile_with_retry`], which re-runs only those resources.

use crate::context::ProgressCallback;
use crate::instance::DesiredResource;
use crate::reconciler::Reconciler;
use crate::types::{ReconcileReport, ResourceReport};
use std::thread;
use std::time::Duration;

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per resource, including the first
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_factor: f64,
    /// Maximum delay between retries
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            backoff_factor: 2.0,
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            ..Default::default()
        }
    }

    /// Delay after the given failed attempt (0-indexed)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let delay = self.base_delay.as_secs_f64() * self.backoff_factor.powi(exponent);
        Duration::from_secs_f64(delay.min(self.max_delay.as_secs_f64()))
    }

    /// A policy that runs each resource once
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }
}

/// Notified before each retry round
pub trait RetryCallback {
    /// `attempt` is the 1-indexed attempt that left `pending` unconverged
    fn on_retry(
        &self,
        attempt: u32,
        max_attempts: u32,
        pending: &[&ResourceReport],
        delay: Duration,
    );
}

/// No-op callback
pub struct NoCallback;

impl RetryCallback for NoCallback {
    fn on_retry(&self, _: u32, _: u32, _: &[&ResourceReport], _: Duration) {}
}

/// Reconcile a batch, re-running `Failed` and `Degraded` resources
///
/// Validation happens once; rejected declarations are never retried. The
/// returned report holds the last outcome of every resource in input order.
pub fn reconcile_with_retry<P: ProgressCallback, C: RetryCallback + ?Sized>(
    reconciler: &Reconciler,
    desired: &[DesiredResource],
    policy: &RetryPolicy,
    progress: &P,
    callback: &C,
) -> ReconcileReport {
    let (instances, rejected) = reconciler.prepare(desired);

    progress.on_batch_start(instances.len());
    let mut resources = reconciler.run_cycles(&instances, progress);

    for attempt in 0..policy.max_attempts.saturating_sub(1) {
        let pending: Vec<usize> = resources
            .iter()
            .enumerate()
            .filter(|(_, report)| report.outcome.needs_retry())
            .map(|(i, _)| i)
            .collect();
        if pending.is_empty() {
            break;
        }

        let delay = policy.delay_for_attempt(attempt);
        let reports: Vec<&ResourceReport> = pending.iter().map(|&i| &resources[i]).collect();
        log::info!(
            "Attempt {}/{} left {} resource(s) unconverged, retrying in {:?}",
            attempt + 1,
            policy.max_attempts,
            reports.len(),
            delay
        );
        callback.on_retry(attempt + 1, policy.max_attempts, &reports, delay);
        thread::sleep(delay);

        let retry: Vec<_> = pending.iter().map(|&i| instances[i].clone()).collect();
        progress.on_batch_start(retry.len());
        let again = reconciler.run_cycles(&retry, progress);
        for (i, report) in pending.into_iter().zip(again) {
            resources[i] = report;
        }
    }

    let report = ReconcileReport {
        resources,
        rejected,
    };
    progress.on_batch_complete(&report.summary());
    report
}
