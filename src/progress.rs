//! Progress indicators for reconciliation

use colored::Colorize;
use declarative::{ProgressCallback, ReconcileSummary, ResourceReport, RetryCallback};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::ui;

/// Progress bar fed by the reconciler
pub struct ReconcileBar {
    pb: ProgressBar,
}

impl ReconcileBar {
    pub fn new(label: &str) -> Self {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {prefix} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_prefix(label.to_string());
        Self { pb }
    }

    /// A bar that never draws or prints (quiet or JSON output)
    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
        }
    }
}

impl ProgressCallback for ReconcileBar {
    fn on_batch_start(&self, count: usize) {
        self.pb.reset();
        self.pb.set_length(count as u64);
        self.pb.enable_steady_tick(Duration::from_millis(120));
    }

    fn on_resource_start(&self, type_name: &str, identity: &str) {
        self.pb
            .set_message(format!("{type_name} {}", ui::truncate(identity, 24)));
    }

    fn on_resource_complete(&self, report: &ResourceReport) {
        if !report.outcome.is_success() && !self.pb.is_hidden() {
            self.pb.suspend(|| {
                println!(
                    "  {} {} {} ({})",
                    ui::outcome_symbol(report.outcome),
                    report.type_name,
                    report.identity,
                    report.detail.as_deref().unwrap_or(report.outcome.label())
                );
            });
        }
        self.pb.inc(1);
    }

    fn on_batch_complete(&self, _summary: &ReconcileSummary) {
        self.pb.finish_and_clear();
    }
}

impl RetryCallback for ReconcileBar {
    fn on_retry(&self, attempt: u32, max_attempts: u32, pending: &[&ResourceReport], delay: Duration) {
        if self.pb.is_hidden() {
            return;
        }
        self.pb.suspend(|| {
            println!(
                "  {} Attempt {}/{} left {} resource(s) unconverged. Retrying in {:.1}s...",
                "↻".yellow(),
                attempt,
                max_attempts,
                pending.len(),
                delay.as_secs_f64()
            );
        });
    }
}
