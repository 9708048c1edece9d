//! `rhsmctl plan` and `rhsmctl apply`
//!
//! Both commands reconcile the manifest against a snapshot of the host.
//! `plan` stops after the dry run; `apply` shows the same plan, asks for
//! confirmation and then runs the batch for real, with retries.

use anyhow::{Context as AnyhowContext, Result, bail};
use declarative::{
    DesiredResource, Outcome, ReconcileReport, ReconcileSummary, Reconciler, SchemaRegistry,
    reconcile_with_retry,
};
use std::sync::Arc;

use super::load_registry;
use crate::cli::{ApplyArgs, PlanArgs, TargetArgs};
use crate::config::Settings;
use crate::display::{display_plan, display_report, print_summary};
use crate::progress::ReconcileBar;
use crate::snapshot::{SnapshotProvider, provider_set};
use crate::{Context, manifest, ui};

/// Desired state and observed host for one invocation
struct Session {
    desired: Vec<DesiredResource>,
    registry: Arc<SchemaRegistry>,
    host: Arc<SnapshotProvider>,
}

impl Session {
    fn open(target: &TargetArgs) -> Result<Self> {
        let desired = manifest::load(&target.manifest)?;
        let registry = load_registry()?;
        let host = Arc::new(SnapshotProvider::load(&target.observed)?);
        log::info!(
            "Reconciling {} declaration(s) from {} against {}",
            desired.len(),
            target.manifest.display(),
            target.observed.display()
        );
        Ok(Self {
            desired,
            registry,
            host,
        })
    }

    fn reconciler(&self, settings: &Settings, dry_run: bool) -> Reconciler {
        let providers = provider_set(&self.host, &self.registry.type_names());
        Reconciler::new(Arc::clone(&self.registry), providers)
            .with_options(settings.reconcile_options(dry_run))
    }
}

fn progress_bar(ctx: &Context, target: &TargetArgs, label: &str) -> ReconcileBar {
    if ctx.quiet || target.json {
        ReconcileBar::hidden()
    } else {
        ReconcileBar::new(label)
    }
}

fn print_json(report: &ReconcileReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    println!("{json}");
    Ok(())
}

/// Turn an unconverged summary into the command's error
fn finish(summary: &ReconcileSummary) -> Result<()> {
    if summary.is_success() {
        return Ok(());
    }
    bail!(
        "{} resource(s) did not converge, {} declaration(s) rejected",
        summary.failed + summary.degraded,
        summary.rejected
    )
}

pub fn plan(ctx: &Context, args: PlanArgs) -> Result<()> {
    let target = &args.target;
    let settings = Settings::load()?.with_overrides(target.jobs, target.timeout, None);
    let session = Session::open(target)?;

    let bar = progress_bar(ctx, target, "Planning");
    let report = session
        .reconciler(&settings, true)
        .reconcile_batch_with_progress(&session.desired, &bar);

    if target.json {
        print_json(&report)?;
    } else {
        display_plan(&report);
        println!();
        ui::info("Dry run - no changes made");
    }

    finish(&report.summary())
}

pub fn apply(ctx: &Context, args: ApplyArgs) -> Result<()> {
    let target = &args.target;
    let settings =
        Settings::load()?.with_overrides(target.jobs, target.timeout, args.retries);
    let session = Session::open(target)?;

    // 1. Plan
    let bar = progress_bar(ctx, target, "Planning");
    let planned = session
        .reconciler(&settings, true)
        .reconcile_batch_with_progress(&session.desired, &bar);
    if !target.json {
        display_plan(&planned);
    }

    if planned
        .resources
        .iter()
        .all(|r| r.outcome == Outcome::InSync)
    {
        if target.json {
            print_json(&planned)?;
        }
        return finish(&planned.summary());
    }

    // 2. Confirm (unless --yes)
    if !args.yes && !confirm_proceed()? {
        ui::warn("Aborted, no changes made");
        return Ok(());
    }

    // 3. Apply
    let bar = progress_bar(ctx, target, "Applying");
    let reconciler = session.reconciler(&settings, false);
    let report = reconcile_with_retry(
        &reconciler,
        &session.desired,
        &settings.retry_policy(),
        &bar,
        &bar,
    );
    if !reconciler.wait_idle(reconciler.options().lock_wait) {
        ui::warn("Some timed-out provider calls are still running; the snapshot may miss their changes");
    }
    session.host.save()?;

    // 4. Report
    let summary = report.summary();
    if target.json {
        print_json(&report)?;
    } else {
        display_report(&report, ctx.verbose > 0);
        print_summary(&summary);
    }

    finish(&summary)
}

/// Confirm with user
fn confirm_proceed() -> Result<bool> {
    use dialoguer::Confirm;

    let confirmed = Confirm::new()
        .with_prompt("Apply these changes?")
        .default(false)
        .interact()?;

    Ok(confirmed)
}
