//! Plan and report display

use colored::Colorize;
use declarative::{Action, Outcome, ReconcileReport, ReconcileSummary, Rejection, ResourceReport};
use std::collections::BTreeMap;

use crate::ui;

/// Display the planned changes of a dry-run report
pub fn display_plan(report: &ReconcileReport) {
    display_rejections(&report.rejected);

    let pending: Vec<&ResourceReport> = report
        .resources
        .iter()
        .filter(|r| r.outcome != Outcome::InSync)
        .collect();

    if pending.is_empty() {
        println!();
        println!("  {} No changes needed", "✓".green());
        return;
    }

    let mut by_type: BTreeMap<&str, Vec<&ResourceReport>> = BTreeMap::new();
    for resource in pending {
        by_type.entry(resource.type_name.as_str()).or_default().push(resource);
    }

    println!();
    println!(
        "┌─ {} ─────────────────────────────────────────┐",
        "Subscription Plan".bold()
    );
    println!("│");

    for (type_name, resources) in &by_type {
        let title = match *type_name {
            "pool" => "Entitlement pools",
            "repo" => "Repositories",
            other => other,
        };
        println!("│ {}", title.bold());

        for resource in resources {
            display_row(resource);
        }
        println!("│");
    }

    let diff = report.diff_summary();
    let unknown = report
        .resources
        .iter()
        .filter(|r| r.outcome == Outcome::Degraded)
        .count();
    println!("├─────────────────────────────────────────────────────┤");
    println!(
        "│ Summary: {} to add, {} to change, {} to remove, {} unknown",
        diff.additions.to_string().green(),
        diff.modifications.to_string().yellow(),
        diff.removals.to_string().red(),
        unknown.to_string().dimmed()
    );
    println!("└─────────────────────────────────────────────────────┘");
}

fn display_row(resource: &ResourceReport) {
    let Some(action) = &resource.action else {
        println!(
            "│   {} {:<36} {}",
            "?".yellow(),
            resource.identity,
            resource
                .detail
                .as_deref()
                .unwrap_or("state unknown")
                .dimmed()
        );
        return;
    };

    match action {
        Action::Create => {
            println!(
                "│   {} {:<36} {}",
                "+".green(),
                resource.identity,
                "(will create)".dimmed()
            );
        }
        Action::Destroy => {
            println!(
                "│   {} {:<36} {}",
                "-".red(),
                resource.identity,
                "(will remove)".dimmed()
            );
        }
        Action::Update { changes } => {
            println!("│   {} {}", "~".yellow(), resource.identity);
            for change in changes {
                let observed = change
                    .observed
                    .as_ref()
                    .map_or_else(|| "(unset)".to_string(), ToString::to_string);
                println!(
                    "│       {}: {} → {}",
                    change.attribute,
                    observed.dimmed(),
                    change.desired
                );
            }
        }
    }
}

/// Display declarations rejected before reconciliation
pub fn display_rejections(rejected: &[Rejection]) {
    if rejected.is_empty() {
        return;
    }

    ui::section(&format!("Rejected ({})", rejected.len()));
    for rejection in rejected {
        println!(
            "  {} {} {}: {}",
            "✗".red(),
            rejection.type_name,
            rejection.identity,
            rejection.error
        );
    }
}

/// Display the outcome of each resource; in-sync ones only when `verbose`
pub fn display_report(report: &ReconcileReport, verbose: bool) {
    let changed: Vec<&ResourceReport> = report
        .resources
        .iter()
        .filter(|r| verbose || r.outcome != Outcome::InSync)
        .collect();

    if !changed.is_empty() {
        ui::section("Results");
    }
    for resource in changed {
        let verb = resource.action.as_ref().map_or("", Action::verb);
        let detail = resource
            .detail
            .as_deref()
            .map(|d| format!(" ({d})"))
            .unwrap_or_default();
        println!(
            "  {} {:<8} {} {}{}",
            ui::outcome_symbol(resource.outcome),
            verb,
            resource.type_name,
            resource.identity,
            detail.dimmed()
        );
    }

    display_rejections(&report.rejected);
}

/// Print final summary
pub fn print_summary(summary: &ReconcileSummary) {
    println!();
    if summary.is_success() {
        println!("  {} Subscriptions converged", "✓".green().bold());
    } else {
        println!("  {} Subscriptions applied with errors", "⚠".yellow().bold());
    }

    if summary.in_sync > 0 {
        println!("    • {} resources already in sync", summary.in_sync);
    }
    if summary.created > 0 {
        println!("    • {} resources created", summary.created);
    }
    if summary.updated > 0 {
        println!("    • {} resources updated", summary.updated);
    }
    if summary.destroyed > 0 {
        println!("    • {} resources removed", summary.destroyed);
    }
    if summary.skipped > 0 {
        println!("    • {} resources skipped", summary.skipped);
    }
    if summary.degraded > 0 {
        println!("    • {} {} degraded", summary.degraded, "resources".yellow());
    }
    if summary.failed > 0 {
        println!("    • {} {} failed", summary.failed, "resources".red());
    }
    if summary.rejected > 0 {
        println!("    • {} {} rejected", summary.rejected, "declarations".red());
    }
}
