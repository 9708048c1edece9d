//! `rhsmctl check` - validate a manifest

use anyhow::{Result, bail};
use declarative::{ProviderSet, Reconciler};
use std::path::Path;

use super::load_registry;
use crate::display::display_rejections;
use crate::{Context, manifest, ui};

pub fn run(ctx: &Context, path: &Path) -> Result<()> {
    let desired = manifest::load(path)?;
    let reconciler = Reconciler::new(load_registry()?, ProviderSet::new());
    let (instances, rejected) = reconciler.prepare(&desired);

    display_rejections(&rejected);
    if !rejected.is_empty() {
        bail!(
            "{} of {} declaration(s) rejected",
            rejected.len(),
            desired.len()
        );
    }

    if !ctx.quiet {
        ui::success(&format!(
            "{} resource(s) valid in {}",
            instances.len(),
            path.display()
        ));
    }
    Ok(())
}
