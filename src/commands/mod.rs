pub mod check;
pub mod config;
pub mod reconcile;
pub mod schema;

use anyhow::{Context, Result};
use declarative::SchemaRegistry;
use std::sync::Arc;

/// Registry of every built-in resource type
pub fn load_registry() -> Result<Arc<SchemaRegistry>> {
    let registry = rhsmkit::registry().context("Built-in resource schemas are invalid")?;
    Ok(Arc::new(registry))
}
