//! # rhsmkit
//!
//! Resource schemas for Red Hat subscription management.
//!
//! This crate declares the resource types a subscribed system manages:
//! - [`pool`]: entitlement pools the system draws subscriptions from
//! - [`repo`]: repositories enabled through those subscriptions
//!
//! Both are plain [`declarative::Schema`]s; the reconciler treats them like
//! any other type.
//!
//! ## Example
//!
//! ```no_run
//! let registry = rhsmkit::registry().expect("built-in schemas are valid");
//! let pool = registry.lookup("pool").expect("pool is registered");
//! for attr in pool.attributes() {
//!     println!("{}: {}", attr.name(), attr.description());
//! }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod pool;
pub mod repo;

pub use error::{Error, Result};

use declarative::SchemaRegistry;

/// Build a registry holding every built-in schema.
pub fn registry() -> Result<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    registry.register(pool::schema()?)?;
    registry.register(repo::schema()?)?;
    Ok(registry)
}
