//! Error types for the subscription schemas.

use declarative::{RegistryError, SchemaError};
use thiserror::Error;

/// Result type alias for rhsmkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while declaring the built-in schemas.
#[derive(Debug, Error)]
pub enum Error {
    /// A schema declaration is inconsistent
    #[error("invalid {type_name} schema: {source}")]
    Schema {
        /// Resource type being declared
        type_name: &'static str,
        /// Underlying declaration error
        #[source]
        source: SchemaError,
    },

    /// A schema could not be registered
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl Error {
    pub(crate) fn schema(type_name: &'static str) -> impl FnOnce(SchemaError) -> Self {
        move |source| Self::Schema { type_name, source }
    }
}
