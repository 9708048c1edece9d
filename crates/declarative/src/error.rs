//! Error types for declarative resource management
//!
//! Errors are split by the phase that produces them, so callers can branch
//! on the kind of failure instead of parsing messages:
//!
//! - [`ValidationError`]: malformed desired or observed state
//! - [`SchemaError`]: an invalid schema declaration
//! - [`RegistryError`]: schema registration and lookup
//! - [`DesiredStateError`]: a desired resource that cannot enter reconciliation
//! - [`ProviderError`]: host-side failures surfaced by a [`crate::Provider`]

use std::time::Duration;
use thiserror::Error;

/// A raw attribute value was rejected by its descriptor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value does not parse as a number
    #[error("{attribute} must be a number, was given {value:?}")]
    NotNumeric { attribute: String, value: String },

    /// Value is not a member of the declared set
    #[error("{attribute} must be one of [{choices}], was given {value:?}", choices = .allowed.join(", "))]
    NotInSet {
        attribute: String,
        value: String,
        allowed: Vec<String>,
    },

    /// Value does not parse as a calendar date
    #[error("{attribute} must be a date, was given {value:?}")]
    NotADate { attribute: String, value: String },

    /// Value is neither true nor false
    #[error("{attribute} must be true or false, was given {value:?}")]
    NotABoolean { attribute: String, value: String },

    /// Identity value does not match the identity pattern
    #[error("{attribute} is not a valid identity, was given {value:?}")]
    InvalidIdentity { attribute: String, value: String },

    /// No value resolved for the identity attribute
    #[error("{type_name} requires a value for {attribute}")]
    MissingIdentity { type_name: String, attribute: String },

    /// The attribute map names the identity with a different value
    #[error("{attribute} is {given:?} in the attributes but the resource is {identity:?}")]
    ConflictingIdentity {
        attribute: String,
        identity: String,
        given: String,
    },

    /// The attribute is not declared by the schema
    #[error("{type_name} has no attribute named {attribute}")]
    UnknownAttribute { type_name: String, attribute: String },

    /// Ensure value is neither present nor absent
    #[error("ensure must be present or absent, was given {0:?}")]
    InvalidEnsure(String),

    /// Ensure was given as an empty list
    #[error("ensure must list at least one acceptable value")]
    EmptyEnsure,
}

/// A schema declaration is inconsistent
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Two attributes share a name
    #[error("{type_name} declares attribute {attribute} more than once")]
    DuplicateAttribute { type_name: String, attribute: String },

    /// No identity attribute declared
    #[error("{0} declares no identity attribute")]
    NoIdentity(String),

    /// More than one identity attribute declared
    #[error("{type_name} declares more than one identity attribute: {first}, {second}")]
    MultipleIdentities {
        type_name: String,
        first: String,
        second: String,
    },

    /// Identity pattern does not compile
    #[error("invalid identity pattern for {attribute}: {source}")]
    InvalidPattern {
        attribute: String,
        #[source]
        source: regex::Error,
    },

    /// Declared default does not pass the attribute's own validation
    #[error("invalid default: {0}")]
    InvalidDefault(#[from] ValidationError),
}

/// Schema registry failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A schema with this type name is already registered
    #[error("resource type {0} is already registered")]
    DuplicateSchema(String),

    /// No schema with this type name
    #[error("unknown resource type {0}")]
    UnknownType(String),
}

/// Why a desired resource was kept out of reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DesiredStateError {
    /// The type name is not registered
    #[error(transparent)]
    UnknownType(#[from] RegistryError),

    /// An attribute failed validation
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The same resource is declared twice in one batch
    #[error("{type_name} {identity} is declared more than once")]
    Duplicate { type_name: String, identity: String },
}

/// Host-side failures reported by a provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Host integration missing (tooling not installed, no provider registered)
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// Host-specific failure
    #[error("provider error: {0}")]
    Host(String),

    /// The call did not return in time
    #[error("provider call timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The provider reported state that fails validation
    #[error("observed state rejected: {0}")]
    Invalid(#[from] ValidationError),
}

impl ProviderError {
    /// Whether the error means the state could not be determined,
    /// as opposed to determined and failed to change.
    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Unavailable(_))
    }
}
