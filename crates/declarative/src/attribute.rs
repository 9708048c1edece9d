//! Attribute descriptors
//!
//! An [`Attribute`] names one field of a resource type and knows how to turn
//! raw input into a typed [`Value`]. Validation is pure: the same input always
//! yields the same result and nothing outside the descriptor is touched.

use crate::error::{SchemaError, ValidationError};
use crate::value::{Number, Value, parse_bool, parse_date};
use regex::Regex;

/// Semantic kind of an attribute
#[derive(Debug, Clone)]
pub enum AttributeKind {
    /// Free text, always accepted
    Text,
    /// One of a fixed, case-sensitive set of values
    Choice(Vec<String>),
    Numeric,
    Boolean,
    Date,
    /// The value that names an instance; must fully match the pattern
    Identity(Regex),
}

impl AttributeKind {
    /// Short label for display
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Choice(_) => "enum",
            Self::Numeric => "numeric",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Identity(_) => "identity",
        }
    }
}

/// Descriptor for one named field of a resource schema
#[derive(Debug, Clone)]
pub struct Attribute {
    name: String,
    kind: AttributeKind,
    description: String,
    default: Option<Value>,
}

impl Attribute {
    fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: String::new(),
            default: None,
        }
    }

    /// Free-text attribute
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Text)
    }

    /// Attribute that must parse as a number
    pub fn numeric(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Numeric)
    }

    /// Attribute that must be true or false
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Boolean)
    }

    /// Attribute that must parse as a calendar date
    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Date)
    }

    /// Attribute restricted to an enumerated set of values
    pub fn choice(name: impl Into<String>, allowed: &[&str]) -> Self {
        let allowed = allowed.iter().map(|s| (*s).to_string()).collect();
        Self::new(name, AttributeKind::Choice(allowed))
    }

    /// Identity attribute whose values must fully match `pattern`
    ///
    /// The pattern is anchored on both ends regardless of how it is written.
    pub fn identity(name: impl Into<String>, pattern: &str) -> Result<Self, SchemaError> {
        let name = name.into();
        let anchored = format!("^(?:{pattern})$");
        let regex = Regex::new(&anchored).map_err(|source| SchemaError::InvalidPattern {
            attribute: name.clone(),
            source,
        })?;
        Ok(Self::new(name, AttributeKind::Identity(regex)))
    }

    /// Attach documentation
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declare a default, validated against this attribute
    pub fn with_default(mut self, raw: &str) -> Result<Self, SchemaError> {
        let value = self.validate(raw)?;
        self.default = Some(value);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &AttributeKind {
        &self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_identity(&self) -> bool {
        matches!(self.kind, AttributeKind::Identity(_))
    }

    /// Validate a raw value, producing its typed form
    pub fn validate(&self, raw: &str) -> Result<Value, ValidationError> {
        match &self.kind {
            AttributeKind::Text => Ok(Value::Text(raw.to_string())),
            AttributeKind::Choice(allowed) => {
                if allowed.iter().any(|a| a == raw) {
                    Ok(Value::Text(raw.to_string()))
                } else {
                    Err(ValidationError::NotInSet {
                        attribute: self.name.clone(),
                        value: raw.to_string(),
                        allowed: allowed.clone(),
                    })
                }
            }
            AttributeKind::Numeric => {
                Number::parse(raw)
                    .map(Value::Number)
                    .ok_or_else(|| ValidationError::NotNumeric {
                        attribute: self.name.clone(),
                        value: raw.to_string(),
                    })
            }
            AttributeKind::Boolean => {
                parse_bool(raw)
                    .map(Value::Bool)
                    .ok_or_else(|| ValidationError::NotABoolean {
                        attribute: self.name.clone(),
                        value: raw.to_string(),
                    })
            }
            AttributeKind::Date => {
                parse_date(raw)
                    .map(Value::Date)
                    .ok_or_else(|| ValidationError::NotADate {
                        attribute: self.name.clone(),
                        value: raw.to_string(),
                    })
            }
            AttributeKind::Identity(pattern) => {
                if pattern.is_match(raw) {
                    Ok(Value::Text(raw.to_string()))
                } else {
                    Err(ValidationError::InvalidIdentity {
                        attribute: self.name.clone(),
                        value: raw.to_string(),
                    })
                }
            }
        }
    }
}
