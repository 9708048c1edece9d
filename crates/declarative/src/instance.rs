//! Resource instances
//!
//! An [`Instance`] is a fully validated snapshot of one resource, either the
//! desired state or the state a provider observed on the host. Instances are
//! immutable: a changed desired state is a new instance.

use crate::error::{DesiredStateError, ValidationError};
use crate::schema::{Schema, SchemaRegistry};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Raw attribute input, keyed by attribute name
pub type RawAttributes = BTreeMap<String, String>;

/// Lifecycle disposition of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    Present,
    Absent,
}

impl FromStr for Ensure {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => Err(ValidationError::InvalidEnsure(other.to_string())),
        }
    }
}

impl fmt::Display for Ensure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => f.write_str("present"),
            Self::Absent => f.write_str("absent"),
        }
    }
}

/// The set of dispositions a caller will accept
///
/// Usually a single value. When several are given the resource is in sync if
/// the observed disposition matches any of them; order does not matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsureSpec(Vec<Ensure>);

impl EnsureSpec {
    /// Accept exactly one disposition
    pub fn one(ensure: Ensure) -> Self {
        Self(vec![ensure])
    }

    /// Accept any of the given dispositions
    pub fn any_of(values: impl IntoIterator<Item = Ensure>) -> Result<Self, ValidationError> {
        let mut set = Vec::new();
        for value in values {
            if !set.contains(&value) {
                set.push(value);
            }
        }
        if set.is_empty() {
            return Err(ValidationError::EmptyEnsure);
        }
        Ok(Self(set))
    }

    /// Parse a list of raw ensure values
    pub fn parse<S: AsRef<str>>(values: &[S]) -> Result<Self, ValidationError> {
        let parsed = values
            .iter()
            .map(|v| v.as_ref().parse())
            .collect::<Result<Vec<Ensure>, _>>()?;
        Self::any_of(parsed)
    }

    /// Whether an observed disposition satisfies this spec
    pub fn accepts(&self, observed: Ensure) -> bool {
        self.0.contains(&observed)
    }

    pub fn iter(&self) -> impl Iterator<Item = Ensure> + '_ {
        self.0.iter().copied()
    }
}

impl Default for EnsureSpec {
    fn default() -> Self {
        Self::one(Ensure::Present)
    }
}

impl fmt::Display for EnsureSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join("|"))
    }
}

/// A validated resource
#[derive(Debug, Clone)]
pub struct Instance {
    schema: Arc<Schema>,
    identity: String,
    values: BTreeMap<String, Value>,
    ensure: EnsureSpec,
}

impl Instance {
    /// Validate raw attributes against a schema
    ///
    /// Missing attributes take the declared default if there is one and are
    /// left unset otherwise. Nothing unvalidated is ever stored.
    pub fn build(
        schema: &Arc<Schema>,
        raw: &RawAttributes,
        ensure: EnsureSpec,
    ) -> Result<Self, ValidationError> {
        if let Some(unknown) = raw.keys().find(|k| schema.attribute(k).is_none()) {
            return Err(ValidationError::UnknownAttribute {
                type_name: schema.type_name().to_string(),
                attribute: unknown.clone(),
            });
        }

        let mut values = BTreeMap::new();
        for attr in schema.attributes() {
            let value = match raw.get(attr.name()) {
                Some(input) => Some(attr.validate(input)?),
                None => attr.default().cloned(),
            };
            if let Some(value) = value {
                values.insert(attr.name().to_string(), value);
            }
        }

        let identity_attr = schema.identity();
        let identity = values
            .get(identity_attr.name())
            .map(ToString::to_string)
            .ok_or_else(|| ValidationError::MissingIdentity {
                type_name: schema.type_name().to_string(),
                attribute: identity_attr.name().to_string(),
            })?;

        Ok(Self {
            schema: Arc::clone(schema),
            identity,
            values,
            ensure,
        })
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn type_name(&self) -> &str {
        self.schema.type_name()
    }

    /// Value of the identity attribute
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn ensure(&self) -> &EnsureSpec {
        &self.ensure
    }

    /// Value of an attribute, if set
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Set values in schema declaration order
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .attributes()
            .iter()
            .filter_map(|a| self.values.get(a.name()).map(|v| (a.name(), v)))
    }

    /// Canonical raw form of every set value
    pub fn to_raw(&self) -> RawAttributes {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

/// One desired-state declaration: `(type, identity, ensure, attributes)`
///
/// Everything is kept raw until [`DesiredResource::resolve`], so a bad value
/// rejects only this declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredResource {
    pub type_name: String,
    pub identity: String,
    /// Raw ensure values; `None` accepts only `present`
    pub ensure: Option<Vec<String>>,
    pub attributes: RawAttributes,
}

impl DesiredResource {
    pub fn new(type_name: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            identity: identity.into(),
            ensure: None,
            attributes: RawAttributes::new(),
        }
    }

    pub fn ensure(mut self, ensure: EnsureSpec) -> Self {
        self.ensure = Some(ensure.iter().map(|e| e.to_string()).collect());
        self
    }

    /// Set the ensure values as written, parsed on resolve
    pub fn ensure_raw<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.ensure = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// The accepted dispositions
    pub fn ensure_spec(&self) -> Result<EnsureSpec, ValidationError> {
        match &self.ensure {
            None => Ok(EnsureSpec::default()),
            Some(values) => EnsureSpec::parse(values),
        }
    }

    /// Add a raw attribute value
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Look up the schema and validate this declaration into an instance
    pub fn resolve(&self, registry: &SchemaRegistry) -> Result<Instance, DesiredStateError> {
        let schema = registry.lookup(&self.type_name)?;
        let ensure = self.ensure_spec()?;
        let identity_name = schema.identity().name();

        let mut raw = self.attributes.clone();
        match raw.get(identity_name) {
            Some(given) if *given != self.identity => {
                return Err(ValidationError::ConflictingIdentity {
                    attribute: identity_name.to_string(),
                    identity: self.identity.clone(),
                    given: given.clone(),
                }
                .into());
            }
            Some(_) => {}
            None => {
                raw.insert(identity_name.to_string(), self.identity.clone());
            }
        }

        Ok(Instance::build(&schema, &raw, ensure)?)
    }
}
