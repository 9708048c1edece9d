//! Resource schemas and the schema registry
//!
//! A [`Schema`] is an ordered list of attribute descriptors with exactly one
//! identity attribute. Schemas are built once at startup and registered in a
//! [`SchemaRegistry`]; once the registry is shared behind an `Arc` it can no
//! longer change, so reconciliation reads it without locking.

use crate::attribute::Attribute;
use crate::error::{RegistryError, SchemaError};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// One resource kind
#[derive(Debug)]
pub struct Schema {
    type_name: String,
    description: String,
    attributes: Vec<Attribute>,
    identity: usize,
}

impl Schema {
    /// Start declaring a schema
    pub fn builder(type_name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            type_name: type_name.into(),
            description: String::new(),
            attributes: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// All attributes in declaration order, identity included
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// The identity attribute
    pub fn identity(&self) -> &Attribute {
        &self.attributes[self.identity]
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    /// Attributes other than the identity, in declaration order
    pub fn properties(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| !a.is_identity())
    }
}

/// Builder for [`Schema`]
#[derive(Debug)]
pub struct SchemaBuilder {
    type_name: String,
    description: String,
    attributes: Vec<Attribute>,
}

impl SchemaBuilder {
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append an attribute
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Check the declaration and freeze it
    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut seen = HashSet::new();
        let mut identity: Option<usize> = None;

        for (idx, attr) in self.attributes.iter().enumerate() {
            if !seen.insert(attr.name()) {
                return Err(SchemaError::DuplicateAttribute {
                    type_name: self.type_name.clone(),
                    attribute: attr.name().to_string(),
                });
            }
            if attr.is_identity() {
                if let Some(first) = identity {
                    return Err(SchemaError::MultipleIdentities {
                        type_name: self.type_name.clone(),
                        first: self.attributes[first].name().to_string(),
                        second: attr.name().to_string(),
                    });
                }
                identity = Some(idx);
            }
        }

        let identity = identity.ok_or_else(|| SchemaError::NoIdentity(self.type_name.clone()))?;

        Ok(Schema {
            type_name: self.type_name,
            description: self.description,
            attributes: self.attributes,
            identity,
        })
    }
}

/// Process-wide table of schemas, keyed by type name
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema; type names must be unique
    pub fn register(&mut self, schema: Schema) -> Result<Arc<Schema>, RegistryError> {
        if self.schemas.contains_key(schema.type_name()) {
            return Err(RegistryError::DuplicateSchema(schema.type_name().to_string()));
        }
        let schema = Arc::new(schema);
        self.schemas
            .insert(schema.type_name().to_string(), Arc::clone(&schema));
        log::debug!("Registered resource type {}", schema.type_name());
        Ok(schema)
    }

    /// Find a schema by type name
    pub fn lookup(&self, type_name: &str) -> Result<Arc<Schema>, RegistryError> {
        self.schemas
            .get(type_name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownType(type_name.to_string()))
    }

    /// Schemas sorted by type name
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.schemas.values()
    }

    pub fn type_names(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> SchemaBuilder {
        Schema::builder("widget")
            .attribute(Attribute::identity("id", "[a-z]+").unwrap())
            .attribute(Attribute::numeric("size"))
    }

    #[test]
    fn test_build_schema() {
        let schema = widget().describe("A widget").build().unwrap();
        assert_eq!(schema.type_name(), "widget");
        assert_eq!(schema.identity().name(), "id");
        assert_eq!(schema.attributes().len(), 2);
        let props: Vec<_> = schema.properties().map(Attribute::name).collect();
        assert_eq!(props, vec!["size"]);
        assert!(schema.attribute("size").is_some());
        assert!(schema.attribute("colour").is_none());
    }

    #[test]
    fn test_duplicate_attribute() {
        let err = widget().attribute(Attribute::text("size")).build().unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateAttribute { attribute, .. } if attribute == "size"));
    }

    #[test]
    fn test_identity_required_exactly_once() {
        let none = Schema::builder("bare")
            .attribute(Attribute::text("x"))
            .build()
            .unwrap_err();
        assert!(matches!(none, SchemaError::NoIdentity(_)));

        let two = widget()
            .attribute(Attribute::identity("other", "[0-9]+").unwrap())
            .build()
            .unwrap_err();
        assert!(matches!(two, SchemaError::MultipleIdentities { .. }));
    }

    #[test]
    fn test_registry_register_and_lookup() {
        let mut registry = SchemaRegistry::new();
        registry.register(widget().build().unwrap()).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("widget").unwrap().type_name(), "widget");
        assert_eq!(
            registry.lookup("gadget").unwrap_err(),
            RegistryError::UnknownType("gadget".into())
        );
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let mut registry = SchemaRegistry::new();
        registry.register(widget().build().unwrap()).unwrap();
        let err = registry.register(widget().build().unwrap()).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateSchema("widget".into()));
        assert_eq!(registry.type_names(), vec!["widget"]);
    }
}
