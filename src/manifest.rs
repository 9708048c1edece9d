//! Desired-state manifests
//!
//! A manifest lists resources by type. TOML:
//!
//! ```toml
//! [[pool]]
//! id = "1a2b3c4d5e6f1234567890abcdef12345"
//! quantity_used = 1
//! active = true
//!
//! [[repo]]
//! id = "rhel-server6-epel"
//! ensure = "absent"
//! ```
//!
//! JSON manifests (`.json`) have the same shape. Scalars and `ensure` values
//! are kept as strings; validation happens later, per resource.

use anyhow::{Context, Result, bail};
use declarative::DesiredResource;
use std::fs;
use std::path::Path;

/// Manifest file format, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// A field of one manifest entry
#[derive(Debug, Clone, PartialEq)]
enum Field {
    Scalar(String),
    List(Vec<String>),
}

/// Load desired resources from a manifest file
pub fn load(path: &Path) -> Result<Vec<DesiredResource>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read manifest: {}", path.display()))?;
    parse(&content, Format::from_path(path))
        .with_context(|| format!("Invalid manifest: {}", path.display()))
}

/// Parse manifest content
pub fn parse(content: &str, format: Format) -> Result<Vec<DesiredResource>> {
    let document = match format {
        Format::Toml => from_toml(content)?,
        Format::Json => from_json(content)?,
    };

    let mut resources = Vec::new();
    for (type_name, entries) in document {
        for (index, entry) in entries.into_iter().enumerate() {
            let resource = to_desired(&type_name, entry)
                .with_context(|| format!("{type_name} entry {}", index + 1))?;
            resources.push(resource);
        }
    }

    log::debug!("Parsed {} resource(s) from manifest", resources.len());
    Ok(resources)
}

type Entry = Vec<(String, Field)>;

fn to_desired(type_name: &str, entry: Entry) -> Result<DesiredResource> {
    let mut identity = None;
    let mut ensure = None;
    let mut attributes = Vec::new();

    for (key, field) in entry {
        match (key.as_str(), field) {
            ("id", Field::Scalar(value)) => identity = Some(value),
            ("id", Field::List(_)) => bail!("id must be a single value"),
            ("ensure", Field::Scalar(value)) => ensure = Some(vec![value]),
            ("ensure", Field::List(values)) => ensure = Some(values),
            (_, Field::Scalar(value)) => attributes.push((key, value)),
            (_, Field::List(_)) => bail!("{key} must be a single value"),
        }
    }

    let Some(identity) = identity else {
        bail!("missing id");
    };

    let mut resource = DesiredResource::new(type_name, identity);
    if let Some(ensure) = ensure {
        resource = resource.ensure_raw(ensure);
    }
    for (key, value) in attributes {
        resource = resource.attr(key, value);
    }
    Ok(resource)
}

// ============================================================================
// TOML
// ============================================================================

fn from_toml(content: &str) -> Result<Vec<(String, Vec<Entry>)>> {
    let table: toml::Table = toml::from_str(content).context("Invalid TOML")?;

    table
        .into_iter()
        .map(|(type_name, value)| {
            let toml::Value::Array(items) = value else {
                bail!("{type_name} must be an array of tables ([[{type_name}]])");
            };
            let entries = items
                .into_iter()
                .map(|item| match item {
                    toml::Value::Table(fields) => fields
                        .into_iter()
                        .map(|(key, value)| Ok((key.clone(), toml_field(&key, value)?)))
                        .collect(),
                    _ => bail!("{type_name} entries must be tables"),
                })
                .collect::<Result<_>>()?;
            Ok((type_name, entries))
        })
        .collect()
}

fn toml_field(key: &str, value: toml::Value) -> Result<Field> {
    match value {
        toml::Value::Array(items) => items
            .into_iter()
            .map(|item| toml_scalar(key, item))
            .collect::<Result<_>>()
            .map(Field::List),
        other => toml_scalar(key, other).map(Field::Scalar),
    }
}

fn toml_scalar(key: &str, value: toml::Value) -> Result<String> {
    Ok(match value {
        toml::Value::String(s) => s,
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(d) => d.to_string(),
        toml::Value::Array(_) | toml::Value::Table(_) => {
            bail!("{key} must be a string, number, boolean or date")
        }
    })
}

// ============================================================================
// JSON
// ============================================================================

fn from_json(content: &str) -> Result<Vec<(String, Vec<Entry>)>> {
    let value: serde_json::Value = serde_json::from_str(content).context("Invalid JSON")?;
    let serde_json::Value::Object(types) = value else {
        bail!("manifest must be an object keyed by resource type");
    };

    types
        .into_iter()
        .map(|(type_name, value)| {
            let serde_json::Value::Array(items) = value else {
                bail!("{type_name} must be an array of objects");
            };
            let entries = items
                .into_iter()
                .map(|item| match item {
                    serde_json::Value::Object(fields) => fields
                        .into_iter()
                        .map(|(key, value)| Ok((key.clone(), json_field(&key, value)?)))
                        .collect(),
                    _ => bail!("{type_name} entries must be objects"),
                })
                .collect::<Result<_>>()?;
            Ok((type_name, entries))
        })
        .collect()
}

fn json_field(key: &str, value: serde_json::Value) -> Result<Field> {
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| json_scalar(key, item))
            .collect::<Result<_>>()
            .map(Field::List),
        other => json_scalar(key, other).map(Field::Scalar),
    }
}

fn json_scalar(key: &str, value: serde_json::Value) -> Result<String> {
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null | serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            bail!("{key} must be a string, number or boolean")
        }
    })
}
