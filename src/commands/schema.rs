//! `rhsmctl schema` - describe resource types

use anyhow::Result;
use colored::Colorize;
use declarative::{Attribute, AttributeKind};

use super::load_registry;
use crate::ui;

pub fn run(type_name: Option<&str>) -> Result<()> {
    let registry = load_registry()?;

    let Some(type_name) = type_name else {
        ui::header("Resource types");
        for schema in registry.iter() {
            println!(
                "  {:<8} {}",
                schema.type_name().bold(),
                schema.description().dimmed()
            );
        }
        return Ok(());
    };

    let schema = registry.lookup(type_name)?;
    ui::header(&format!("{} - {}", schema.type_name(), schema.description()));
    for attr in schema.attributes() {
        println!(
            "  {:<18} {:<30} {}",
            attr.name().bold(),
            kind_description(attr),
            attr.description().dimmed()
        );
    }
    Ok(())
}

fn kind_description(attr: &Attribute) -> String {
    let mut kind = match attr.kind() {
        AttributeKind::Choice(allowed) => format!("one of {}", allowed.join("|")),
        other => other.label().to_string(),
    };
    if let Some(default) = attr.default() {
        kind.push_str(&format!(" = {default}"));
    }
    kind
}
