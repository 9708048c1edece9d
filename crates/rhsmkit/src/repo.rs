//! Repository schema

use crate::error::{Error, Result};
use declarative::{Attribute, Schema};

/// Resource type name
pub const TYPE_NAME: &str = "repo";

/// Build the `repo` schema.
pub fn schema() -> Result<Schema> {
    let wrap = || Error::schema(TYPE_NAME);

    Schema::builder(TYPE_NAME)
        .describe("A repository enabled through a subscription")
        .attribute(
            Attribute::identity("id", "[A-Za-z0-9_.:$-]+")
                .map_err(wrap())?
                .describe("Repository label, e.g. rhel-server6-epel"),
        )
        .attribute(Attribute::text("repo_name").describe("Human readable name of the repository"))
        .attribute(Attribute::text("url").describe("Base URL the repository is served from"))
        .build()
        .map_err(wrap())
}
