//! Entitlement pool schema
//!
//! A pool is the server-side view of a subscription from which this system
//! draws entitlements. Pool IDs are hexadecimal tokens such as
//! `1a2b3c4d5e6f1234567890abcdef12345`.

use crate::error::{Error, Result};
use declarative::{Attribute, Schema};

/// Resource type name
pub const TYPE_NAME: &str = "pool";

/// System types a pool can be attached for
pub const SYSTEM_TYPES: &[&str] = &["physical", "virtual", "container"];

/// Build the `pool` schema.
pub fn schema() -> Result<Schema> {
    let wrap = || Error::schema(TYPE_NAME);

    Schema::builder(TYPE_NAME)
        .describe("An entitlement pool from which active subscriptions can be drawn")
        .attribute(
            Attribute::identity("id", "[0-9a-fA-F]+")
                .map_err(wrap())?
                .describe("Pool ID of an entitlement pool the system is subscribed to"),
        )
        .attribute(Attribute::text("name").describe("Locally unique name of the pool"))
        .attribute(Attribute::text("provides").describe("What the pool provides"))
        .attribute(Attribute::numeric("sku").describe("Stock keeping unit of the subscription"))
        .attribute(
            Attribute::text("contract").describe("Contract the subscription to this pool belongs to"),
        )
        .attribute(
            Attribute::text("account").describe("Account the subscription to this pool belongs to"),
        )
        .attribute(Attribute::numeric("serial").describe("Serial number of the pool on the server"))
        .attribute(
            Attribute::boolean("active").describe("Whether the pool is active for this system"),
        )
        .attribute(
            Attribute::numeric("quantity_used")
                .describe("Subscriptions consumed from the pool, e.g. sockets for per-CPU licenses"),
        )
        .attribute(
            Attribute::text("service_level").describe("Service level of the subscription"),
        )
        .attribute(Attribute::text("service_type").describe("Type of service provided"))
        .attribute(
            Attribute::text("status_details").describe("Freeform status of the subscription"),
        )
        .attribute(
            Attribute::text("subscription_type").describe("Kind of subscription the system holds"),
        )
        .attribute(Attribute::date("starts").describe("Date the subscription starts"))
        .attribute(Attribute::date("ends").describe("Date the subscription ends"))
        .attribute(
            Attribute::choice("system_type", SYSTEM_TYPES)
                .describe("Whether this is a physical, virtual or container system"),
        )
        .build()
        .map_err(wrap())
}
