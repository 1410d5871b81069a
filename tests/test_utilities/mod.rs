// Shared by several test crates; not every helper is used by each.
#![allow(dead_code)]

pub mod mocks;

use serde_json::{Value, json};

/// A scope entry as published upstream.
pub fn scope(identifier: &str, asset_type: &str, eligible: bool) -> Value {
    json!({
        "asset_identifier": identifier,
        "asset_type": asset_type,
        "eligible_for_bounty": eligible
    })
}

/// A program record with the given in-scope entries.
pub fn program(name: &str, in_scope: Vec<Value>) -> Value {
    json!({
        "name": name,
        "url": format!("https://example.invalid/{name}"),
        "targets": { "in_scope": in_scope, "out_of_scope": [] }
    })
}
