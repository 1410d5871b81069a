//! Raw upstream feed records.
//!
//! Both providers publish a JSON array of program objects. Only `name` and
//! `targets.in_scope[]` are consumed; everything else is ignored.

use serde::Deserialize;
use serde_json::Value;

use super::asset::{Platform, UNKNOWN_PROGRAM};

/// One scope entry under `targets.in_scope`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScopeEntry {
    #[serde(default)]
    pub asset_identifier: Option<String>,

    #[serde(default)]
    pub asset_type: Option<String>,

    /// Kept raw: anything other than JSON `true` is ineligible.
    #[serde(default)]
    pub eligible_for_bounty: Option<Value>,
}

impl ScopeEntry {
    pub fn is_eligible(&self) -> bool {
        matches!(self.eligible_for_bounty, Some(Value::Bool(true)))
    }
}

/// A program record tagged with the feed it was read from.
#[derive(Debug, Clone)]
pub struct ProgramRecord {
    pub platform: Platform,
    pub raw: Value,
}

impl ProgramRecord {
    pub fn new(platform: Platform, raw: Value) -> Self {
        Self { platform, raw }
    }

    /// Program display name, falling back to the unknown-program sentinel.
    pub fn name(&self) -> &str {
        self.raw
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNKNOWN_PROGRAM)
    }

    /// Entries under `targets.in_scope`.
    ///
    /// `Ok(&[])` when the path is missing, `Err` when it exists with the
    /// wrong shape or the record itself isn't an object.
    pub fn in_scope(&self) -> std::result::Result<&[Value], String> {
        let Some(record) = self.raw.as_object() else {
            return Err(format!("program record is {}", json_kind(&self.raw)));
        };
        let Some(targets) = record.get("targets") else {
            return Ok(&[]);
        };
        let Some(in_scope) = targets.get("in_scope") else {
            return Ok(&[]);
        };
        match in_scope {
            Value::Array(entries) => Ok(entries.as_slice()),
            Value::Null => Ok(&[]),
            other => Err(format!("targets.in_scope is {}", json_kind(other))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
