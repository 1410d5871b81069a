// src/services/canonicalize.rs

//! Asset canonicalizer.
//!
//! Turns one raw scope entry into a tracked [`Asset`] or a reason for
//! skipping it. Nothing here can fail the surrounding feed.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::models::{Asset, AssetType, Platform, ScopeEntry};

/// Why a scope entry was not tracked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkipReason {
    /// `asset_identifier` missing or blank
    MissingIdentifier,
    /// `asset_type` outside `url` / `wildcard`
    UnsupportedType(String),
    /// `eligible_for_bounty` not strictly `true`
    NotEligible,
    /// Entry could not be read at all
    Malformed(String),
}

impl SkipReason {
    /// Stable label for grouping skip counts.
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::MissingIdentifier => "missing_identifier",
            SkipReason::UnsupportedType(_) => "unsupported_type",
            SkipReason::NotEligible => "not_eligible",
            SkipReason::Malformed(_) => "malformed",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingIdentifier => write!(f, "missing asset identifier"),
            SkipReason::UnsupportedType(t) => write!(f, "unsupported asset type '{t}'"),
            SkipReason::NotEligible => write!(f, "not eligible for bounty"),
            SkipReason::Malformed(msg) => write!(f, "malformed entry: {msg}"),
        }
    }
}

/// Outcome of canonicalizing one scope entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Canonical {
    Asset(Asset),
    Skipped(SkipReason),
}

impl Canonical {
    pub fn into_asset(self) -> Option<Asset> {
        match self {
            Canonical::Asset(asset) => Some(asset),
            Canonical::Skipped(_) => None,
        }
    }
}

/// Canonicalize a raw scope entry belonging to `program` on `platform`.
pub fn canonicalize(program: &str, platform: Platform, entry: &Value) -> Canonical {
    let entry = match ScopeEntry::deserialize(entry) {
        Ok(entry) => entry,
        Err(e) => return Canonical::Skipped(SkipReason::Malformed(e.to_string())),
    };
    canonicalize_entry(program, platform, entry)
}

/// Canonicalize an already-decoded scope entry.
pub fn canonicalize_entry(program: &str, platform: Platform, entry: ScopeEntry) -> Canonical {
    let eligible = entry.is_eligible();

    let identifier = match entry.asset_identifier {
        Some(id) if !id.trim().is_empty() => id,
        _ => return Canonical::Skipped(SkipReason::MissingIdentifier),
    };

    let raw_type = entry.asset_type.as_deref().unwrap_or("");
    let Some(asset_type) = AssetType::parse(raw_type) else {
        return Canonical::Skipped(SkipReason::UnsupportedType(raw_type.to_lowercase()));
    };

    if !eligible {
        return Canonical::Skipped(SkipReason::NotEligible);
    }

    Canonical::Asset(Asset {
        identifier,
        program: program.to_string(),
        platform,
        asset_type,
        eligible_for_bounty: true,
    })
}
