//! Tracked scope assets and their identity.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Program name used when the upstream record has none.
pub const UNKNOWN_PROGRAM: &str = "Unknown Program";

/// Upstream bounty platform an asset was published on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    HackerOne,
    Bugcrowd,
}

impl Platform {
    /// Every platform, in feed fetch order.
    pub const ALL: [Platform; 2] = [Platform::HackerOne, Platform::Bugcrowd];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::HackerOne => "HackerOne",
            Platform::Bugcrowd => "Bugcrowd",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of scope target. Other upstream types are never tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Url,
    Wildcard,
}

impl AssetType {
    /// Parse an upstream type tag, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "url" => Some(AssetType::Url),
            "wildcard" => Some(AssetType::Wildcard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Url => "url",
            AssetType::Wildcard => "wildcard",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single in-scope, bounty-eligible target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Raw scope value (URL or `*.domain` pattern)
    pub identifier: String,

    /// Bounty program name
    pub program: String,

    /// Source platform
    pub platform: Platform,

    /// Target kind
    pub asset_type: AssetType,

    /// Always true for tracked assets
    pub eligible_for_bounty: bool,
}

impl Asset {
    /// Composite identity key: `identifier|program|platform`.
    ///
    /// Two assets are the same across runs exactly when their keys match.
    /// `asset_type` does not take part. `\` and `|` inside a field are
    /// backslash-escaped, so distinct tuples never share a key.
    pub fn key(&self) -> String {
        format!(
            "{}|{}|{}",
            escape_key_field(&self.identifier),
            escape_key_field(&self.program),
            self.platform
        )
    }
}

fn escape_key_field(field: &str) -> String {
    field.replace('\\', "\\\\").replace('|', "\\|")
}

/// Assets keyed by identity key.
///
/// Keys are always derived from the stored value, so a mapping can't hold
/// an asset under a foreign key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Asset>", into = "BTreeMap<String, Asset>")]
pub struct AssetMapping {
    assets: BTreeMap<String, Asset>,
}

impl AssetMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an asset under its identity key.
    ///
    /// Returns the asset previously stored under the same key, if any.
    pub fn insert(&mut self, asset: Asset) -> Option<Asset> {
        self.assets.insert(asset.key(), asset)
    }

    pub fn get(&self, key: &str) -> Option<&Asset> {
        self.assets.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.assets.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.assets.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl FromIterator<Asset> for AssetMapping {
    fn from_iter<I: IntoIterator<Item = Asset>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for asset in iter {
            mapping.insert(asset);
        }
        mapping
    }
}

// Persisted snapshots are re-keyed on load so hand-edited keys can't drift
// from their values.
impl From<BTreeMap<String, Asset>> for AssetMapping {
    fn from(raw: BTreeMap<String, Asset>) -> Self {
        raw.into_values().collect()
    }
}

impl From<AssetMapping> for BTreeMap<String, Asset> {
    fn from(mapping: AssetMapping) -> Self {
        mapping.assets
    }
}
