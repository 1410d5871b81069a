//! Output records of a monitoring pass.

use serde::{Deserialize, Serialize};

use super::asset::{Asset, AssetType, Platform};

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Error,
}

/// A candidate URL derived from a new asset. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeUrl {
    pub url: String,
    pub program: String,
    pub asset_type: AssetType,
    pub platform: Platform,
}

impl ProbeUrl {
    pub fn for_asset(url: impl Into<String>, asset: &Asset) -> Self {
        Self {
            url: url.into(),
            program: asset.program.clone(),
            asset_type: asset.asset_type,
            platform: asset.platform,
        }
    }
}

/// Result of one monitoring pass, returned to the trigger surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub status: RunStatus,
    pub new_assets: usize,
    pub telegram_sent: usize,
    pub extracted_urls: Vec<ProbeUrl>,
    pub message: String,
}

impl RunResult {
    /// A run that stopped before diffing.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Error,
            new_assets: 0,
            telegram_sent: 0,
            extracted_urls: Vec::new(),
            message: message.into(),
        }
    }

    /// A completed run with no new assets.
    pub fn unchanged() -> Self {
        Self {
            status: RunStatus::Success,
            new_assets: 0,
            telegram_sent: 0,
            extracted_urls: Vec::new(),
            message: "No new assets found".to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }
}
