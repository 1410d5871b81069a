//! Snapshot persistence.
//!
//! A snapshot is the full asset mapping observed at the end of the previous
//! run. Every successful run replaces it wholesale; nothing is merged.
//!
//! ## Document Layout
//!
//! ```text
//! {
//!   "updated_at": "2026-01-01T00:00:00Z",
//!   "count": 2,
//!   "assets": { "<identifier>|<program>|<platform>": { ... }, ... }
//! }
//! ```

pub mod local;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::AssetMapping;

// Re-export for convenience
pub use local::LocalSnapshotStore;
pub use memory::MemorySnapshotStore;

/// Persisted snapshot document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// ISO 8601 timestamp of the write
    pub updated_at: DateTime<Utc>,
    /// Asset count, for quick inspection
    pub count: usize,
    pub assets: AssetMapping,
}

impl Snapshot {
    pub fn new(assets: AssetMapping) -> Self {
        Self {
            updated_at: Utc::now(),
            count: assets.len(),
            assets,
        }
    }
}

/// Durable storage for the last-seen asset mapping.
///
/// Backends implement the fallible `load` / `save` pair; callers use
/// `get` / `put`, which never propagate errors.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the stored snapshot, `None` if nothing has been written yet.
    async fn load(&self) -> Result<Option<Snapshot>>;

    /// Replace the stored snapshot.
    async fn save(&self, snapshot: &Snapshot) -> Result<()>;

    /// Human-readable location for logs.
    fn location(&self) -> String;

    /// Last-seen mapping, empty when absent or unreadable.
    async fn get(&self) -> AssetMapping {
        match self.load().await {
            Ok(Some(snapshot)) => {
                log::info!(
                    "Loaded snapshot of {} assets from {} (updated {})",
                    snapshot.assets.len(),
                    self.location(),
                    snapshot.updated_at
                );
                snapshot.assets
            }
            Ok(None) => {
                log::info!("No snapshot at {}; starting cold", self.location());
                AssetMapping::new()
            }
            Err(e) => {
                log::warn!(
                    "Snapshot read from {} failed, treating as empty: {}",
                    self.location(),
                    e
                );
                AssetMapping::new()
            }
        }
    }

    /// Overwrite the snapshot with `assets`. Returns whether it was stored.
    async fn put(&self, assets: &AssetMapping) -> bool {
        let snapshot = Snapshot::new(assets.clone());
        match self.save(&snapshot).await {
            Ok(()) => {
                log::info!(
                    "Saved snapshot of {} assets to {}",
                    snapshot.count,
                    self.location()
                );
                true
            }
            Err(e) => {
                log::error!("Snapshot write to {} failed: {}", self.location(), e);
                false
            }
        }
    }
}
