//! In-process snapshot store, for tests and dry runs.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::AssetMapping;
use crate::storage::{Snapshot, SnapshotStore};

#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshot: Mutex<Option<Snapshot>>,
    writes: Mutex<usize>,
    fail_writes: bool,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `assets` already stored.
    pub fn seeded(assets: AssetMapping) -> Self {
        Self {
            snapshot: Mutex::new(Some(Snapshot::new(assets))),
            ..Self::default()
        }
    }

    /// A store whose writes always fail.
    pub fn read_only(self) -> Self {
        Self {
            fail_writes: true,
            ..self
        }
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.lock().map(|w| *w).unwrap_or(0)
    }

    /// Currently stored mapping, if any.
    pub fn current(&self) -> Option<AssetMapping> {
        self.snapshot
            .lock()
            .ok()
            .and_then(|s| s.as_ref().map(|s| s.assets.clone()))
    }
}

fn poisoned() -> AppError {
    AppError::Io(std::io::Error::other("snapshot lock poisoned"))
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self) -> Result<Option<Snapshot>> {
        Ok(self.snapshot.lock().map_err(|_| poisoned())?.clone())
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if self.fail_writes {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "snapshot store is read-only",
            )));
        }
        *self.snapshot.lock().map_err(|_| poisoned())? = Some(snapshot.clone());
        *self.writes.lock().map_err(|_| poisoned())? += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
