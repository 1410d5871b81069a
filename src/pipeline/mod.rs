//! Pipeline entry points for a monitoring pass.
//!
//! - `diff`: new/removed key detection between snapshots
//! - `run`: the orchestrator driving fetch, diff, dispatch and persist

pub mod diff;
pub mod run;

pub use diff::{SnapshotDiff, new_asset_keys};
pub use run::{Monitor, RunState};
