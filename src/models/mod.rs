// src/models/mod.rs

//! Domain models for the monitor.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod asset;
mod config;
mod feed;
mod run;

// Re-export all public types
pub use asset::{Asset, AssetMapping, AssetType, Platform, UNKNOWN_PROGRAM};
pub use config::{
    Config, FeedConfig, LoggingConfig, NotifierConfig, ReportConfig, StorageConfig,
};
pub use feed::{ProgramRecord, ScopeEntry};
pub use run::{ProbeUrl, RunResult, RunStatus};
