// src/trigger.rs

//! Trigger surface responses.
//!
//! Shapes shared by the CLI and the Lambda handler: "run now" wraps a
//! [`RunResult`] with a timestamp, "health" reports whether alerts can be
//! delivered.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::models::{Config, RunResult};
use crate::pipeline::Monitor;

const SERVICE_NAME: &str = "bounty-watch";

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Requested trigger action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    #[default]
    Run,
    Health,
}

/// Trigger payload, e.g. a Lambda event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TriggerRequest {
    #[serde(default)]
    pub action: Action,
}

/// Response to a "run now" request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunNowResponse {
    pub timestamp: String,
    pub result: RunResult,
}

impl RunNowResponse {
    /// HTTP status an outer web layer should answer with.
    pub fn http_status(&self) -> u16 {
        if self.result.is_success() { 200 } else { 500 }
    }
}

/// Response to a health probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
    pub telegram_configured: bool,
}

/// Run one monitoring pass and wrap the result.
pub async fn run_now(monitor: &Monitor) -> RunNowResponse {
    let result = monitor.run().await;
    RunNowResponse {
        timestamp: timestamp(),
        result,
    }
}

/// Report service health.
pub fn health(config: &Config) -> HealthResponse {
    HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        timestamp: timestamp(),
        telegram_configured: config.notifier.is_configured(),
    }
}
