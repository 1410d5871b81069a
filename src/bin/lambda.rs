//! AWS Lambda entry point for bounty-watch.
//!
//! Designed for a scheduled (cron) trigger. The snapshot lives in S3.
//!
//! ## Environment Variables
//!
//! - `S3_BUCKET`: S3 bucket for the snapshot (default: `bounty-watch`)
//! - `S3_PREFIX`: S3 key prefix (default: `bounty-watch`)
//! - `TELEGRAM_BOT_TOKEN`, `TELEGRAM_USER_ID`: alert credentials
//! - `FEED_TIMEOUT_SECS`: per-feed HTTP timeout
//! - `NOTIFY_PAUSE_MS`: pause between alerts
//! - `MAX_REPORTED_URLS`: cap on probe URLs in the response
//! - `RUST_LOG`: Log level (e.g., `info`, `debug`)

use std::sync::Arc;

use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::{error, info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bounty_watch::error::Result;
use bounty_watch::models::Config;
use bounty_watch::pipeline::Monitor;
use bounty_watch::storage::s3::S3SnapshotStore;
use bounty_watch::trigger::{self, Action, TriggerRequest};

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> std::result::Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("bounty-watch Lambda starting...");
    lambda_runtime::run(service_fn(handler)).await
}

/// Handler for AWS Lambda events.
#[instrument(skip(event))]
async fn handler(event: LambdaEvent<Value>) -> std::result::Result<Value, LambdaError> {
    let (payload, _context) = event.into_parts();
    // Scheduler events carry their own payload shape; anything unrecognised runs.
    let request: TriggerRequest = serde_json::from_value(payload).unwrap_or_default();

    let mut config = Config::default();
    config.apply_env();

    match request.action {
        Action::Health => Ok(serde_json::to_value(trigger::health(&config))?),
        Action::Run => match run_lambda_pipeline(&config).await {
            Ok(response) => {
                info!(
                    "Run finished: status={:?}, new_assets={}, alerts={}",
                    response.result.status, response.result.new_assets, response.result.telegram_sent
                );
                Ok(serde_json::to_value(response)?)
            }
            Err(e) => {
                error!("Lambda execution failed: {}", e);
                Ok(serde_json::json!({
                    "status": "error",
                    "message": e.to_string()
                }))
            }
        },
    }
}

/// Build the S3-backed monitor and run one pass.
async fn run_lambda_pipeline(config: &Config) -> Result<trigger::RunNowResponse> {
    let store = S3SnapshotStore::from_env(&config.storage.snapshot_file).await?;
    let monitor = Monitor::from_config(config, Arc::new(store))?;
    Ok(trigger::run_now(&monitor).await)
}
