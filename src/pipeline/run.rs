// src/pipeline/run.rs

//! Run orchestrator: one monitoring pass.
//!
//! ```text
//! FETCHING -> DIFFING -> EXPANDING/DISPATCHING -> PERSISTING -> DONE
//!     \
//!      -> FAILED
//! ```
//!
//! Only a fetch failure stops a run. Everything after it is best effort and
//! always reaches `DONE`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::models::{Asset, AssetMapping, Config, ProbeUrl, RunResult, RunStatus};
use crate::pipeline::diff::SnapshotDiff;
use crate::services::{
    Dispatcher, FeedAggregator, FeedFetcher, HttpFeedFetcher, NotificationChannel,
    TelegramChannel, probe_urls,
};
use crate::storage::SnapshotStore;

/// Stage of a monitoring pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Fetching,
    Diffing,
    Dispatching,
    Persisting,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Fetching => "FETCHING",
            RunState::Diffing => "DIFFING",
            RunState::Dispatching => "EXPANDING/DISPATCHING",
            RunState::Persisting => "PERSISTING",
            RunState::Done => "DONE",
            RunState::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Wires feeds, snapshot store and notification channel into a pipeline.
pub struct Monitor {
    feeds: Arc<dyn FeedFetcher>,
    store: Arc<dyn SnapshotStore>,
    channel: Arc<dyn NotificationChannel>,
    pause: Duration,
    max_urls: Option<usize>,
}

impl Monitor {
    pub fn new(
        feeds: Arc<dyn FeedFetcher>,
        store: Arc<dyn SnapshotStore>,
        channel: Arc<dyn NotificationChannel>,
    ) -> Self {
        Self {
            feeds,
            store,
            channel,
            pause: Duration::ZERO,
            max_urls: None,
        }
    }

    /// Build the production pipeline (HTTP feeds, Telegram) around `store`.
    pub fn from_config(config: &Config, store: Arc<dyn SnapshotStore>) -> Result<Self> {
        let feeds = Arc::new(HttpFeedFetcher::new(config.feeds.clone())?);
        let channel = Arc::new(TelegramChannel::new(&config.notifier)?);

        Ok(Self {
            feeds,
            store,
            channel,
            pause: Duration::from_millis(config.notifier.pause_ms),
            max_urls: config.report.max_urls,
        })
    }

    /// Pause between consecutive notification sends.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Cap the probe URLs reported in a run result.
    pub fn with_max_urls(mut self, max_urls: Option<usize>) -> Self {
        self.max_urls = max_urls;
        self
    }

    pub fn notifications_configured(&self) -> bool {
        self.channel.is_configured()
    }

    fn enter(&self, state: RunState) {
        log::info!("[{}]", state);
    }

    /// Execute one monitoring pass.
    pub async fn run(&self) -> RunResult {
        log::info!("Starting bounty asset monitoring...");

        self.enter(RunState::Fetching);
        let current = match FeedAggregator::new(self.feeds.as_ref()).aggregate().await {
            Ok(outcome) if !outcome.assets.is_empty() => outcome.assets,
            Ok(_) => {
                self.enter(RunState::Failed);
                log::error!("Feeds yielded no eligible assets; refusing to diff");
                return RunResult::error("Failed to fetch asset data: no eligible assets");
            }
            Err(e) => {
                self.enter(RunState::Failed);
                log::error!("Failed to fetch data: {}", e);
                return RunResult::error(format!("Failed to fetch asset data: {e}"));
            }
        };

        self.enter(RunState::Diffing);
        let previous = self.store.get().await;
        let diff = SnapshotDiff::calculate(&previous, &current);
        if !diff.removed.is_empty() {
            log::info!("{} assets no longer in scope", diff.removed.len());
        }

        let result = if diff.added.is_empty() {
            log::info!("No new assets found");
            RunResult::unchanged()
        } else {
            self.enter(RunState::Dispatching);
            self.announce(&current, &diff).await
        };

        self.enter(RunState::Persisting);
        if !self.store.put(&current).await {
            log::warn!("Snapshot not persisted; these assets may be reported again next run");
        }

        self.enter(RunState::Done);
        result
    }

    /// Expand and notify for every added key.
    async fn announce(&self, current: &AssetMapping, diff: &SnapshotDiff) -> RunResult {
        let mut keys: Vec<&String> = diff.added.iter().collect();
        keys.sort();
        let new_assets: Vec<&Asset> = keys.into_iter().filter_map(|k| current.get(k)).collect();
        log::info!("Found {} new assets", new_assets.len());

        let mut extracted_urls: Vec<ProbeUrl> =
            new_assets.iter().copied().flat_map(probe_urls).collect();
        if let Some(max) = self.max_urls {
            if extracted_urls.len() > max {
                log::info!(
                    "Reporting {} of {} probe URLs",
                    max,
                    extracted_urls.len()
                );
                extracted_urls.truncate(max);
            }
        }

        let dispatcher = Dispatcher::new(Arc::clone(&self.channel), self.pause);
        let report = dispatcher.dispatch(&new_assets).await;
        if report.configured {
            log::info!(
                "Alerts: {} delivered, {} failed",
                report.delivered,
                report.failed
            );
        }

        RunResult {
            status: RunStatus::Success,
            new_assets: new_assets.len(),
            telegram_sent: report.delivered,
            extracted_urls,
            message: format!("Found {} new assets", new_assets.len()),
        }
    }
}
