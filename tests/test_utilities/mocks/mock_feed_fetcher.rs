use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bounty_watch::error::{AppError, Result};
use bounty_watch::models::Platform;
use bounty_watch::services::FeedFetcher;
use serde_json::Value;

/// Mock FeedFetcher serving canned program lists per platform
pub struct MockFeedFetcher {
    feeds: Mutex<HashMap<Platform, Vec<Value>>>,
    failing: Mutex<Vec<Platform>>,
}

impl MockFeedFetcher {
    pub fn new() -> Self {
        Self {
            feeds: Mutex::new(HashMap::new()),
            failing: Mutex::new(Vec::new()),
        }
    }

    pub fn with_programs(self, platform: Platform, programs: Vec<Value>) -> Self {
        self.set_programs(platform, programs);
        self
    }

    pub fn with_failure(self, platform: Platform) -> Self {
        self.failing.lock().unwrap().push(platform);
        self
    }

    /// Replace a platform's feed between runs.
    pub fn set_programs(&self, platform: Platform, programs: Vec<Value>) {
        self.feeds.lock().unwrap().insert(platform, programs);
    }
}

impl Default for MockFeedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedFetcher for MockFeedFetcher {
    async fn fetch(&self, platform: Platform) -> Result<Vec<Value>> {
        if self.failing.lock().unwrap().contains(&platform) {
            return Err(AppError::feed(platform, "HTTP status 503"));
        }
        Ok(self
            .feeds
            .lock()
            .unwrap()
            .get(&platform)
            .cloned()
            .unwrap_or_default())
    }
}
