use std::sync::Mutex;

use async_trait::async_trait;
use bounty_watch::error::{AppError, Result};
use bounty_watch::services::NotificationChannel;

/// Mock NotificationChannel recording every message it accepts
pub struct MockNotificationChannel {
    configured: bool,
    fail_containing: Option<String>,
    pub sent: Mutex<Vec<String>>,
    pub attempts: Mutex<usize>,
}

impl MockNotificationChannel {
    pub fn new() -> Self {
        Self {
            configured: true,
            fail_containing: None,
            sent: Mutex::new(Vec::new()),
            attempts: Mutex::new(0),
        }
    }

    /// Fail any message whose text contains `needle`.
    pub fn failing_on(needle: &str) -> Self {
        Self {
            fail_containing: Some(needle.to_string()),
            ..Self::new()
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn attempt_count(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

impl Default for MockNotificationChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationChannel for MockNotificationChannel {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn send(&self, text: &str) -> Result<()> {
        *self.attempts.lock().unwrap() += 1;
        if let Some(needle) = &self.fail_containing {
            if text.contains(needle.as_str()) {
                return Err(AppError::notify("Mock channel failure"));
            }
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
