//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Platform;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream feed endpoints and HTTP behavior
    #[serde(default)]
    pub feeds: FeedConfig,

    /// Notification channel settings
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Snapshot persistence
    #[serde(default)]
    pub storage: StorageConfig,

    /// Run result shaping
    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup("TELEGRAM_BOT_TOKEN") {
            self.notifier.bot_token = non_empty(token);
        }
        if let Some(chat_id) = lookup("TELEGRAM_USER_ID") {
            self.notifier.chat_id = non_empty(chat_id);
        }

        if let Some(timeout) = lookup("FEED_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.feeds.timeout_secs = secs;
            }
        }

        if let Some(pause) = lookup("NOTIFY_PAUSE_MS") {
            if let Ok(ms) = pause.parse() {
                self.notifier.pause_ms = ms;
            }
        }

        if let Some(max) = lookup("MAX_REPORTED_URLS") {
            if let Ok(n) = max.parse() {
                self.report.max_urls = Some(n);
            }
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.feeds.user_agent.trim().is_empty() {
            return Err(AppError::validation("feeds.user_agent is empty"));
        }
        if self.feeds.hackerone_url.trim().is_empty() {
            return Err(AppError::validation("feeds.hackerone_url is empty"));
        }
        if self.feeds.bugcrowd_url.trim().is_empty() {
            return Err(AppError::validation("feeds.bugcrowd_url is empty"));
        }
        url::Url::parse(&self.feeds.hackerone_url)?;
        url::Url::parse(&self.feeds.bugcrowd_url)?;
        if self.feeds.timeout_secs == 0 {
            return Err(AppError::validation("feeds.timeout_secs must be > 0"));
        }
        if self.notifier.timeout_secs == 0 {
            return Err(AppError::validation("notifier.timeout_secs must be > 0"));
        }
        if self.storage.snapshot_file.trim().is_empty() {
            return Err(AppError::validation("storage.snapshot_file is empty"));
        }
        Ok(())
    }
}

/// Upstream feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "defaults::hackerone_url")]
    pub hackerone_url: String,

    #[serde(default = "defaults::bugcrowd_url")]
    pub bugcrowd_url: String,

    /// Per-feed request timeout in seconds
    #[serde(default = "defaults::feed_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl FeedConfig {
    /// Endpoint for a platform's feed.
    pub fn url_for(&self, platform: Platform) -> &str {
        match platform {
            Platform::HackerOne => &self.hackerone_url,
            Platform::Bugcrowd => &self.bugcrowd_url,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            hackerone_url: defaults::hackerone_url(),
            bugcrowd_url: defaults::bugcrowd_url(),
            timeout_secs: defaults::feed_timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Notification channel settings.
///
/// Credentials normally come from `TELEGRAM_BOT_TOKEN` / `TELEGRAM_USER_ID`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    #[serde(default = "defaults::api_base")]
    pub api_base: String,

    #[serde(default)]
    pub bot_token: Option<String>,

    #[serde(default)]
    pub chat_id: Option<String>,

    /// Per-message request timeout in seconds
    #[serde(default = "defaults::notify_timeout")]
    pub timeout_secs: u64,

    /// Pause between consecutive sends in milliseconds
    #[serde(default = "defaults::pause")]
    pub pause_ms: u64,
}

impl NotifierConfig {
    /// Both credentials present and non-empty.
    pub fn is_configured(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.bot_token) && present(&self.chat_id)
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::api_base(),
            bot_token: None,
            chat_id: None,
            timeout_secs: defaults::notify_timeout(),
            pause_ms: defaults::pause(),
        }
    }
}

/// Snapshot persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Snapshot file name, relative to the storage directory
    #[serde(default = "defaults::snapshot_file")]
    pub snapshot_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_file: defaults::snapshot_file(),
        }
    }
}

/// Run result shaping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Cap on probe URLs included in a run result (unbounded when unset)
    #[serde(default)]
    pub max_urls: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl LoggingConfig {
    /// Parsed level, `info` when the configured name is not a level.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.trim().parse().unwrap_or_else(|_| {
            log::warn!("Unknown logging.level '{}', using info", self.level);
            log::LevelFilter::Info
        })
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

mod defaults {
    // Feed defaults
    pub fn hackerone_url() -> String {
        "https://raw.githubusercontent.com/arkadiyt/bounty-targets-data/master/data/hackerone_data.json".into()
    }
    pub fn bugcrowd_url() -> String {
        "https://raw.githubusercontent.com/arkadiyt/bounty-targets-data/master/data/bugcrowd_data.json".into()
    }
    pub fn feed_timeout() -> u64 {
        30
    }
    pub fn user_agent() -> String {
        concat!("bounty-watch/", env!("CARGO_PKG_VERSION")).into()
    }

    // Notifier defaults
    pub fn api_base() -> String {
        "https://api.telegram.org".into()
    }
    pub fn notify_timeout() -> u64 {
        10
    }
    pub fn pause() -> u64 {
        100
    }

    pub fn snapshot_file() -> String {
        "snapshot.json".into()
    }

    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.feeds.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.feeds.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_feed_url() {
        let mut config = Config::default();
        config.feeds.bugcrowd_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [notifier]
            pause_ms = 0

            [report]
            max_urls = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.notifier.pause_ms, 0);
        assert_eq!(config.notifier.timeout_secs, 10);
        assert_eq!(config.report.max_urls, Some(50));
        assert_eq!(config.feeds.timeout_secs, 30);
        assert_eq!(config.storage.snapshot_file, "snapshot.json");
    }

    #[test]
    fn env_overrides_credentials() {
        let mut config = Config::default();
        assert!(!config.notifier.is_configured());

        config.apply_overrides(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("TELEGRAM_USER_ID", "42"),
            ("NOTIFY_PAUSE_MS", "250"),
        ]));

        assert!(config.notifier.is_configured());
        assert_eq!(config.notifier.pause_ms, 250);
    }

    #[test]
    fn empty_credentials_are_absent() {
        let mut config = Config::default();
        config.apply_overrides(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("TELEGRAM_USER_ID", ""),
        ]));
        assert!(config.notifier.chat_id.is_none());
        assert!(!config.notifier.is_configured());
    }

    #[test]
    fn logging_level_parses() {
        let config: Config = toml::from_str("[logging]\nlevel = \"DEBUG\"").unwrap();
        assert_eq!(config.logging.level_filter(), log::LevelFilter::Debug);

        assert_eq!(
            LoggingConfig::default().level_filter(),
            log::LevelFilter::Info
        );

        let loud = LoggingConfig {
            level: "chatty".to_string(),
        };
        assert_eq!(loud.level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        assert!(matches!(Config::load(&path), Err(AppError::Io(_))));

        std::fs::write(&path, "[notifier\npause_ms = 0").unwrap();
        assert!(matches!(Config::load(&path), Err(AppError::Toml(_))));
        assert_eq!(Config::load_or_default(&path).notifier.pause_ms, 100);
    }

    #[test]
    fn unparsable_overrides_are_ignored() {
        let mut config = Config::default();
        config.apply_overrides(lookup(&[("FEED_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.feeds.timeout_secs, 30);
    }
}
