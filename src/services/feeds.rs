// src/services/feeds.rs

//! Feed aggregator.
//!
//! Fetches both upstream feeds, tags every program record with its platform
//! at ingestion, and folds all scope entries into one [`AssetMapping`].

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{AssetMapping, FeedConfig, Platform, ProgramRecord};
use crate::services::canonicalize::{Canonical, canonicalize};
use crate::utils::http::create_async_client;

/// Source of raw program records for a platform.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetch the top-level array of program records.
    async fn fetch(&self, platform: Platform) -> Result<Vec<Value>>;
}

/// Fetches feeds over HTTP.
pub struct HttpFeedFetcher {
    client: Client,
    config: FeedConfig,
}

impl HttpFeedFetcher {
    pub fn new(config: FeedConfig) -> Result<Self> {
        let client =
            create_async_client(&config.user_agent, Duration::from_secs(config.timeout_secs))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, platform: Platform) -> Result<Vec<Value>> {
        let url = self.config.url_for(platform);
        log::info!("Fetching {} data from {}", platform, url);

        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_feed(platform, &body)
    }
}

/// Parse a feed body, requiring a top-level JSON array.
pub fn parse_feed(platform: Platform, body: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| AppError::feed(platform, format!("invalid JSON: {e}")))?;
    match value {
        Value::Array(programs) => Ok(programs),
        _ => Err(AppError::feed(platform, "top-level value is not an array")),
    }
}

/// Counters collected while folding records into a mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedStats {
    /// Program records per platform
    pub programs: BTreeMap<Platform, usize>,
    /// Scope entries examined
    pub scope_entries: usize,
    /// Entries that became assets (before de-duplication)
    pub accepted: usize,
    /// Skipped entries by reason label
    pub skipped: BTreeMap<&'static str, usize>,
    /// Accepted entries whose key was already present
    pub duplicates: usize,
    /// Program records whose scope list could not be read
    pub malformed_programs: usize,
}

impl FeedStats {
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// Result of a successful aggregation.
#[derive(Debug, Clone, Default)]
pub struct FeedOutcome {
    pub assets: AssetMapping,
    pub stats: FeedStats,
}

/// Combines the upstream feeds into the current asset mapping.
pub struct FeedAggregator<'a> {
    fetcher: &'a dyn FeedFetcher,
}

impl<'a> FeedAggregator<'a> {
    pub fn new(fetcher: &'a dyn FeedFetcher) -> Self {
        Self { fetcher }
    }

    /// Fetch every platform's feed in turn and build the current mapping.
    ///
    /// Any single feed failure fails the whole aggregation.
    pub async fn aggregate(&self) -> Result<FeedOutcome> {
        let mut records = Vec::new();
        for platform in Platform::ALL {
            let programs = self.fetcher.fetch(platform).await.map_err(|e| match e {
                AppError::Feed { .. } => e,
                other => AppError::feed(platform, other),
            })?;
            log::info!("{}: {} programs", platform, programs.len());
            records.extend(
                programs
                    .into_iter()
                    .map(|raw| ProgramRecord::new(platform, raw)),
            );
        }

        let outcome = fold_records(&records);
        log::info!(
            "Found {} total assets ({} entries, {} skipped, {} duplicates)",
            outcome.assets.len(),
            outcome.stats.scope_entries,
            outcome.stats.skipped_total(),
            outcome.stats.duplicates
        );
        Ok(outcome)
    }
}

/// Fold tagged program records into an asset mapping.
///
/// Later duplicates of an identity key overwrite earlier ones.
pub fn fold_records(records: &[ProgramRecord]) -> FeedOutcome {
    let mut outcome = FeedOutcome::default();

    for record in records {
        *outcome.stats.programs.entry(record.platform).or_default() += 1;

        let entries = match record.in_scope() {
            Ok(entries) => entries,
            Err(reason) => {
                outcome.stats.malformed_programs += 1;
                log::warn!(
                    "Skipping malformed {} program '{}': {}",
                    record.platform,
                    record.name(),
                    reason
                );
                continue;
            }
        };

        let program = record.name();
        for entry in entries {
            outcome.stats.scope_entries += 1;
            match canonicalize(program, record.platform, entry) {
                Canonical::Asset(asset) => {
                    outcome.stats.accepted += 1;
                    if outcome.assets.insert(asset).is_some() {
                        outcome.stats.duplicates += 1;
                    }
                }
                Canonical::Skipped(reason) => {
                    log::debug!("Skipping scope entry in '{}': {}", program, reason);
                    *outcome.stats.skipped.entry(reason.label()).or_default() += 1;
                }
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetType;
    use serde_json::json;

    fn scope(id: &str, asset_type: &str, eligible: bool) -> Value {
        json!({
            "asset_identifier": id,
            "asset_type": asset_type,
            "eligible_for_bounty": eligible
        })
    }

    fn program(name: &str, in_scope: Vec<Value>) -> Value {
        json!({ "name": name, "targets": { "in_scope": in_scope } })
    }

    struct StaticFeeds {
        hackerone: Result<Vec<Value>>,
        bugcrowd: Vec<Value>,
    }

    #[async_trait]
    impl FeedFetcher for StaticFeeds {
        async fn fetch(&self, platform: Platform) -> Result<Vec<Value>> {
            match platform {
                Platform::HackerOne => match &self.hackerone {
                    Ok(v) => Ok(v.clone()),
                    Err(e) => Err(AppError::feed(platform, e)),
                },
                Platform::Bugcrowd => Ok(self.bugcrowd.clone()),
            }
        }
    }

    /// Serve `response` verbatim to every connection on a local port.
    async fn serve(response: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}/data.json")
    }

    fn http_fetcher(url: &str) -> HttpFeedFetcher {
        HttpFeedFetcher::new(FeedConfig {
            hackerone_url: url.to_string(),
            bugcrowd_url: url.to_string(),
            timeout_secs: 5,
            ..FeedConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_http_error_status_fails_aggregation() {
        let url = serve(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let fetcher = http_fetcher(&url);

        let err = FeedAggregator::new(&fetcher).aggregate().await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Feed {
                platform: Platform::HackerOne,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_http_non_array_body_fails_aggregation() {
        let url = serve(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}",
        )
        .await;
        let fetcher = http_fetcher(&url);

        let err = FeedAggregator::new(&fetcher).aggregate().await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Feed {
                platform: Platform::HackerOne,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_connection_refused_becomes_feed_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let fetcher = http_fetcher(&format!("http://{addr}/data.json"));

        let err = FeedAggregator::new(&fetcher).aggregate().await.unwrap_err();
        match err {
            AppError::Feed { platform, message } => {
                assert_eq!(platform, Platform::HackerOne);
                assert!(message.starts_with("HTTP error"));
            }
            other => panic!("expected feed error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_feed_round_trip() {
        let url = serve(concat!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 121\r\nConnection: close\r\n\r\n",
            r#"[{"name":"Acme","targets":{"in_scope":[{"asset_identifier":"acme.test","asset_type":"URL","eligible_for_bounty":true}]}}]"#,
        ))
        .await;
        let fetcher = http_fetcher(&url);

        let outcome = FeedAggregator::new(&fetcher).aggregate().await.unwrap();
        assert_eq!(outcome.assets.len(), 2);
        assert!(outcome.assets.contains_key("acme.test|Acme|HackerOne"));
        assert!(outcome.assets.contains_key("acme.test|Acme|Bugcrowd"));
    }

    #[test]
    fn test_parse_feed_requires_array() {
        assert_eq!(parse_feed(Platform::HackerOne, "[]").unwrap().len(), 0);
        assert!(parse_feed(Platform::HackerOne, r#"{"programs": []}"#).is_err());
        assert!(parse_feed(Platform::Bugcrowd, "<html>").is_err());
    }

    #[test]
    fn test_fold_filters_and_counts() {
        let records = vec![ProgramRecord::new(
            Platform::HackerOne,
            program(
                "Acme",
                vec![
                    scope("acme.test", "url", true),
                    scope("*.acme.test", "wildcard", true),
                    scope("cdn.acme.test", "url", false),
                    scope("10.0.0.0/8", "cidr", true),
                    json!({ "asset_identifier": 7, "asset_type": "url" }),
                ],
            ),
        )];

        let outcome = fold_records(&records);
        assert_eq!(outcome.assets.len(), 2);
        assert_eq!(outcome.stats.scope_entries, 5);
        assert_eq!(outcome.stats.skipped.get("not_eligible"), Some(&1));
        assert_eq!(outcome.stats.skipped.get("unsupported_type"), Some(&1));
        assert_eq!(outcome.stats.skipped.get("malformed"), Some(&1));
        assert!(outcome.assets.contains_key("*.acme.test|Acme|HackerOne"));
    }

    #[test]
    fn test_fold_last_duplicate_wins() {
        let records = vec![
            ProgramRecord::new(
                Platform::Bugcrowd,
                program("Acme", vec![scope("acme.test", "url", true)]),
            ),
            ProgramRecord::new(
                Platform::Bugcrowd,
                program("Acme", vec![scope("acme.test", "wildcard", true)]),
            ),
        ];

        let outcome = fold_records(&records);
        assert_eq!(outcome.assets.len(), 1);
        assert_eq!(outcome.stats.duplicates, 1);
        assert_eq!(
            outcome
                .assets
                .get("acme.test|Acme|Bugcrowd")
                .map(|a| a.asset_type),
            Some(AssetType::Wildcard)
        );
    }

    #[test]
    fn test_fold_tolerates_missing_and_broken_targets() {
        let records = vec![
            ProgramRecord::new(Platform::HackerOne, json!({ "name": "NoTargets" })),
            ProgramRecord::new(
                Platform::HackerOne,
                json!({ "name": "Broken", "targets": { "in_scope": 5 } }),
            ),
            ProgramRecord::new(
                Platform::HackerOne,
                program("Fine", vec![scope("fine.test", "url", true)]),
            ),
        ];

        let outcome = fold_records(&records);
        assert_eq!(outcome.assets.len(), 1);
        assert_eq!(outcome.stats.malformed_programs, 1);
        assert_eq!(outcome.stats.programs.get(&Platform::HackerOne), Some(&3));
    }

    #[tokio::test]
    async fn test_same_program_name_on_both_platforms() {
        let feeds = StaticFeeds {
            hackerone: Ok(vec![program("Shared", vec![scope("shared.test", "url", true)])]),
            bugcrowd: vec![program("Shared", vec![scope("shared.test", "url", true)])],
        };

        let outcome = FeedAggregator::new(&feeds).aggregate().await.unwrap();
        assert_eq!(outcome.assets.len(), 2);
        assert!(outcome.assets.contains_key("shared.test|Shared|HackerOne"));
        assert!(outcome.assets.contains_key("shared.test|Shared|Bugcrowd"));
    }

    #[tokio::test]
    async fn test_any_feed_failure_fails_aggregation() {
        let feeds = StaticFeeds {
            hackerone: Err(AppError::validation("connection reset")),
            bugcrowd: vec![program("B", vec![scope("b.test", "url", true)])],
        };

        let err = FeedAggregator::new(&feeds).aggregate().await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Feed {
                platform: Platform::HackerOne,
                ..
            }
        ));
    }
}
