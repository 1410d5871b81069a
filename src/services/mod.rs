//! Service layer for the monitor.
//!
//! This module contains the business logic for:
//! - Scope entry canonicalization (`canonicalize`)
//! - Feed fetching and aggregation (`FeedAggregator`)
//! - Probe URL expansion (`expand`)
//! - Notification dispatch (`Dispatcher`)

pub mod canonicalize;
pub mod expand;
pub mod feeds;
pub mod notifier;

pub use canonicalize::{Canonical, SkipReason, canonicalize};
pub use expand::{expand, probe_urls};
pub use feeds::{FeedAggregator, FeedFetcher, FeedOutcome, FeedStats, HttpFeedFetcher};
pub use notifier::{DispatchReport, Dispatcher, NotificationChannel, TelegramChannel};
