// src/services/notifier.rs

//! Notification dispatch for newly detected assets.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{Asset, NotifierConfig};
use crate::utils::http::create_async_client;

/// Outbound message channel.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Whether credentials are present.
    fn is_configured(&self) -> bool;

    /// Deliver one message.
    async fn send(&self, text: &str) -> Result<()>;
}

/// Telegram Bot API channel.
pub struct TelegramChannel {
    client: Client,
    api_base: String,
    bot_token: Option<String>,
    chat_id: Option<String>,
}

impl TelegramChannel {
    pub fn new(config: &NotifierConfig) -> Result<Self> {
        let client = create_async_client(
            concat!("bounty-watch/", env!("CARGO_PKG_VERSION")),
            Duration::from_secs(config.timeout_secs),
        )?;
        let trimmed = |v: &Option<String>| v.as_deref().map(|s| s.trim().to_string());
        let (bot_token, chat_id) = if config.is_configured() {
            (trimmed(&config.bot_token), trimmed(&config.chat_id))
        } else {
            (None, None)
        };

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token,
            chat_id,
        })
    }
}

#[async_trait]
impl NotificationChannel for TelegramChannel {
    fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }

    async fn send(&self, text: &str) -> Result<()> {
        let (Some(token), Some(chat_id)) = (&self.bot_token, &self.chat_id) else {
            return Err(AppError::NotConfigured);
        };

        let url = format!("{}/bot{}/sendMessage", self.api_base, token);
        self.client
            .post(&url)
            .form(&[("chat_id", chat_id.as_str()), ("text", text)])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            // The token is part of the URL; keep it out of logs.
            .map_err(|e| AppError::notify(e.without_url()))?;
        Ok(())
    }
}

/// Render the announcement for a new asset.
pub fn format_message<Tz: TimeZone>(asset: &Asset, found_at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "🆕 New Asset Found\n\
         🔍 Asset: {}\n\
         🏢 Program: {}\n\
         🌐 Platform: {}\n\
         📋 Type: {}\n\
         💸 Bounty Eligible: YES\n\
         Found at {}",
        asset.identifier,
        asset.program,
        asset.platform,
        asset.asset_type.as_str().to_uppercase(),
        found_at.format("%Y-%m-%d %H:%M:%S")
    )
}

/// Delivery counters for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
    /// False when the batch was skipped for missing credentials
    pub configured: bool,
}

/// Sends one message per asset, isolating per-item failures.
pub struct Dispatcher {
    channel: Arc<dyn NotificationChannel>,
    pause: Duration,
}

impl Dispatcher {
    pub fn new(channel: Arc<dyn NotificationChannel>, pause: Duration) -> Self {
        Self { channel, pause }
    }

    pub fn is_configured(&self) -> bool {
        self.channel.is_configured()
    }

    /// Announce every asset once. Never retries and never aborts the batch.
    pub async fn dispatch(&self, assets: &[&Asset]) -> DispatchReport {
        if !self.channel.is_configured() {
            log::warn!(
                "Notification channel not configured; skipping {} alerts",
                assets.len()
            );
            return DispatchReport::default();
        }

        let mut report = DispatchReport {
            configured: true,
            ..DispatchReport::default()
        };

        for (i, asset) in assets.iter().enumerate() {
            if i > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }

            report.attempted += 1;
            let message = format_message(asset, &Local::now());
            match self.channel.send(&message).await {
                Ok(()) => {
                    report.delivered += 1;
                    log::info!("Sent alert for: {}", asset.identifier);
                }
                Err(e) => {
                    report.failed += 1;
                    log::error!("Failed to send alert for {}: {}", asset.identifier, e);
                }
            }
        }

        report
    }
}
