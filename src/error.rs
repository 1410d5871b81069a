// src/error.rs

//! Unified error handling for the monitor.

use std::fmt;

use thiserror::Error;

use crate::models::Platform;

/// Result type alias for monitor operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// AWS S3 error
    #[error("S3 error: {0}")]
    S3(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upstream feed could not be used
    #[error("Feed error for {platform}: {message}")]
    Feed { platform: Platform, message: String },

    /// Notification delivery failed
    #[error("Notification error: {0}")]
    Notify(String),

    /// Notification channel has no credentials
    #[error("Notification channel not configured")]
    NotConfigured,
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a feed error for a platform.
    pub fn feed(platform: Platform, message: impl fmt::Display) -> Self {
        Self::Feed {
            platform,
            message: message.to_string(),
        }
    }

    /// Create a notification error.
    pub fn notify(message: impl fmt::Display) -> Self {
        Self::Notify(message.to_string())
    }

    /// Create an S3 error.
    pub fn s3(message: impl fmt::Display) -> Self {
        Self::S3(message.to_string())
    }
}
