// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;

/// Create a configured asynchronous HTTP client.
///
/// `timeout` bounds each request end to end.
pub fn create_async_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?;
    Ok(client)
}
