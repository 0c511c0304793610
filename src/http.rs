// Shared HTTP client utilities

use crate::constants;
use anyhow::Result;
use reqwest::{Client, Response};
use std::time::Duration;

/// User-Agent string for all HTTP requests
const USER_AGENT: &str = concat!("pslauncher/", env!("CARGO_PKG_VERSION"));

lazy_static::lazy_static! {
    /// Client for short requests; callers set a per-request timeout
    static ref CLIENT: Client = Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to create HTTP client");

    /// Client for large downloads. The timeouts bound connecting and each
    /// read, not the whole transfer, so a multi-gigabyte client ZIP is not
    /// cut off while data keeps arriving.
    static ref DOWNLOAD_CLIENT: Client = Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(constants::DOWNLOAD_TIMEOUT_SECS))
        .read_timeout(Duration::from_secs(constants::DOWNLOAD_TIMEOUT_SECS))
        .build()
        .expect("Failed to create download client");
}

/// Fetch a short text body, failing on any non-success status
pub async fn fetch_text(url: &str, timeout: Duration) -> Result<String> {
    let response: Response = CLIENT.get(url).timeout(timeout).send().await?;

    if !response.status().is_success() {
        anyhow::bail!("HTTP request failed: {} ({})", url, response.status());
    }

    Ok(response.text().await?)
}

/// Start a streamed download, failing on any non-success status
pub async fn download_response(url: &str) -> Result<Response> {
    let response: Response = DOWNLOAD_CLIENT.get(url).send().await?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed: {} ({})", url, response.status());
    }

    Ok(response)
}
