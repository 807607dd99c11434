// HTTP client for news sites — plain GETs returning page HTML.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

const USER_AGENT: &str = "newsbuzz/0.1 (hottest-topic finder)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Thin reqwest wrapper shared by every site adapter.
#[derive(Clone)]
pub struct NewsClient {
    client: reqwest::Client,
}

impl NewsClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }

    /// Fetch a page and return its body. Non-success statuses are errors.
    pub async fn get_html(&self, url: &str) -> Result<String> {
        debug!(url = url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request failed: {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("{url} returned {status}");
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to read body of {url}"))
    }
}
