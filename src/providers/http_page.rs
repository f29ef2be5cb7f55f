use crate::core::page::PageFetcher;
use crate::providers::util::{RequestPolicy, with_retry};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Fetches revenue pages over plain HTTP GET.
pub struct HttpPageFetcher {
    policy: RequestPolicy,
}

impl HttpPageFetcher {
    pub fn new(policy: RequestPolicy) -> Self {
        HttpPageFetcher { policy }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    #[instrument(name = "PageFetch", skip(self))]
    async fn fetch_page(&self, url: &str) -> Result<String> {
        debug!("Requesting page {}", url);

        let client = self.policy.client()?;
        let response = with_retry(
            || client.get(url).send(),
            self.policy.retries,
            self.policy.retry_delay_ms,
        )
        .await
        .with_context(|| format!("Failed to send request for page: {url}"))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} for page: {}", response.status(), url));
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to get response text for page: {url}"))?;
        debug!(bytes = body.len(), "Received page");
        Ok(body)
    }
}
