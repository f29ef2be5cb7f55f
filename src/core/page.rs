//! Source of raw markup for revenue pages.

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the body text of the page at `url`.
    async fn fetch_page(&self, url: &str) -> Result<String>;
}
