//! Share price history types and the provider abstraction

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Closing price of a ticker on a trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub close: f64,
}

/// Daily price history in the order the provider returned it.
pub type PriceSeries = Vec<PriceRecord>;

#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Fetches the full available daily history for `symbol`.
    async fn fetch_history(&self, symbol: &str) -> Result<PriceSeries>;
}
