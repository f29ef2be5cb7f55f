use crate::core::price::{PriceHistoryProvider, PriceRecord, PriceSeries};
use crate::providers::util::{RequestPolicy, with_retry};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use tracing::{debug, instrument};

/// Pairs each timestamp with its close, dropping days without a close.
fn extract_daily_closes(chart_item: &PriceChartItem) -> PriceSeries {
    let (Some(timestamps), Some(closes)) = (
        chart_item.timestamp.as_ref(),
        chart_item
            .indicators
            .as_ref()
            .and_then(|inds| inds.quote.first())
            .and_then(|q| q.close.as_ref()),
    ) else {
        return PriceSeries::new();
    };

    timestamps
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let close = (*close)?;
            let date = Utc.timestamp_opt(*ts, 0).single()?.date_naive();
            Some(PriceRecord { date, close })
        })
        .collect()
}

pub struct YahooFinanceProvider {
    base_url: String,
    policy: RequestPolicy,
}

impl YahooFinanceProvider {
    pub fn new(base_url: &str, policy: RequestPolicy) -> Self {
        YahooFinanceProvider {
            base_url: base_url.to_string(),
            policy,
        }
    }
}

#[derive(Deserialize, Debug)]
struct YahooChartResponse {
    chart: PriceChartResult,
}

#[derive(Deserialize, Debug)]
struct PriceChartResult {
    result: Option<Vec<PriceChartItem>>,
    error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
struct ChartError {
    description: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize, Debug)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Deserialize, Debug)]
struct PriceChartItem {
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[async_trait]
impl PriceHistoryProvider for YahooFinanceProvider {
    #[instrument(
        name = "YahooHistoryFetch",
        skip(self),
        fields(symbol = %symbol)
    )]
    async fn fetch_history(&self, symbol: &str) -> Result<PriceSeries> {
        // Yahoo serves quarterly bars for `range=max`; a period stays daily
        let url = format!(
            "{}/v8/finance/chart/{}?period1=0&period2={}&interval=1d",
            self.base_url,
            symbol,
            Utc::now().timestamp()
        );
        debug!("Requesting price history from {}", url);

        let client = self.policy.client()?;
        let response = with_retry(
            || client.get(&url).send(),
            self.policy.retries,
            self.policy.retry_delay_ms,
        )
        .await
        .with_context(|| format!("Request error for symbol: {symbol} URL: {url}"))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            ));
        }

        let text = response.text().await?;
        let data: YahooChartResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))?;

        if let Some(error) = data.chart.error {
            return Err(anyhow!(
                "Yahoo Finance error for symbol {}: {}",
                symbol,
                error.description.unwrap_or_else(|| "unknown".to_string())
            ));
        }

        let item = data
            .chart
            .result
            .and_then(|items| items.into_iter().next())
            .ok_or_else(|| anyhow!("No price data found for symbol: {}", symbol))?;

        let history = extract_daily_closes(&item);
        debug!(points = history.len(), "Received price history");
        Ok(history)
    }
}
