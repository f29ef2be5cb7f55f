//! Per-company pipeline: scrape revenue, fetch prices, render the chart.
//!
//! Each call owns everything it builds, so running companies one after the
//! other never carries data from one into the next.

use crate::core::chart::{self, ChartOutput, ChartSize, ChartWindow};
use crate::core::config::Company;
use crate::core::extract::{TableSelector, extract};
use crate::core::page::PageFetcher;
use crate::core::price::PriceHistoryProvider;
use crate::core::revenue::RevenueSeries;
use anyhow::{Context, Result};
use tracing::debug;

pub async fn fetch_revenue(
    company: &Company,
    selector: &TableSelector,
    fetcher: &dyn PageFetcher,
) -> Result<RevenueSeries> {
    let markup = fetcher
        .fetch_page(&company.revenue_url)
        .await
        .with_context(|| format!("Failed to fetch revenue page for {}", company.name))?;
    let revenue = extract(&markup, selector)
        .with_context(|| format!("Failed to extract revenue for {}", company.name))?;
    debug!(company = %company.name, rows = revenue.len(), "Scraped revenue");
    Ok(revenue)
}

pub async fn chart_company(
    company: &Company,
    selector: &TableSelector,
    fetcher: &dyn PageFetcher,
    price_provider: &dyn PriceHistoryProvider,
    window: &ChartWindow,
    size: ChartSize,
) -> Result<ChartOutput> {
    let revenue = fetch_revenue(company, selector, fetcher).await?;
    let prices = price_provider
        .fetch_history(&company.symbol)
        .await
        .with_context(|| {
            format!(
                "Failed to fetch price history for {} ({})",
                company.name, company.symbol
            )
        })?;

    chart::render(&prices, &revenue, &company.name, window, size)
        .with_context(|| format!("Failed to render chart for {}", company.name))
}
