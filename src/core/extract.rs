//! Extraction of revenue rows from an HTML table.

use crate::core::revenue::{RevenueRecord, RevenueSeries};
use anyhow::{Context, Result, anyhow, bail};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::debug;

/// How the data table is located inside a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum TableSelector {
    /// The `index`-th `<tbody>` in document order, zero based.
    ///
    /// Note that the HTML parser inserts a `<tbody>` into tables that do not
    /// declare one, so those count too.
    NthTableBody { index: usize },
    /// The first element matching a CSS selector.
    Css { selector: String },
}

impl Default for TableSelector {
    /// The second table body, which is where revenue pages keep the
    /// quarterly figures.
    fn default() -> Self {
        TableSelector::NthTableBody { index: 1 }
    }
}

impl Display for TableSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableSelector::NthTableBody { index } => write!(f, "table body #{index}"),
            TableSelector::Css { selector } => write!(f, "selector '{selector}'"),
        }
    }
}

impl TableSelector {
    fn locate<'a>(&self, document: &'a Html) -> Result<ElementRef<'a>> {
        match self {
            TableSelector::NthTableBody { index } => {
                let tbody = parse_selector("tbody")?;
                let bodies: Vec<ElementRef<'a>> = document.select(&tbody).collect();
                let found = bodies.len();
                bodies.into_iter().nth(*index).ok_or_else(|| {
                    anyhow!(
                        "Expected at least {} table bodies but found {}",
                        index + 1,
                        found
                    )
                })
            }
            TableSelector::Css { selector } => {
                let parsed = parse_selector(selector)?;
                document
                    .select(&parsed)
                    .next()
                    .ok_or_else(|| anyhow!("No element matches selector '{selector}'"))
            }
        }
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("Invalid CSS selector '{selector}': {e}"))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Strips currency symbols and thousands separators from an amount.
///
/// Applying it to an already clean string returns the same string.
pub fn clean_amount(raw: &str) -> String {
    raw.replace(['$', ','], "").trim().to_string()
}

/// Extracts the revenue series from `markup`.
///
/// Every row of the selected table with at least two `<td>` cells yields a
/// record from its first two cells, unless the amount is empty once cleaned.
/// Rows keep their document order.
pub fn extract(markup: &str, selector: &TableSelector) -> Result<RevenueSeries> {
    let document = Html::parse_document(markup);
    let table = selector
        .locate(&document)
        .with_context(|| format!("Failed to locate revenue table using {selector}"))?;

    let row_selector = parse_selector("tr")?;
    let cell_selector = parse_selector("td")?;

    let mut series = RevenueSeries::new();
    let mut skipped = 0;
    for row in table.select(&row_selector) {
        let cells: Vec<String> = row.select(&cell_selector).take(2).map(cell_text).collect();
        let [date_label, raw_amount] = cells.as_slice() else {
            skipped += 1;
            continue;
        };

        let amount = clean_amount(raw_amount);
        if amount.is_empty() {
            skipped += 1;
            continue;
        }

        let revenue: f64 = amount
            .parse()
            .with_context(|| format!("Invalid revenue '{raw_amount}' for row '{date_label}'"))?;
        if !revenue.is_finite() || revenue < 0.0 {
            bail!("Revenue must be a non-negative amount, got '{raw_amount}' for row '{date_label}'");
        }

        series.push(RevenueRecord::new(date_label.as_str(), revenue));
    }

    debug!(
        rows = series.len(),
        skipped, "Extracted revenue rows using {selector}"
    );
    Ok(series)
}
