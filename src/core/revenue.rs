//! Scraped revenue figures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date label formats seen in revenue tables, tried in order.
const DATE_LABEL_FORMATS: [&str; 3] = ["%Y-%m-%d", "%b %d, %Y", "%B %d, %Y"];

/// One row of a revenue table.
///
/// The date is kept as the label found in the page; use [`RevenueRecord::date`]
/// to place it on a calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRecord {
    pub date_label: String,
    pub revenue: f64,
}

impl RevenueRecord {
    pub fn new(date_label: impl Into<String>, revenue: f64) -> Self {
        Self {
            date_label: date_label.into(),
            revenue,
        }
    }

    /// Parses the date label, returning `None` if it matches no known format.
    pub fn date(&self) -> Option<NaiveDate> {
        parse_date_label(&self.date_label)
    }
}

/// Revenue rows in source document order.
pub type RevenueSeries = Vec<RevenueRecord>;

pub fn parse_date_label(label: &str) -> Option<NaiveDate> {
    let label = label.trim();
    DATE_LABEL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(label, fmt).ok())
}
