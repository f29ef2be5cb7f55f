//! Two-panel price and revenue charts.

use crate::core::price::PriceRecord;
use crate::core::revenue::RevenueRecord;
use anyhow::{Result, anyhow};
use chrono::{Duration, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::{debug, warn};

pub const PRICE_PANEL_TITLE: &str = "Historical Share Price";
pub const REVENUE_PANEL_TITLE: &str = "Historical Revenue";
pub const PRICE_AXIS_LABEL: &str = "Price ($US)";
pub const REVENUE_AXIS_LABEL: &str = "Revenue ($US Millions)";
const DATE_AXIS_LABEL: &str = "Date";

type Point = (NaiveDate, f64);

/// Inclusive cutoff dates applied to each series before charting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartWindow {
    pub price_cutoff: NaiveDate,
    pub revenue_cutoff: NaiveDate,
}

impl Default for ChartWindow {
    fn default() -> Self {
        ChartWindow {
            price_cutoff: NaiveDate::from_ymd_opt(2021, 6, 14).expect("valid cutoff date"),
            revenue_cutoff: NaiveDate::from_ymd_opt(2021, 4, 30).expect("valid cutoff date"),
        }
    }
}

impl ChartWindow {
    /// Price points dated on or before the price cutoff, in input order.
    pub fn price_points(&self, prices: &[PriceRecord]) -> Vec<Point> {
        prices
            .iter()
            .filter(|p| p.date <= self.price_cutoff)
            .map(|p| (p.date, p.close))
            .collect()
    }

    /// Revenue points dated on or before the revenue cutoff, in input order.
    ///
    /// Records whose date label cannot be parsed are left out.
    pub fn revenue_points(&self, revenue: &[RevenueRecord]) -> Vec<Point> {
        revenue
            .iter()
            .filter_map(|r| match r.date() {
                Some(date) => Some((date, r.revenue)),
                None => {
                    warn!(label = %r.date_label, "Skipping revenue row with unknown date format");
                    None
                }
            })
            .filter(|(date, _)| *date <= self.revenue_cutoff)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSize {
    fn default() -> Self {
        ChartSize {
            width: 1000,
            height: 900,
        }
    }
}

/// What ended up in one panel of a rendered chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSummary {
    pub title: &'static str,
    pub points: usize,
    pub first: Option<NaiveDate>,
    pub last: Option<NaiveDate>,
    /// Value at the latest date in the panel.
    pub latest: Option<f64>,
}

impl PanelSummary {
    fn new(title: &'static str, points: &[Point]) -> Self {
        let first = points.iter().map(|(d, _)| *d).min();
        let last = points.iter().map(|(d, _)| *d).max();
        let latest = points.iter().max_by_key(|(d, _)| *d).map(|(_, v)| *v);
        PanelSummary {
            title,
            points: points.len(),
            first,
            last,
            latest,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartOutput {
    pub title: String,
    /// Standalone SVG document.
    pub svg: String,
    /// The SVG wrapped in a `<figure>` for embedding in a page.
    pub html: String,
    pub price: PanelSummary,
    pub revenue: PanelSummary,
}

/// Renders share price above revenue on a shared date axis.
///
/// Both series are cut at the window's dates first. An empty series still
/// renders its panel, just without a line.
pub fn render(
    prices: &[PriceRecord],
    revenue: &[RevenueRecord],
    title: &str,
    window: &ChartWindow,
    size: ChartSize,
) -> Result<ChartOutput> {
    let price_points = window.price_points(prices);
    let revenue_points = window.revenue_points(revenue);
    let dates = shared_date_range(&price_points, &revenue_points, window);
    debug!(
        title,
        price_points = price_points.len(),
        revenue_points = revenue_points.len(),
        "Rendering chart from {} to {}",
        dates.start,
        dates.end
    );

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (size.width, size.height)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| anyhow!("Failed to fill canvas: {e}"))?;
        let root = root
            .titled(title, ("sans-serif", 28.0).into_font())
            .map_err(|e| anyhow!("Failed to draw chart title: {e}"))?;

        let panels = root.split_evenly((2, 1));
        draw_panel(
            &panels[0],
            PRICE_PANEL_TITLE,
            PRICE_AXIS_LABEL,
            &price_points,
            dates.clone(),
            &BLUE,
        )?;
        draw_panel(
            &panels[1],
            REVENUE_PANEL_TITLE,
            REVENUE_AXIS_LABEL,
            &revenue_points,
            dates,
            &RED,
        )?;

        root.present()
            .map_err(|e| anyhow!("Failed to render chart: {e}"))?;
    }

    let html = html_fragment(title, &svg);
    Ok(ChartOutput {
        title: title.to_string(),
        svg,
        html,
        price: PanelSummary::new(PRICE_PANEL_TITLE, &price_points),
        revenue: PanelSummary::new(REVENUE_PANEL_TITLE, &revenue_points),
    })
}

fn draw_panel(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    caption: &str,
    y_desc: &str,
    points: &[Point],
    dates: Range<NaiveDate>,
    color: &RGBColor,
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 20.0).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(dates, value_range(points))
        .map_err(|e| anyhow!("Failed to build {caption} panel: {e}"))?;

    chart
        .configure_mesh()
        .x_desc(DATE_AXIS_LABEL)
        .y_desc(y_desc)
        .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m").to_string())
        .draw()
        .map_err(|e| anyhow!("Failed to draw {caption} mesh: {e}"))?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), color))
        .map_err(|e| anyhow!("Failed to draw {caption} series: {e}"))?;

    Ok(())
}

/// Date span covering both series, so the panels line up.
fn shared_date_range(prices: &[Point], revenue: &[Point], window: &ChartWindow) -> Range<NaiveDate> {
    let dates = prices.iter().chain(revenue).map(|(d, _)| *d);
    let (start, end) = match (dates.clone().min(), dates.max()) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            let end = window.price_cutoff.max(window.revenue_cutoff);
            (end - Duration::days(365), end)
        }
    };
    if start == end {
        start - Duration::days(1)..end + Duration::days(1)
    } else {
        start..end
    }
}

fn value_range(points: &[Point]) -> Range<f64> {
    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, v)| {
            (lo.min(*v), hi.max(*v))
        });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }

    let span = if max > min {
        max - min
    } else {
        max.abs().max(1.0)
    };
    let padding = span * 0.1;
    (min - padding).max(0.0)..max + padding
}

fn html_fragment(title: &str, svg: &str) -> String {
    format!(
        "<figure class=\"revchart\">\n<figcaption>{}</figcaption>\n{}\n</figure>\n",
        escape_html(title),
        svg.trim()
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
