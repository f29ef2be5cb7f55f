use super::ui;
use crate::core::chart::{ChartOutput, PanelSummary};
use crate::core::config::AppConfig;
use crate::core::pipeline;
use crate::core::{PageFetcher, PriceHistoryProvider};
use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Files written for one chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedChart {
    pub html: PathBuf,
    pub svg: PathBuf,
}

/// Charts every configured company, one after the other.
///
/// Each chart is displayed as soon as it is rendered and then dropped. With an
/// `output_dir` the chart is saved there, otherwise the HTML fragment is
/// printed to stdout.
pub async fn run(
    config: &AppConfig,
    page_fetcher: &dyn PageFetcher,
    price_provider: &dyn PriceHistoryProvider,
    output_dir: Option<&Path>,
) -> Result<Vec<SavedChart>> {
    if config.companies.is_empty() {
        println!("No companies configured to chart.");
        return Ok(Vec::new());
    }

    if let Some(dir) = output_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }

    let window = config.chart.window();
    let size = config.chart.size();
    let mut saved = Vec::new();

    let pb = ui::new_progress_bar(config.companies.len() as u64, true);
    for (i, company) in config.companies.iter().enumerate() {
        pb.set_message(company.name.clone());
        let output = pipeline::chart_company(
            company,
            config.table_for(company),
            page_fetcher,
            price_provider,
            &window,
            size,
        )
        .await?;

        let written = pb.suspend(|| display(&output, output_dir))?;
        saved.extend(written);
        pb.inc(1);

        if i < config.companies.len() - 1 {
            pb.suspend(ui::print_separator);
        }
    }
    pb.finish_and_clear();

    Ok(saved)
}

fn display(output: &ChartOutput, output_dir: Option<&Path>) -> Result<Option<SavedChart>> {
    println!("\n{}\n", ui::style_text(&output.title, ui::StyleType::Title));
    println!("{}", summary_table(output));

    let Some(dir) = output_dir else {
        println!("\n{}", output.html);
        return Ok(None);
    };

    let saved = save(output, dir)?;
    println!(
        "\n{} {}",
        ui::style_text("Saved chart:", ui::StyleType::TotalLabel),
        ui::style_text(&saved.html.display().to_string(), ui::StyleType::Subtle)
    );
    Ok(Some(saved))
}

fn summary_table(output: &ChartOutput) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Panel"),
        ui::header_cell("Points"),
        ui::header_cell("From"),
        ui::header_cell("To"),
        ui::header_cell("Latest"),
    ]);

    for panel in [&output.price, &output.revenue] {
        table.add_row(summary_row(panel));
    }
    table.to_string()
}

fn summary_row(panel: &PanelSummary) -> Vec<Cell> {
    vec![
        Cell::new(panel.title),
        Cell::new(panel.points).set_alignment(CellAlignment::Right),
        ui::format_optional_cell(panel.first, |d| d.to_string()),
        ui::format_optional_cell(panel.last, |d| d.to_string()),
        ui::format_optional_cell(panel.latest, ui::format_amount),
    ]
}

/// Writes the chart as `<slug>.html` and `<slug>.svg` under `dir`.
pub fn save(output: &ChartOutput, dir: &Path) -> Result<SavedChart> {
    let stem = slug(&output.title);
    let html = dir.join(format!("{stem}.html"));
    let svg = dir.join(format!("{stem}.svg"));

    fs::write(&html, &output.html)
        .with_context(|| format!("Failed to write chart to {}", html.display()))?;
    fs::write(&svg, &output.svg)
        .with_context(|| format!("Failed to write chart to {}", svg.display()))?;

    info!("Saved {} chart to {}", output.title, html.display());
    Ok(SavedChart { html, svg })
}

/// Lower-case file stem with runs of other characters collapsed to `-`.
fn slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "chart".to_string()
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chart::{ChartSize, ChartWindow, render};
    use crate::core::price::PriceRecord;
    use crate::core::revenue::RevenueRecord;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_slug() {
        assert_eq!(slug("Tesla"), "tesla");
        assert_eq!(slug("GameStop Corp."), "gamestop-corp");
        assert_eq!(slug("  AT&T  "), "at-t");
        assert_eq!(slug("***"), "chart");
    }

    #[test]
    fn test_save_writes_html_and_svg() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let prices = vec![PriceRecord {
            date: NaiveDate::from_ymd_opt(2021, 1, 4).unwrap(),
            close: 17.25,
        }];
        let revenue = vec![RevenueRecord::new("2021-01-31", 2122.0)];
        let output = render(
            &prices,
            &revenue,
            "GameStop",
            &ChartWindow::default(),
            ChartSize::default(),
        )?;

        let saved = save(&output, temp_dir.path())?;
        assert_eq!(saved.html, temp_dir.path().join("gamestop.html"));
        assert_eq!(fs::read_to_string(&saved.html)?, output.html);
        assert_eq!(fs::read_to_string(&saved.svg)?, output.svg);

        let table = summary_table(&output);
        assert!(table.contains("Historical Share Price"));
        assert!(table.contains("2,122.00"));
        Ok(())
    }
}
