use super::ui;
use crate::core::config::AppConfig;
use crate::core::pipeline;
use crate::core::{PageFetcher, RevenueSeries};
use anyhow::Result;
use comfy_table::Cell;

/// Scrapes and prints the revenue table of every configured company.
pub async fn run(config: &AppConfig, page_fetcher: &dyn PageFetcher) -> Result<()> {
    if config.companies.is_empty() {
        println!("No companies configured.");
        return Ok(());
    }

    let num_companies = config.companies.len();
    for (i, company) in config.companies.iter().enumerate() {
        let revenue =
            pipeline::fetch_revenue(company, config.table_for(company), page_fetcher).await?;

        println!(
            "\nCompany: {} ({})\n",
            ui::style_text(&company.name, ui::StyleType::Title),
            company.symbol
        );
        println!("{}", revenue_table(&revenue));
        println!(
            "\n{} {}",
            ui::style_text("Rows:", ui::StyleType::TotalLabel),
            ui::style_text(&revenue.len().to_string(), ui::StyleType::TotalValue)
        );

        if i < num_companies - 1 {
            ui::print_separator();
        }
    }

    Ok(())
}

fn revenue_table(revenue: &RevenueSeries) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Revenue ($US Millions)"),
    ]);

    for record in revenue {
        table.add_row(vec![
            Cell::new(&record.date_label),
            ui::number_cell(record.revenue),
        ]);
    }
    table.to_string()
}
