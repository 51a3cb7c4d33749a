use super::quote::{QuoteArgs, resolve};
use super::ui;
use crate::core::config::AppConfig;
use crate::core::money::format_amount;
use crate::core::repayment::compute;
use crate::core::schedule::{ScheduleRow, YearSummary, amortization_schedule, yearly_summary};
use anyhow::Result;
use comfy_table::Cell;

pub fn run(config: &AppConfig, args: &QuoteArgs, yearly: bool) -> Result<()> {
    let quote = resolve(args, config)?;
    let rows = amortization_schedule(&quote.inputs);
    if rows.is_empty() {
        println!("Nothing to finance: the deposit covers the price.");
        return Ok(());
    }

    let currency = &config.currency;
    let rendered = if yearly {
        render_yearly(&yearly_summary(&rows), currency)
    } else {
        render_monthly(&rows, currency)
    };
    println!(
        "\n{}",
        ui::style_text("Amortization schedule", ui::StyleType::Title)
    );
    println!("{rendered}");

    let result = compute(&quote.inputs);
    println!(
        "{} {}",
        ui::style_text("Total interest:", ui::StyleType::TotalLabel),
        ui::style_text(
            &format_amount(result.total_interest, currency),
            ui::StyleType::TotalValue
        )
    );
    Ok(())
}

pub fn render_monthly(rows: &[ScheduleRow], currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Month"),
        ui::header_cell("Payment"),
        ui::header_cell("Interest"),
        ui::header_cell("Principal"),
        ui::header_cell("Balance"),
    ]);

    for row in rows {
        table.add_row(vec![
            Cell::new(row.period),
            ui::money_cell(row.payment, currency),
            ui::money_cell(row.interest, currency),
            ui::money_cell(row.principal, currency),
            ui::money_cell(row.balance, currency),
        ]);
    }
    table.to_string()
}

pub fn render_yearly(years: &[YearSummary], currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Year"),
        ui::header_cell("Interest"),
        ui::header_cell("Principal"),
        ui::header_cell("Closing balance"),
    ]);

    for year in years {
        table.add_row(vec![
            Cell::new(year.year),
            ui::money_cell(year.interest, currency),
            ui::money_cell(year.principal, currency),
            ui::money_cell(year.closing_balance, currency),
        ]);
    }
    table.to_string()
}
