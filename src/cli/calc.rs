use super::quote::{QuoteArgs, ResolvedQuote, resolve};
use super::ui;
use crate::core::config::AppConfig;
use crate::core::repayment::{RepaymentResult, compute};
use anyhow::Result;
use comfy_table::Cell;
use tracing::debug;

pub fn run(config: &AppConfig, args: &QuoteArgs) -> Result<()> {
    let quote = resolve(args, config)?;
    let result = compute(&quote.inputs);
    debug!("Computed {:?} for {:?}", result, quote.inputs);

    let title = quote.model.as_deref().unwrap_or("Finance quote");
    println!("\n{}", ui::style_text(title, ui::StyleType::Title));
    println!("{}", render_quote(&quote, &result, &config.currency));
    println!(
        "{}",
        ui::style_text(
            "Indicative only. Repayments assume a fixed rate with monthly compounding.",
            ui::StyleType::Subtle
        )
    );
    Ok(())
}

pub fn render_quote(quote: &ResolvedQuote, result: &RepaymentResult, currency: &str) -> String {
    let inputs = &quote.inputs;
    let mut table = ui::new_styled_table();

    table.set_header(vec![ui::header_cell("Item"), ui::header_cell("Amount")]);
    table.add_row(vec![
        Cell::new("Price"),
        ui::money_cell(inputs.price, currency),
    ]);
    table.add_row(vec![
        Cell::new("Deposit"),
        ui::money_cell(inputs.deposit, currency),
    ]);
    table.add_row(vec![
        Cell::new("Loan amount"),
        ui::money_cell(result.loan_amount, currency),
    ]);
    table.add_row(vec![
        Cell::new("Term"),
        ui::number_cell(format!("{} years", inputs.term_years)),
    ]);
    table.add_row(vec![
        Cell::new("Interest rate"),
        ui::number_cell(format!("{:.2}% p.a.", inputs.annual_rate_percent)),
    ]);
    table.add_row(vec![
        ui::label_cell(&format!("Repayment per {}", inputs.frequency.period_name())),
        ui::total_money_cell(result.periodic_payment, currency),
    ]);
    table.add_row(vec![
        Cell::new("Total interest"),
        ui::money_cell(result.total_interest, currency),
    ]);
    table.add_row(vec![
        Cell::new("Total payable"),
        ui::money_cell(result.total_payable, currency),
    ]);

    table.to_string()
}
