use super::quote::{QuoteArgs, resolve};
use super::ui;
use crate::core::config::AppConfig;
use crate::core::money::format_amount;
use crate::core::repayment::{
    CalculatorLimits, Frequency, RepaymentInputs, compare_frequencies, term_options,
};
use anyhow::Result;
use comfy_table::Cell;

pub fn run(config: &AppConfig, args: &QuoteArgs) -> Result<()> {
    let quote = resolve(args, config)?;
    let inputs = &quote.inputs;

    let title = format!(
        "{} financed at {:.2}% p.a.",
        format_amount(inputs.loan_amount(), &config.currency),
        inputs.annual_rate_percent
    );
    println!("\n{}", ui::style_text(&title, ui::StyleType::Title));
    println!(
        "{}",
        render_comparison(inputs, &config.calculator, &config.currency)
    );
    Ok(())
}

/// One row per allowed term, one repayment column per cadence.
pub fn render_comparison(
    inputs: &RepaymentInputs,
    limits: &CalculatorLimits,
    currency: &str,
) -> String {
    let mut table = ui::new_styled_table();

    let mut header = vec![ui::header_cell("Term")];
    header.extend(
        Frequency::ALL
            .iter()
            .map(|f| ui::header_cell(&format!("Per {}", f.period_name()))),
    );
    header.push(ui::header_cell("Total interest"));
    table.set_header(header);

    for (term_years, result) in term_options(inputs, limits) {
        let with_term = RepaymentInputs {
            term_years,
            ..*inputs
        };
        let is_selected = term_years == inputs.term_years;
        let term_label = format!("{term_years} years");

        let mut row = vec![if is_selected {
            ui::label_cell(&format!("{term_label} *"))
        } else {
            Cell::new(term_label)
        }];
        row.extend(
            compare_frequencies(&with_term)
                .into_iter()
                .map(|(frequency, r)| {
                    if is_selected && frequency == inputs.frequency {
                        ui::total_money_cell(r.periodic_payment, currency)
                    } else {
                        ui::money_cell(r.periodic_payment, currency)
                    }
                }),
        );
        row.push(ui::money_cell(result.total_interest, currency));
        table.add_row(row);
    }

    table.to_string()
}
