use super::ui;
use crate::core::config::{AppConfig, CaravanModel};
use crate::core::repayment::compute;
use comfy_table::Cell;

pub fn run(config: &AppConfig) {
    if config.models.is_empty() {
        println!("No caravan models configured.");
        return;
    }
    println!(
        "\n{}",
        ui::style_text("Caravan models", ui::StyleType::Title)
    );
    println!("{}", render_models(config));

    let defaults = &config.defaults;
    let note = format!(
        "Repayments assume a {}% deposit over {} years at {:.2}% p.a.",
        defaults.deposit_percent, defaults.term_years, defaults.annual_rate_percent
    );
    println!("{}", ui::style_text(&note, ui::StyleType::Subtle));
}

/// Catalogue with an indicative repayment per model at the configured defaults.
pub fn render_models(config: &AppConfig) -> String {
    let defaults = &config.defaults;
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Model"),
        ui::header_cell("Category"),
        ui::header_cell("Price"),
        ui::header_cell(&format!("From (per {})", defaults.frequency.period_name())),
    ]);

    let mut models: Vec<&CaravanModel> = config.models.iter().collect();
    models.sort_by(|a, b| a.price.total_cmp(&b.price));

    for model in models {
        let inputs = defaults.sample_inputs(model.price);
        table.add_row(vec![
            Cell::new(&model.name),
            ui::optional_text_cell(model.category.as_deref()),
            ui::money_cell(model.price, &config.currency),
            ui::total_money_cell(compute(&inputs).periodic_payment, &config.currency),
        ]);
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_sorted_by_price_with_repayment() {
        let config = AppConfig {
            models: vec![
                CaravanModel {
                    name: "Outback Explorer 21".to_string(),
                    price: 125_000.0,
                    category: Some("off-road".to_string()),
                },
                CaravanModel {
                    name: "Coastal Tourer 18".to_string(),
                    price: 100_000.0,
                    category: None,
                },
            ],
            ..AppConfig::default()
        };
        let rendered = render_models(&config);

        let coastal = rendered.find("Coastal Tourer 18").unwrap();
        let outback = rendered.find("Outback Explorer 21").unwrap();
        assert!(coastal < outback);
        assert!(rendered.contains("From (per week)"));
        // 100k with the default 20% deposit, 5 years at 7.5%
        assert!(rendered.contains("$369.93"));
    }
}
