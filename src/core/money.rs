use rust_decimal::{Decimal, RoundingStrategy, prelude::*};

/// Rounds to whole cents, half away from zero. Non-finite values pass through.
pub fn round_cents(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Formats an amount as `$12,345.67`, or with the code appended for
/// currencies that do not use the dollar sign.
pub fn format_amount(value: f64, currency: &str) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }

    let rounded = round_cents(value);
    let sign = if rounded < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", rounded.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match currency.to_uppercase().as_str() {
        "AUD" | "NZD" | "USD" | "CAD" => format!("{sign}${grouped}.{cents}"),
        code => format!("{sign}{grouped}.{cents} {code}"),
    }
}
