//! Turns command-line quote options into calculator inputs.
use crate::core::config::AppConfig;
use crate::core::repayment::{Frequency, RepaymentInputs};
use anyhow::{Result, bail};
use clap::Args;
use tracing::debug;

#[derive(Args, Debug, Clone, Default)]
pub struct QuoteArgs {
    /// Catalogue model to price the quote from
    #[arg(short, long, conflicts_with = "price")]
    pub model: Option<String>,

    /// Purchase price
    #[arg(short, long)]
    pub price: Option<f64>,

    /// Deposit amount
    #[arg(short, long, conflicts_with = "deposit_percent")]
    pub deposit: Option<f64>,

    /// Deposit as a percentage of the price
    #[arg(long)]
    pub deposit_percent: Option<f64>,

    /// Loan term in years
    #[arg(short, long)]
    pub term: Option<u32>,

    /// Annual interest rate in percent
    #[arg(short, long)]
    pub rate: Option<f64>,

    /// Payment frequency: weekly, fortnightly or monthly
    #[arg(short, long)]
    pub frequency: Option<Frequency>,

    /// Pull out-of-range values into the allowed range instead of failing
    #[arg(long)]
    pub clamp: bool,
}

/// Inputs ready for the calculator, plus the catalogue model they came from.
#[derive(Debug, Clone)]
pub struct ResolvedQuote {
    pub model: Option<String>,
    pub inputs: RepaymentInputs,
}

pub fn resolve(args: &QuoteArgs, config: &AppConfig) -> Result<ResolvedQuote> {
    let (model, price) = match (&args.model, args.price) {
        (Some(name), _) => match config.find_model(name) {
            Some(model) => (Some(model.name.clone()), model.price),
            None => bail!("Unknown model '{}'. Run `models` to list the catalogue", name),
        },
        (None, Some(price)) => (None, price),
        (None, None) => bail!("Either --model or --price is required"),
    };

    let defaults = &config.defaults;
    let deposit = match args.deposit {
        Some(amount) => amount,
        None => price * args.deposit_percent.unwrap_or(defaults.deposit_percent) / 100.0,
    };

    let inputs = RepaymentInputs {
        price,
        deposit,
        term_years: args.term.unwrap_or(defaults.term_years),
        annual_rate_percent: args.rate.unwrap_or(defaults.annual_rate_percent),
        frequency: args.frequency.unwrap_or(defaults.frequency),
    };

    let inputs = if args.clamp {
        let clamped = inputs.clamped(&config.calculator);
        if clamped != inputs {
            debug!("Clamped quote inputs {:?} to {:?}", inputs, clamped);
        }
        clamped
    } else {
        inputs.validate(&config.calculator)?;
        inputs
    };

    Ok(ResolvedQuote { model, inputs })
}
