//! Fixed-rate repayment calculation for caravan finance quotes.
//!
//! Interest always compounds monthly. Weekly and fortnightly figures are the
//! monthly payment spread over the year, not a separately amortized loan.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// How often a quoted payment falls due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Fortnightly,
    Monthly,
}

impl Frequency {
    pub const ALL: [Frequency; 3] = [
        Frequency::Weekly,
        Frequency::Fortnightly,
        Frequency::Monthly,
    ];

    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Weekly => 52,
            Frequency::Fortnightly => 26,
            Frequency::Monthly => 12,
        }
    }

    /// Converts a monthly payment into the equivalent payment for this cadence.
    pub fn from_monthly(&self, monthly_payment: f64) -> f64 {
        match self {
            Frequency::Monthly => monthly_payment,
            _ => monthly_payment * 12.0 / self.periods_per_year() as f64,
        }
    }

    /// Singular period noun, e.g. "per week".
    pub fn period_name(&self) -> &'static str {
        match self {
            Frequency::Weekly => "week",
            Frequency::Fortnightly => "fortnight",
            Frequency::Monthly => "month",
        }
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Frequency::Weekly => "weekly",
                Frequency::Fortnightly => "fortnightly",
                Frequency::Monthly => "monthly",
            }
        )
    }
}

impl FromStr for Frequency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" | "w" => Ok(Frequency::Weekly),
            "fortnightly" | "fortnight" | "f" => Ok(Frequency::Fortnightly),
            "monthly" | "month" | "m" => Ok(Frequency::Monthly),
            _ => Err(anyhow::anyhow!("Invalid payment frequency: {}", s)),
        }
    }
}

/// Bounds the quote inputs are held to, mirroring the sliders on the finance page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorLimits {
    pub min_term_years: u32,
    pub max_term_years: u32,
    pub min_rate_percent: f64,
    pub max_rate_percent: f64,
    /// Largest deposit as a fraction of the price.
    pub max_deposit_ratio: f64,
}

impl Default for CalculatorLimits {
    fn default() -> Self {
        CalculatorLimits {
            min_term_years: 1,
            max_term_years: 7,
            min_rate_percent: 4.0,
            max_rate_percent: 15.0,
            max_deposit_ratio: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepaymentInputs {
    pub price: f64,
    pub deposit: f64,
    pub term_years: u32,
    pub annual_rate_percent: f64,
    pub frequency: Frequency,
}

impl RepaymentInputs {
    pub fn loan_amount(&self) -> f64 {
        self.price - self.deposit
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0 / 12.0
    }

    pub fn total_months(&self) -> u64 {
        u64::from(self.term_years) * 12
    }

    /// Rejects inputs that fall outside `limits`.
    pub fn validate(&self, limits: &CalculatorLimits) -> Result<()> {
        if !self.price.is_finite() || self.price <= 0.0 {
            bail!("Price must be a positive amount, got {}", self.price);
        }
        if !self.deposit.is_finite() {
            bail!("Deposit must be a finite amount, got {}", self.deposit);
        }
        if self.deposit < 0.0 {
            bail!("Deposit cannot be negative, got {}", self.deposit);
        }
        if self.deposit > self.price {
            bail!(
                "Deposit {} is larger than the price {}",
                self.deposit,
                self.price
            );
        }
        let max_deposit = self.price * limits.max_deposit_ratio;
        if self.deposit > max_deposit {
            bail!(
                "Deposit {} exceeds the maximum of {:.0}% of the price ({:.2})",
                self.deposit,
                limits.max_deposit_ratio * 100.0,
                max_deposit
            );
        }
        if self.term_years < limits.min_term_years || self.term_years > limits.max_term_years {
            bail!(
                "Term must be between {} and {} years, got {}",
                limits.min_term_years,
                limits.max_term_years,
                self.term_years
            );
        }
        if !self.annual_rate_percent.is_finite()
            || self.annual_rate_percent < limits.min_rate_percent
            || self.annual_rate_percent > limits.max_rate_percent
        {
            bail!(
                "Interest rate must be between {}% and {}%, got {}%",
                limits.min_rate_percent,
                limits.max_rate_percent,
                self.annual_rate_percent
            );
        }
        Ok(())
    }

    /// Pulls every field into `limits` the way a slider would, instead of rejecting.
    pub fn clamped(&self, limits: &CalculatorLimits) -> RepaymentInputs {
        let price = if self.price.is_finite() {
            self.price.max(0.0)
        } else {
            0.0
        };
        let max_deposit = (price * limits.max_deposit_ratio).min(price);
        let deposit = if self.deposit.is_finite() {
            self.deposit.clamp(0.0, max_deposit)
        } else {
            0.0
        };
        let annual_rate_percent = if self.annual_rate_percent.is_finite() {
            self.annual_rate_percent
                .clamp(limits.min_rate_percent, limits.max_rate_percent)
        } else {
            limits.min_rate_percent
        };

        RepaymentInputs {
            price,
            deposit,
            term_years: self
                .term_years
                .clamp(limits.min_term_years, limits.max_term_years),
            annual_rate_percent,
            frequency: self.frequency,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepaymentResult {
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub periodic_payment: f64,
    pub total_interest: f64,
    pub total_payable: f64,
}

/// Monthly installment for a fully amortizing loan.
///
/// A zero rate repays the principal in equal parts and a zero term makes the
/// whole amount due at once, so neither case divides by zero. The annuity
/// factor is evaluated as `r / (1 - (1 + r)^-n)` through `ln_1p`/`exp_m1`,
/// which stays finite for rates near zero and for very long terms. The result
/// never falls below the equal-parts payment.
pub fn monthly_payment(loan_amount: f64, monthly_rate: f64, months: u64) -> f64 {
    if months == 0 {
        return loan_amount;
    }
    let linear = loan_amount / months as f64;
    if monthly_rate == 0.0 {
        return linear;
    }
    let discount = -(-(months as f64) * monthly_rate.ln_1p()).exp_m1();
    let amortized = loan_amount * monthly_rate / discount;
    if amortized.is_finite() && amortized.abs() >= linear.abs() {
        amortized
    } else {
        linear
    }
}

/// Computes the quote for `inputs`. Inputs are taken as given; see
/// [`RepaymentInputs::validate`] and [`RepaymentInputs::clamped`].
pub fn compute(inputs: &RepaymentInputs) -> RepaymentResult {
    let loan_amount = inputs.loan_amount();
    let months = inputs.total_months();
    let monthly = monthly_payment(loan_amount, inputs.monthly_rate(), months);

    // Interest is what each installment pays above the equal-parts share.
    let total_interest = if months == 0 {
        0.0
    } else {
        (monthly - loan_amount / months as f64) * months as f64
    };

    RepaymentResult {
        loan_amount,
        monthly_payment: monthly,
        periodic_payment: inputs.frequency.from_monthly(monthly),
        total_interest,
        total_payable: loan_amount + total_interest,
    }
}

/// The same quote at every payment cadence.
pub fn compare_frequencies(inputs: &RepaymentInputs) -> Vec<(Frequency, RepaymentResult)> {
    Frequency::ALL
        .iter()
        .map(|&frequency| {
            let with_frequency = RepaymentInputs {
                frequency,
                ..*inputs
            };
            (frequency, compute(&with_frequency))
        })
        .collect()
}

/// The same quote for every whole-year term the limits allow.
pub fn term_options(
    inputs: &RepaymentInputs,
    limits: &CalculatorLimits,
) -> Vec<(u32, RepaymentResult)> {
    (limits.min_term_years..=limits.max_term_years)
        .map(|term_years| {
            let with_term = RepaymentInputs {
                term_years,
                ..*inputs
            };
            (term_years, compute(&with_term))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 0.01;

    fn sample_inputs() -> RepaymentInputs {
        RepaymentInputs {
            price: 100_000.0,
            deposit: 20_000.0,
            term_years: 5,
            annual_rate_percent: 7.5,
            frequency: Frequency::Weekly,
        }
    }

    #[test]
    fn test_reference_quote() {
        let result = compute(&sample_inputs());

        assert_eq!(result.loan_amount, 80_000.0);
        assert!((result.monthly_payment - 1603.04).abs() < EPS);
        assert!((result.periodic_payment - 369.93).abs() < EPS);
        assert!((result.total_interest - 16_182.15).abs() < EPS);
        assert!((result.total_payable - 96_182.15).abs() < EPS);
    }

    #[test]
    fn test_loan_amount_is_price_less_deposit() {
        for (price, deposit) in [(50_000.0, 0.0), (89_990.0, 12_345.5), (120_000.0, 60_000.0)] {
            let inputs = RepaymentInputs {
                price,
                deposit,
                ..sample_inputs()
            };
            assert_eq!(compute(&inputs).loan_amount, price - deposit);
        }
    }

    #[test]
    fn test_full_deposit_means_no_payment() {
        let inputs = RepaymentInputs {
            deposit: 100_000.0,
            ..sample_inputs()
        };
        let result = compute(&inputs);

        assert_eq!(result.loan_amount, 0.0);
        assert_eq!(result.periodic_payment, 0.0);
        assert_eq!(result.total_interest, 0.0);
    }

    #[test]
    fn test_deposit_above_price_is_not_rejected() {
        let inputs = RepaymentInputs {
            deposit: 110_000.0,
            ..sample_inputs()
        };
        let result = compute(&inputs);

        assert_eq!(result.loan_amount, -10_000.0);
        assert!(result.periodic_payment < 0.0);
    }

    #[test]
    fn test_zero_rate_repays_linearly() {
        let inputs = RepaymentInputs {
            annual_rate_percent: 0.0,
            frequency: Frequency::Monthly,
            ..sample_inputs()
        };
        let result = compute(&inputs);

        assert!(result.periodic_payment.is_finite());
        assert!((result.periodic_payment - 80_000.0 / 60.0).abs() < 1e-9);
        assert!(result.total_interest.abs() < 1e-6);
    }

    #[test]
    fn test_rate_near_zero_approaches_linear_payment() {
        let inputs = RepaymentInputs {
            annual_rate_percent: 1e-6,
            ..sample_inputs()
        };
        let linear = Frequency::Weekly.from_monthly(80_000.0 / 60.0);

        assert!((compute(&inputs).periodic_payment - linear).abs() < EPS);
    }

    #[test]
    fn test_tiny_rates_stay_finite_and_non_negative() {
        let linear = 80_000.0 / 60.0;
        for rate in [1e-6, 1e-9, 1e-11, 1e-12, 1e-13, 1e-14] {
            let result = compute(&RepaymentInputs {
                annual_rate_percent: rate,
                frequency: Frequency::Monthly,
                ..sample_inputs()
            });

            assert!(result.monthly_payment.is_finite(), "rate {rate}");
            assert!(result.total_interest.is_finite(), "rate {rate}");
            assert!(result.total_interest >= 0.0, "rate {rate}");
            assert!((result.monthly_payment - linear).abs() < EPS, "rate {rate}");
        }
    }

    #[test]
    fn test_payment_never_falls_as_rate_rises_from_zero() {
        let rates = [
            0.0, 1e-14, 1e-13, 1e-12, 1e-11, 1e-9, 1e-6, 1e-3, 0.1, 1.0, 4.0, 7.5, 15.0,
        ];
        let payments: Vec<f64> = rates
            .iter()
            .map(|&rate| {
                compute(&RepaymentInputs {
                    annual_rate_percent: rate,
                    ..sample_inputs()
                })
                .periodic_payment
            })
            .collect();

        for (pair, rate) in payments.windows(2).zip(rates.iter().skip(1)) {
            assert!(pair[1] >= pair[0], "payment fell at rate {rate}");
        }
    }

    #[test]
    fn test_very_long_term_does_not_overflow() {
        let result = compute(&RepaymentInputs {
            term_years: u32::MAX,
            frequency: Frequency::Monthly,
            ..sample_inputs()
        });

        // Repayments tend to interest-only as the term grows.
        assert!((result.monthly_payment - 500.0).abs() < EPS);
        assert!(result.total_interest.is_finite());
        assert!(result.total_interest > 0.0);

        let interest_free = compute(&RepaymentInputs {
            term_years: u32::MAX,
            annual_rate_percent: 0.0,
            ..sample_inputs()
        });
        assert!(interest_free.periodic_payment.is_finite());
        assert!(interest_free.periodic_payment > 0.0);
    }

    #[test]
    fn test_zero_term_makes_whole_loan_due() {
        let inputs = RepaymentInputs {
            term_years: 0,
            frequency: Frequency::Monthly,
            ..sample_inputs()
        };
        let result = compute(&inputs);

        assert_eq!(result.monthly_payment, 80_000.0);
        assert_eq!(result.total_interest, 0.0);
    }

    #[test]
    fn test_cadences_cover_the_same_year() {
        let results = compare_frequencies(&sample_inputs());
        let yearly: Vec<f64> = results
            .iter()
            .map(|(freq, r)| r.periodic_payment * freq.periods_per_year() as f64)
            .collect();

        assert_eq!(results.len(), 3);
        assert!((yearly[0] - yearly[1]).abs() < 1e-6);
        assert!((yearly[1] - yearly[2]).abs() < 1e-6);
        // Cadence does not change what the loan costs.
        assert_eq!(results[0].1.total_interest, results[2].1.total_interest);
    }

    #[test]
    fn test_higher_rate_costs_more() {
        let mut previous = compute(&RepaymentInputs {
            annual_rate_percent: 4.0,
            ..sample_inputs()
        });
        for rate in [5.0, 7.5, 10.0, 12.25, 15.0] {
            let current = compute(&RepaymentInputs {
                annual_rate_percent: rate,
                ..sample_inputs()
            });
            assert!(current.periodic_payment > previous.periodic_payment);
            assert!(current.total_interest > previous.total_interest);
            previous = current;
        }
    }

    #[test]
    fn test_larger_deposit_costs_less() {
        let mut previous = compute(&RepaymentInputs {
            deposit: 0.0,
            ..sample_inputs()
        });
        for deposit in [10_000.0, 25_000.0, 40_000.0, 50_000.0] {
            let current = compute(&RepaymentInputs {
                deposit,
                ..sample_inputs()
            });
            assert!(current.periodic_payment < previous.periodic_payment);
            assert!(current.total_interest < previous.total_interest);
            previous = current;
        }
    }

    #[test]
    fn test_term_options_span_limits() {
        let limits = CalculatorLimits::default();
        let options = term_options(&sample_inputs(), &limits);

        assert_eq!(options.len(), 7);
        assert_eq!(options.first().map(|(t, _)| *t), Some(1));
        assert_eq!(options.last().map(|(t, _)| *t), Some(7));
        // Longer terms lower the installment but raise the interest.
        for pair in options.windows(2) {
            assert!(pair[1].1.periodic_payment < pair[0].1.periodic_payment);
            assert!(pair[1].1.total_interest > pair[0].1.total_interest);
        }
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample_inputs().validate(&CalculatorLimits::default()).is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_fields() {
        let limits = CalculatorLimits::default();
        let cases = [
            (
                RepaymentInputs {
                    price: 0.0,
                    ..sample_inputs()
                },
                "Price",
            ),
            (
                RepaymentInputs {
                    deposit: -1.0,
                    ..sample_inputs()
                },
                "negative",
            ),
            (
                RepaymentInputs {
                    deposit: f64::NAN,
                    ..sample_inputs()
                },
                "finite",
            ),
            (
                RepaymentInputs {
                    deposit: 60_000.0,
                    ..sample_inputs()
                },
                "maximum",
            ),
            (
                RepaymentInputs {
                    term_years: 8,
                    ..sample_inputs()
                },
                "Term",
            ),
            (
                RepaymentInputs {
                    annual_rate_percent: 3.9,
                    ..sample_inputs()
                },
                "Interest rate",
            ),
            (
                RepaymentInputs {
                    annual_rate_percent: f64::NAN,
                    ..sample_inputs()
                },
                "Interest rate",
            ),
        ];

        for (inputs, expected) in cases {
            let err = inputs.validate(&limits).unwrap_err().to_string();
            assert!(err.contains(expected), "'{err}' should mention '{expected}'");
        }
    }

    #[test]
    fn test_clamped_respects_every_limit() {
        let limits = CalculatorLimits::default();
        let wild = RepaymentInputs {
            price: 80_000.0,
            deposit: 75_000.0,
            term_years: 12,
            annual_rate_percent: 1.0,
            frequency: Frequency::Fortnightly,
        };
        let clamped = wild.clamped(&limits);

        assert_eq!(clamped.deposit, 40_000.0);
        assert_eq!(clamped.term_years, 7);
        assert_eq!(clamped.annual_rate_percent, 4.0);
        assert_eq!(clamped.frequency, Frequency::Fortnightly);
        assert!(clamped.validate(&limits).is_ok());

        let low = RepaymentInputs {
            deposit: -500.0,
            term_years: 0,
            annual_rate_percent: 40.0,
            ..wild
        }
        .clamped(&limits);
        assert_eq!(low.deposit, 0.0);
        assert_eq!(low.term_years, 1);
        assert_eq!(low.annual_rate_percent, 15.0);
    }

    #[test]
    fn test_frequency_parsing() {
        assert_eq!("Weekly".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert_eq!(
            " fortnight ".parse::<Frequency>().unwrap(),
            Frequency::Fortnightly
        );
        assert_eq!("m".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert!("daily".parse::<Frequency>().is_err());
        assert_eq!(Frequency::Fortnightly.to_string(), "fortnightly");
    }
}
