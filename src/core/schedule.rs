//! Month-by-month amortization of a quoted loan.
use crate::core::repayment::{RepaymentInputs, monthly_payment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 1-based month number.
    pub period: u64,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: u32,
    pub interest: f64,
    pub principal: f64,
    pub closing_balance: f64,
}

/// Builds the monthly schedule for `inputs`.
///
/// The last row takes whatever balance is left so the loan closes at exactly
/// zero. An empty or non-positive loan has no schedule.
pub fn amortization_schedule(inputs: &RepaymentInputs) -> Vec<ScheduleRow> {
    let months = inputs.total_months();
    let loan_amount = inputs.loan_amount();
    if months == 0 || loan_amount <= 0.0 {
        return Vec::new();
    }

    let rate = inputs.monthly_rate();
    let payment = monthly_payment(loan_amount, rate, months);
    let mut balance = loan_amount;
    let mut rows = Vec::new();

    for period in 1..=months {
        let interest = balance * rate;
        let (payment, principal) = if period == months {
            (balance + interest, balance)
        } else {
            (payment, payment - interest)
        };
        balance -= principal;
        if period == months {
            balance = 0.0;
        }
        rows.push(ScheduleRow {
            period,
            payment,
            interest,
            principal,
            balance,
        });
    }

    rows
}

/// Folds monthly rows into 12-month groups.
pub fn yearly_summary(rows: &[ScheduleRow]) -> Vec<YearSummary> {
    rows.chunks(12)
        .enumerate()
        .map(|(i, year)| YearSummary {
            year: i as u32 + 1,
            interest: year.iter().map(|r| r.interest).sum(),
            principal: year.iter().map(|r| r.principal).sum(),
            closing_balance: year.last().map_or(0.0, |r| r.balance),
        })
        .collect()
}
