// src/services/calculations.rs
use serde::Serialize;
use log::{debug, warn};
use crate::models::ProjectionPoint;
use anyhow::{bail, Result};

const MONTHS_PER_YEAR: u32 = 12;

/// Longest horizon, in years, any calculator accepts.
pub const MAX_HORIZON_YEARS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthSummary {
    pub final_balance: f64,
    pub total_contributions: f64,
    pub total_interest: f64,
    /// Absent when nothing was contributed.
    pub percent_grown: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanPayment {
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
    pub principal_percent: f64,
    pub interest_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsPlan {
    pub monthly_needed: f64,
    pub total_contributions: f64,
    pub interest_earned: f64,
    pub future_value_of_current: f64,
}

fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / MONTHS_PER_YEAR as f64
}

/// Year-by-year balance with monthly compounding and a level monthly contribution.
///
/// Returns `years + 1` points; the first one is always the untouched principal.
pub fn project_compound_growth(
    principal: f64,
    annual_rate_percent: f64,
    monthly_contribution: f64,
    years: u32,
) -> Vec<ProjectionPoint> {
    let rate = monthly_rate(annual_rate_percent);
    let mut balance = principal;
    let mut points = Vec::with_capacity(years as usize + 1);

    for year in 0..=years {
        points.push(ProjectionPoint {
            year,
            balance,
            cumulative_contributions: principal
                + monthly_contribution * MONTHS_PER_YEAR as f64 * year as f64,
        });

        for _ in 0..MONTHS_PER_YEAR {
            balance = (balance + monthly_contribution) * (1.0 + rate);
        }
    }

    points
}

pub fn summarize_growth(projection: &[ProjectionPoint]) -> GrowthSummary {
    let (final_balance, total_contributions) = projection
        .last()
        .map(|p| (p.balance, p.cumulative_contributions))
        .unwrap_or((0.0, 0.0));

    let percent_grown = if total_contributions == 0.0 {
        warn!("Total contributions are zero, growth percentage is undefined");
        None
    } else {
        Some((final_balance / total_contributions - 1.0) * 100.0)
    };

    GrowthSummary {
        final_balance,
        total_contributions,
        total_interest: final_balance - total_contributions,
        percent_grown,
    }
}

/// Fixed payment of an ordinary annuity (closed form, no per-period rounding).
pub fn calculate_loan_payment(principal: f64, annual_rate_percent: f64, term_months: u32) -> Result<LoanPayment> {
    if term_months < 1 {
        bail!("Loan term must be at least one month");
    }
    if term_months > MAX_HORIZON_YEARS * MONTHS_PER_YEAR {
        bail!("Loan term cannot exceed {} months", MAX_HORIZON_YEARS * MONTHS_PER_YEAR);
    }
    if principal.is_nan() || principal < 0.0 {
        bail!("Loan amount cannot be negative");
    }
    if annual_rate_percent.is_nan() || annual_rate_percent < 0.0 {
        bail!("Interest rate cannot be negative");
    }

    let rate = monthly_rate(annual_rate_percent);
    let n = term_months as f64;

    let monthly_payment = if rate == 0.0 {
        principal / n
    } else {
        let growth = (1.0 + rate).powf(n);
        principal * rate * growth / (growth - 1.0)
    };

    let total_payment = monthly_payment * n;
    let total_interest = total_payment - principal;
    debug!(
        "Loan {} at {}% over {} months: payment {:.2}, interest {:.2}",
        principal, annual_rate_percent, term_months, monthly_payment, total_interest
    );

    let share = |part: f64| if total_payment == 0.0 { 0.0 } else { part / total_payment * 100.0 };

    Ok(LoanPayment {
        monthly_payment,
        total_payment,
        total_interest,
        principal_percent: share(principal),
        interest_percent: share(total_interest),
    })
}

/// Horizon in months, rejecting anything past `MAX_HORIZON_YEARS`.
fn horizon_months(years: u32) -> Result<u32> {
    if years > MAX_HORIZON_YEARS {
        bail!("Horizon cannot exceed {} years", MAX_HORIZON_YEARS);
    }
    match years.checked_mul(MONTHS_PER_YEAR) {
        Some(months) => Ok(months),
        None => bail!("Horizon of {} years is out of range", years),
    }
}

pub fn validate_projection_years(years: u32) -> Result<()> {
    horizon_months(years).map(|_| ())
}

pub fn calculate_mortgage_payment(principal: f64, annual_rate_percent: f64, term_years: u32) -> Result<LoanPayment> {
    calculate_loan_payment(principal, annual_rate_percent, horizon_months(term_years)?)
}

/// Level monthly contribution needed to reach `target` in `years`.
///
/// `interest_earned` is `target - current - total_contributions`, floored at zero.
/// It does not reconcile against the compounding used for `monthly_needed`.
pub fn solve_savings_goal(target: f64, current: f64, years: u32, annual_rate_percent: f64) -> Result<SavingsPlan> {
    if years == 0 {
        bail!("Savings horizon must be at least one year");
    }

    let months = horizon_months(years)? as f64;
    let rate = monthly_rate(annual_rate_percent);
    let growth = (1.0 + rate).powf(months);

    let future_value_of_current = current * growth;
    let needed_from_contributions = target - future_value_of_current;

    let monthly_needed = if needed_from_contributions <= 0.0 {
        0.0
    } else {
        let annuity_factor = if rate == 0.0 { months } else { (growth - 1.0) / rate };
        needed_from_contributions / annuity_factor
    }
    .max(0.0);

    let total_contributions = monthly_needed * months;

    Ok(SavingsPlan {
        monthly_needed,
        total_contributions,
        interest_earned: (target - current - total_contributions).max(0.0),
        future_value_of_current,
    })
}
