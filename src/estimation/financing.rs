//! Optional loan simulation
//!
//! Fixed-rate amortization: `payment = P * r * (1+r)^n / ((1+r)^n - 1)` with
//! `r` the monthly rate and `n` the number of monthly payments.

use serde::{Deserialize, Serialize};

/// Which simulator the deployment exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulatorVariant {
    /// Budget and duration only
    Basic,
    /// Budget, duration and loan repayment
    #[default]
    WithFinancing,
}

impl SimulatorVariant {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "basic" | "simple" => Self::Basic,
            _ => Self::WithFinancing,
        }
    }

    pub fn offers_financing(&self) -> bool {
        matches!(self, Self::WithFinancing)
    }
}

pub const MIN_LOAN_MONTHS: u32 = 1;
pub const MAX_LOAN_MONTHS: u32 = 600;
pub const MAX_ANNUAL_RATE_PERCENT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount to borrow; `None` or zero finances the whole estimated budget
    #[serde(default)]
    pub amount: Option<f64>,
    pub duration_months: u32,
    pub annual_rate_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanQuote {
    pub principal: i64,
    pub duration_months: u32,
    pub annual_rate_percent: f64,
    pub monthly_payment: i64,
    pub total_interest: i64,
}

/// Quote a loan for the given terms, defaulting the principal to the estimated budget.
pub fn quote(terms: &LoanTerms, estimated_budget: i64) -> LoanQuote {
    let principal = match terms.amount {
        Some(amount) if amount > 0.0 => amount,
        _ => estimated_budget as f64,
    };

    let payment = monthly_payment(principal, terms.annual_rate_percent, terms.duration_months);
    let total_interest = if payment > 0.0 {
        payment * terms.duration_months as f64 - principal
    } else {
        0.0
    };

    LoanQuote {
        principal: principal.round() as i64,
        duration_months: terms.duration_months,
        annual_rate_percent: terms.annual_rate_percent,
        monthly_payment: payment.round() as i64,
        total_interest: total_interest.round() as i64,
    }
}

/// Unrounded monthly payment. Zero principal or zero months yields zero;
/// a zero rate spreads the principal evenly.
pub fn monthly_payment(principal: f64, annual_rate_percent: f64, months: u32) -> f64 {
    if principal <= 0.0 || months == 0 {
        return 0.0;
    }

    let monthly_rate = annual_rate_percent / 100.0 / 12.0;
    if monthly_rate <= 0.0 {
        return principal / months as f64;
    }

    let growth = (1.0 + monthly_rate).powi(months as i32);
    principal * monthly_rate * growth / (growth - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textbook_mortgage_payment() {
        // 100k at 6% over 30 years
        let payment = monthly_payment(100_000.0, 6.0, 360);
        assert!((payment - 599.55).abs() < 0.01, "got {payment}");
    }

    #[test]
    fn zero_rate_spreads_principal() {
        assert_eq!(monthly_payment(1_200_000.0, 0.0, 12), 100_000.0);
    }

    #[test]
    fn zero_principal_or_months_is_free() {
        assert_eq!(monthly_payment(0.0, 7.5, 180), 0.0);
        assert_eq!(monthly_payment(1_000_000.0, 7.5, 0), 0.0);
    }

    #[test]
    fn missing_amount_finances_the_whole_budget() {
        let terms = LoanTerms {
            amount: None,
            duration_months: 180,
            annual_rate_percent: 7.5,
        };
        let q = quote(&terms, 48_000_000);

        assert_eq!(q.principal, 48_000_000);
        assert_eq!(
            q.monthly_payment,
            monthly_payment(48_000_000.0, 7.5, 180).round() as i64
        );
        assert!(q.total_interest > 0);

        let zero = quote(&LoanTerms { amount: Some(0.0), ..terms }, 48_000_000);
        assert_eq!(zero.principal, 48_000_000);
    }

    #[test]
    fn explicit_amount_overrides_budget() {
        let q = quote(
            &LoanTerms {
                amount: Some(1_200_000.0),
                duration_months: 12,
                annual_rate_percent: 0.0,
            },
            48_000_000,
        );

        assert_eq!(q.principal, 1_200_000);
        assert_eq!(q.monthly_payment, 100_000);
        assert_eq!(q.total_interest, 0);
    }

    #[test]
    fn variant_parsing() {
        assert_eq!(SimulatorVariant::parse("basic"), SimulatorVariant::Basic);
        assert_eq!(SimulatorVariant::parse(" Simple "), SimulatorVariant::Basic);
        assert_eq!(
            SimulatorVariant::parse("with_financing"),
            SimulatorVariant::WithFinancing
        );
        assert!(SimulatorVariant::default().offers_financing());
    }
}
