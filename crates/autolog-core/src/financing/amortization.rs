//! Fixed-rate installment loan math.
//!
//! Rates are entered as annual percentages (5.75 = 5.75%) and compounded
//! monthly. Interest to date is found by stepping through the schedule
//! payment by payment rather than by a closed form, so that the rounded
//! installment is carried through every step.

use std::time::Instant;

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AutologError;
use crate::model::LoanTerms;
use crate::types::*;
use crate::AutologResult;

/// Monthly rate as a fraction from an annual percentage.
pub fn monthly_rate(annual_rate: PercentRate) -> Decimal {
    annual_rate / dec!(100) / dec!(12)
}

/// Level monthly installment.
///
/// Zero-rate loans pay exactly `P / N`. Otherwise
/// `M = P·r·(1+r)^N / ((1+r)^N − 1)`, rounded to cents. Returns `None` for a
/// zero term.
pub fn monthly_payment(principal: Money, annual_rate: PercentRate, term_months: u32) -> Option<Money> {
    if term_months == 0 {
        return None;
    }

    let r = monthly_rate(annual_rate);
    if r.is_zero() {
        return Some(principal / Decimal::from(term_months));
    }

    let factor = (Decimal::ONE + r).checked_powu(u64::from(term_months))?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return None;
    }

    Some(round_money(principal * r * factor / denominator))
}

/// Interest over the life of the loan: `M·N − P`, rounded to cents.
pub fn total_interest(principal: Money, annual_rate: PercentRate, term_months: u32) -> Option<Money> {
    let payment = monthly_payment(principal, annual_rate, term_months)?;
    Some(round_money(payment * Decimal::from(term_months) - principal))
}

/// Interest paid across the first `payments_made` installments.
///
/// Each step charges interest on the remaining principal, applies the rest
/// of the installment to principal and accumulates the interest. Counts
/// beyond the term are clamped to the term.
pub fn interest_paid_to_date(
    principal: Money,
    annual_rate: PercentRate,
    term_months: u32,
    payments_made: u32,
) -> Option<Money> {
    let payment = monthly_payment(principal, annual_rate, term_months)?;
    let r = monthly_rate(annual_rate);
    if payments_made == 0 || r.is_zero() {
        return Some(Decimal::ZERO);
    }

    let mut remaining = principal;
    let mut interest_paid = Decimal::ZERO;
    for _ in 0..payments_made.min(term_months) {
        let interest = remaining * r;
        let principal_portion = payment - interest;
        remaining -= principal_portion;
        interest_paid += interest;
    }

    Some(round_money(interest_paid))
}

pub fn payments_remaining(term_months: u32, payments_made: u32) -> u32 {
    term_months.saturating_sub(payments_made)
}

/// A single month in the amortization schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub payment_number: u32,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

/// Month-by-month schedule. The final installment absorbs whatever residual
/// the rounded payment leaves behind so the loan closes at zero.
pub fn amortization_schedule(
    principal: Money,
    annual_rate: PercentRate,
    term_months: u32,
) -> Option<Vec<AmortizationRow>> {
    let payment = monthly_payment(principal, annual_rate, term_months)?;
    let r = monthly_rate(annual_rate);

    let mut rows = Vec::with_capacity(term_months as usize);
    let mut balance = principal;
    for n in 1..=term_months {
        let opening = balance;
        let interest = opening * r;
        let principal_portion = if n == term_months {
            opening
        } else {
            (payment - interest).min(opening)
        };
        balance = opening - principal_portion;

        rows.push(AmortizationRow {
            payment_number: n,
            opening_balance: round_money(opening),
            payment: round_money(principal_portion + interest),
            interest: round_money(interest),
            principal: round_money(principal_portion),
            closing_balance: round_money(balance),
        });
    }
    Some(rows)
}

impl LoanTerms {
    /// `None` when principal, rate or term is missing; callers treat the
    /// vehicle as not financed.
    pub fn monthly_payment(&self) -> Option<Money> {
        monthly_payment(self.principal?, self.annual_rate?, self.term_months?)
    }

    pub fn total_interest(&self) -> Option<Money> {
        total_interest(self.principal?, self.annual_rate?, self.term_months?)
    }

    pub fn interest_paid_to_date(&self, payments_made: u32) -> Option<Money> {
        interest_paid_to_date(
            self.principal?,
            self.annual_rate?,
            self.term_months?,
            payments_made,
        )
    }
}

/// Loan overview for a vehicle detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSummary {
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    pub payments_made: u32,
    pub payments_remaining: u32,
    pub interest_paid_to_date: Money,
    pub schedule: Vec<AmortizationRow>,
}

/// Summarise a loan given how many installments have been recorded.
pub fn loan_summary(
    loan: &LoanTerms,
    payments_made: u32,
) -> AutologResult<ComputationOutput<LoanSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let (Some(principal), Some(annual_rate), Some(term_months)) =
        (loan.principal, loan.annual_rate, loan.term_months)
    else {
        return Err(AutologError::InsufficientData(
            "loan principal, annual rate and term are all required".into(),
        ));
    };
    if principal <= Decimal::ZERO {
        return Err(AutologError::InsufficientData(
            "loan principal must be positive".into(),
        ));
    }

    let monthly = monthly_payment(principal, annual_rate, term_months).ok_or_else(|| {
        AutologError::InsufficientData("loan term must be at least one month".into())
    })?;
    let total_interest = total_interest(principal, annual_rate, term_months).unwrap_or_default();
    let interest_to_date =
        interest_paid_to_date(principal, annual_rate, term_months, payments_made)
            .unwrap_or_default();
    let schedule = amortization_schedule(principal, annual_rate, term_months).unwrap_or_default();

    if payments_made > term_months {
        warnings.push(format!(
            "{payments_made} installments recorded against a {term_months}-month term"
        ));
    }

    let output = LoanSummary {
        monthly_payment: round_money(monthly),
        total_interest,
        total_paid: round_money(monthly * Decimal::from(term_months)),
        payments_made,
        payments_remaining: payments_remaining(term_months, payments_made),
        interest_paid_to_date: interest_to_date,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortization, monthly compounding",
        &serde_json::json!({
            "principal": principal.to_string(),
            "annual_rate_pct": annual_rate.to_string(),
            "term_months": term_months,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zero_rate_is_straight_division() {
        assert_eq!(monthly_payment(dec!(12000), dec!(0), 48), Some(dec!(250)));
        assert_eq!(
            monthly_payment(dec!(10000), dec!(0), 3),
            Some(dec!(10000) / dec!(3))
        );
        assert_eq!(interest_paid_to_date(dec!(12000), dec!(0), 48, 10), Some(dec!(0)));
    }

    #[test]
    fn test_known_payment() {
        // 20,000 at 6% over 60 months is the textbook 386.66
        assert_eq!(monthly_payment(dec!(20000), dec!(6), 60), Some(dec!(386.66)));
        assert_eq!(total_interest(dec!(20000), dec!(6), 60), Some(dec!(3199.60)));
    }

    #[test]
    fn test_first_month_interest() {
        // 20,000 * 0.005 = 100.00 in the first month
        assert_eq!(interest_paid_to_date(dec!(20000), dec!(6), 60, 1), Some(dec!(100.00)));
    }

    #[test]
    fn test_zero_term_is_undefined() {
        assert_eq!(monthly_payment(dec!(1000), dec!(5), 0), None);
        assert_eq!(total_interest(dec!(1000), dec!(5), 0), None);
    }

    #[test]
    fn test_schedule_closes_at_zero() {
        let rows = amortization_schedule(dec!(15000), dec!(4.9), 36).unwrap();
        assert_eq!(rows.len(), 36);
        assert_eq!(rows.last().unwrap().closing_balance, Decimal::ZERO);
        let principal: Money = rows.iter().map(|r| r.principal).sum();
        assert!((principal - dec!(15000)).abs() <= dec!(0.36));
    }

    #[test]
    fn test_loan_terms_missing_field_is_none() {
        let loan = LoanTerms {
            principal: Some(dec!(10000)),
            term_months: Some(36),
            ..Default::default()
        };
        assert_eq!(loan.monthly_payment(), None);
        assert!(loan_summary(&loan, 0).is_err());
    }
}
