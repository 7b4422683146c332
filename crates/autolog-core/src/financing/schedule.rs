//! Backfill of recurring loan and lease payments.
//!
//! Generation is a set-membership check on calendar months: any recorded
//! installment of the same kind in a month, generated or entered by hand,
//! suppresses generation for that month. Running the generator twice on an
//! unchanged record therefore creates nothing the second time. Concurrent
//! callers must serialize generation per vehicle.

use std::collections::HashSet;

use chrono::{Months, NaiveDate};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{ExpenseKind, Financing, LeaseTerms, LoanTerms, OtherExpense, PaymentKind, VehicleRecord};
use crate::types::{round_money, Money, VehicleId};

use super::calendar::{align_to_payment_day, month_key, next_due_date};

/// Everything needed to lay out one financing component's installments.
#[derive(Debug, Clone, PartialEq)]
struct InstallmentPlan {
    kind: PaymentKind,
    start: NaiveDate,
    term_months: u32,
    payment_day: u32,
    amount: Money,
    down_payment: Option<Money>,
}

impl InstallmentPlan {
    fn for_loan(loan: &LoanTerms) -> Option<Self> {
        if !loan.auto_payment {
            return None;
        }
        let term_months = loan.term_months.filter(|t| *t > 0)?;
        Some(Self {
            kind: PaymentKind::LoanInstallment,
            start: loan.start_date?,
            term_months,
            payment_day: loan.payment_day?,
            amount: round_money(loan.monthly_payment()?),
            down_payment: loan.down_payment,
        })
    }

    fn for_lease(lease: &LeaseTerms) -> Option<Self> {
        if !lease.auto_payment {
            return None;
        }
        let term_months = lease.term_months.filter(|t| *t > 0)?;
        Some(Self {
            kind: PaymentKind::LeaseInstallment,
            start: lease.start_date?,
            term_months,
            payment_day: lease.payment_day?,
            amount: lease.monthly_payment?,
            down_payment: lease.down_payment,
        })
    }
}

/// Result of one generator run for a vehicle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentBackfill {
    pub vehicle_id: VehicleId,
    pub created: Vec<OtherExpense>,
    /// Vehicle payments on record after the run, generated ones included
    pub total_payments: u32,
}

/// Payments due up to `today` (or the end of the term) that are not yet on
/// record. Returns an empty list whenever a precondition is missing.
pub fn pending_payments(record: &VehicleRecord, today: NaiveDate) -> Vec<OtherExpense> {
    let plan = match &record.vehicle.financing {
        Financing::None => None,
        Financing::Loan(loan) => InstallmentPlan::for_loan(loan),
        Financing::Lease(lease) => InstallmentPlan::for_lease(lease),
    };
    let Some(plan) = plan else {
        debug!(
            "vehicle {}: payment generation preconditions not met",
            record.vehicle.id
        );
        return Vec::new();
    };

    let mut created = Vec::new();
    if let Some(down) = down_payment_due(record, &plan, today) {
        created.push(down);
    }
    created.extend(installments_due(record, &plan, today));
    created
}

fn down_payment_due(
    record: &VehicleRecord,
    plan: &InstallmentPlan,
    today: NaiveDate,
) -> Option<OtherExpense> {
    let amount = plan.down_payment.filter(|a| *a > Decimal::ZERO)?;
    if plan.start > today || record.count_payments(PaymentKind::DownPayment) > 0 {
        return None;
    }
    Some(OtherExpense {
        kind: ExpenseKind::VehiclePayment(PaymentKind::DownPayment),
        date: plan.start,
        cost: round_money(amount),
        notes: "Down payment (auto-generated)".into(),
    })
}

fn installments_due(
    record: &VehicleRecord,
    plan: &InstallmentPlan,
    today: NaiveDate,
) -> Vec<OtherExpense> {
    let mut covered: HashSet<(i32, u32)> = record
        .other_expenses
        .iter()
        .filter(|e| e.payment_kind() == Some(plan.kind))
        .map(|e| month_key(e.date))
        .collect();

    let schedule_end = plan
        .start
        .checked_add_months(Months::new(plan.term_months))
        .unwrap_or(NaiveDate::MAX);
    let cap = today.min(schedule_end);

    let mut created = Vec::new();
    let mut cursor = align_to_payment_day(plan.start, plan.payment_day);
    let mut installment = 0u32;

    while let Some(due) = cursor {
        if due > cap || installment >= plan.term_months {
            break;
        }
        installment += 1;

        if covered.insert(month_key(due)) {
            debug!(
                "vehicle {}: generating {} {} of {} on {}",
                record.vehicle.id, plan.kind, installment, plan.term_months, due
            );
            created.push(OtherExpense {
                kind: ExpenseKind::VehiclePayment(plan.kind),
                date: due,
                cost: plan.amount,
                notes: format!(
                    "{} {} of {} (auto-generated)",
                    plan.kind.label(),
                    installment,
                    plan.term_months
                ),
            });
        }

        cursor = next_due_date(due, plan.payment_day);
    }

    created
}

/// Append any missing payments to the record and report what was added.
/// This is the entry point used whenever a vehicle's detail is materialized.
pub fn backfill_payments(record: &mut VehicleRecord, today: NaiveDate) -> PaymentBackfill {
    let created = pending_payments(record, today);
    record.other_expenses.extend(created.iter().cloned());

    let total_payments = record
        .other_expenses
        .iter()
        .filter(|e| e.payment_kind().is_some())
        .count();

    PaymentBackfill {
        vehicle_id: record.vehicle.id,
        created,
        total_payments: u32::try_from(total_payments).unwrap_or(u32::MAX),
    }
}
