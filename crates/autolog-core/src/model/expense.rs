use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::Money;

use super::{check_range, ENTRY_COST_RANGE};

/// What a vehicle payment was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    DownPayment,
    LoanInstallment,
    LeaseInstallment,
}

impl PaymentKind {
    pub const ALL: [PaymentKind; 3] = [
        PaymentKind::DownPayment,
        PaymentKind::LoanInstallment,
        PaymentKind::LeaseInstallment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentKind::DownPayment => "down_payment",
            PaymentKind::LoanInstallment => "loan_installment",
            PaymentKind::LeaseInstallment => "lease_installment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        PaymentKind::ALL.into_iter().find(|k| k.as_str() == lowered)
    }

    /// Classify legacy records that only describe the payment in free text.
    /// Only used when ingesting data that predates the structured kind.
    pub fn from_notes(notes: &str) -> Option<Self> {
        let lowered = notes.to_ascii_lowercase();
        if lowered.contains("down payment") {
            Some(PaymentKind::DownPayment)
        } else if lowered.contains("lease payment") {
            Some(PaymentKind::LeaseInstallment)
        } else if lowered.contains("loan payment") {
            Some(PaymentKind::LoanInstallment)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentKind::DownPayment => "Down payment",
            PaymentKind::LoanInstallment => "Loan payment",
            PaymentKind::LeaseInstallment => "Lease payment",
        }
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseKind {
    Insurance,
    Registration,
    VehiclePayment(PaymentKind),
}

impl ExpenseKind {
    /// External type name; vehicle payments share one name and carry the
    /// kind separately.
    pub fn type_name(self) -> &'static str {
        match self {
            ExpenseKind::Insurance => "insurance",
            ExpenseKind::Registration => "registration",
            ExpenseKind::VehiclePayment(_) => "vehicle_payment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherExpense {
    pub kind: ExpenseKind,
    pub date: NaiveDate,
    pub cost: Money,
    #[serde(default)]
    pub notes: String,
}

impl OtherExpense {
    pub fn payment_kind(&self) -> Option<PaymentKind> {
        match self.kind {
            ExpenseKind::VehiclePayment(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("cost", ENTRY_COST_RANGE, self.cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_notes_classifies_legacy_text() {
        assert_eq!(
            PaymentKind::from_notes("Auto-generated Loan Payment #4"),
            Some(PaymentKind::LoanInstallment)
        );
        assert_eq!(
            PaymentKind::from_notes("lease payment for March"),
            Some(PaymentKind::LeaseInstallment)
        );
        assert_eq!(
            PaymentKind::from_notes("Down payment at signing"),
            Some(PaymentKind::DownPayment)
        );
        assert_eq!(PaymentKind::from_notes("bought floor mats"), None);
    }

    #[test]
    fn test_payment_kind_only_for_vehicle_payments() {
        let expense = OtherExpense {
            kind: ExpenseKind::Insurance,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            cost: rust_decimal_macros::dec!(600),
            notes: String::new(),
        };
        assert_eq!(expense.payment_kind(), None);
        assert_eq!(expense.kind.type_name(), "insurance");
    }
}
