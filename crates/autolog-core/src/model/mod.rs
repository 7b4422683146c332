//! In-memory snapshots of a vehicle and its child records.
//!
//! The storage layer owns persistence; the engine only reads these
//! snapshots and hands back validated or derived values.

pub mod expense;
pub mod fuel;
pub mod maintenance;
pub mod vehicle;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValueRange};
use crate::types::{Money, Odometer};

pub use expense::{ExpenseKind, OtherExpense, PaymentKind};
pub use fuel::{FuelEfficiency, FuelEntry};
pub use maintenance::{MaintenanceCategory, MaintenanceEntry};
pub use vehicle::{Financing, FuelKind, FuelType, LeaseTerms, LoanTerms, Vehicle};

/// Highest odometer reading accepted anywhere.
pub const MAX_ODOMETER: Odometer = 999_999;

/// Cost range for maintenance entries and other expenses.
pub const ENTRY_COST_RANGE: ValueRange = ValueRange::positive_up_to(dec!(999999.99));

pub(crate) fn check_odometer(field: &str, reading: Odometer) -> Result<(), ValidationError> {
    if reading > MAX_ODOMETER {
        return Err(ValidationError::FailsPlausibility {
            field: field.into(),
            limit: Decimal::from(MAX_ODOMETER),
            actual: Decimal::from(reading),
            reason: "odometer readings cannot exceed six digits".into(),
        });
    }
    Ok(())
}

pub(crate) fn check_range(
    field: &str,
    range: ValueRange,
    actual: Decimal,
) -> Result<(), ValidationError> {
    if range.contains(actual) {
        Ok(())
    } else {
        Err(ValidationError::FailsBounds {
            field: field.into(),
            range,
            actual,
        })
    }
}

/// A vehicle together with its full history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub vehicle: Vehicle,
    #[serde(default)]
    pub fuel_entries: Vec<FuelEntry>,
    #[serde(default)]
    pub maintenance_entries: Vec<MaintenanceEntry>,
    #[serde(default)]
    pub other_expenses: Vec<OtherExpense>,
}

impl VehicleRecord {
    pub fn new(vehicle: Vehicle) -> Self {
        Self {
            vehicle,
            ..Default::default()
        }
    }

    /// Highest reading seen across fuel and maintenance history.
    pub fn max_observed_odometer(&self) -> Option<Odometer> {
        let fuel = self.fuel_entries.iter().map(|e| e.odometer);
        let maintenance = self.maintenance_entries.iter().map(|e| e.odometer);
        fuel.chain(maintenance).max()
    }

    /// Number of recorded loan installments, the payments-made count used
    /// for interest-to-date.
    pub fn loan_installments_made(&self) -> u32 {
        self.count_payments(PaymentKind::LoanInstallment)
    }

    pub fn count_payments(&self, kind: PaymentKind) -> u32 {
        let count = self
            .other_expenses
            .iter()
            .filter(|e| e.payment_kind() == Some(kind))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    pub fn payments_total(&self, kind: PaymentKind) -> Money {
        self.other_expenses
            .iter()
            .filter(|e| e.payment_kind() == Some(kind))
            .map(|e| e.cost)
            .sum()
    }
}
