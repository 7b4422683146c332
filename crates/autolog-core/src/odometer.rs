//! Reference readings that a new record's odometer must exceed.
//!
//! Two flavours exist. Interactive entry compares against the latest
//! reading on record. Bulk import may deliver entries out of order, so each
//! candidate is placed in {date, odometer} order and compared against its
//! immediate neighbours instead.
//!
//! Both are read-then-validate: callers must serialize writes per vehicle
//! or two concurrent entries can each pass against the same reference.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::VehicleRecord;
use crate::types::Odometer;

/// Which history feeds the latest-reading reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceContext {
    /// Fuel history and the purchase reading
    Fuel,
    /// Fuel and maintenance history and the purchase reading
    Maintenance,
}

/// Where a candidate sits among existing fuel entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencePosition {
    pub reference: Odometer,
    /// Reading of the next entry in order, if the candidate is not last
    pub successor: Option<Odometer>,
}

/// Highest of: the latest fuel entry (by date, ties by higher reading), the
/// highest maintenance reading in maintenance context, and the purchase
/// reading. Zero when the vehicle has no history at all.
pub fn latest_reference(record: &VehicleRecord, context: SequenceContext) -> Odometer {
    let latest_fuel = record
        .fuel_entries
        .iter()
        .max_by_key(|e| (e.date, e.odometer))
        .map(|e| e.odometer);

    let latest_maintenance = match context {
        SequenceContext::Fuel => None,
        SequenceContext::Maintenance => record.maintenance_entries.iter().map(|e| e.odometer).max(),
    };

    [
        latest_fuel,
        latest_maintenance,
        record.vehicle.purchased_odometer,
    ]
    .into_iter()
    .flatten()
    .max()
    .unwrap_or(0)
}

/// Neighbours of a candidate dated `date` with reading `odometer`, in
/// {date ascending, odometer ascending} order. With no preceding entry the
/// purchase reading (or zero) is the reference.
pub fn insertion_position(
    record: &VehicleRecord,
    date: NaiveDate,
    odometer: Odometer,
) -> SequencePosition {
    let key = (date, odometer);

    let preceding = record
        .fuel_entries
        .iter()
        .filter(|e| (e.date, e.odometer) < key)
        .max_by_key(|e| (e.date, e.odometer))
        .map(|e| e.odometer);

    let successor = record
        .fuel_entries
        .iter()
        .filter(|e| (e.date, e.odometer) >= key)
        .min_by_key(|e| (e.date, e.odometer))
        .map(|e| e.odometer);

    SequencePosition {
        reference: preceding
            .or(record.vehicle.purchased_odometer)
            .unwrap_or(0),
        successor,
    }
}

/// Reading must be strictly greater than the reference.
pub fn check_after(reference: Odometer, odometer: Odometer) -> Result<(), ValidationError> {
    if odometer <= reference {
        return Err(ValidationError::FailsSequence {
            field: "odometer".into(),
            reference,
            actual: odometer,
        });
    }
    Ok(())
}

/// Reading must stay strictly below the next entry, when there is one.
pub fn check_before_successor(
    position: &SequencePosition,
    odometer: Odometer,
) -> Result<(), ValidationError> {
    match position.successor {
        Some(next) if odometer >= next => Err(ValidationError::FailsSequence {
            field: "odometer".into(),
            reference: position.reference,
            actual: odometer,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        FuelEfficiency, FuelEntry, FuelType, MaintenanceCategory, MaintenanceEntry, Vehicle,
    };
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn fuel(date: NaiveDate, odometer: Odometer) -> FuelEntry {
        FuelEntry {
            date,
            odometer,
            cost: dec!(40),
            efficiency: FuelEfficiency::Combustion {
                gallons: dec!(10),
                mpg: dec!(30),
            },
        }
    }

    fn record() -> VehicleRecord {
        let mut v = Vehicle::new(1, 2019, "Mazda", "3", FuelType::Gasoline);
        v.purchased_odometer = Some(10_000);
        let mut r = VehicleRecord::new(v);
        r.fuel_entries = vec![fuel(d(2024, 1, 5), 10_500), fuel(d(2024, 3, 5), 11_200)];
        r
    }

    #[test]
    fn test_latest_reference_uses_last_entry() {
        assert_eq!(latest_reference(&record(), SequenceContext::Fuel), 11_200);
    }

    #[test]
    fn test_empty_history_falls_back_to_purchase_then_zero() {
        let mut r = record();
        r.fuel_entries.clear();
        assert_eq!(latest_reference(&r, SequenceContext::Fuel), 10_000);
        r.vehicle.purchased_odometer = None;
        assert_eq!(latest_reference(&r, SequenceContext::Fuel), 0);
    }

    #[test]
    fn test_maintenance_context_includes_maintenance() {
        let mut r = record();
        r.maintenance_entries.push(MaintenanceEntry {
            category: MaintenanceCategory::Oil,
            date: d(2024, 2, 1),
            odometer: 12_000,
            cost: dec!(60),
            notes: String::new(),
        });
        assert_eq!(latest_reference(&r, SequenceContext::Fuel), 11_200);
        assert_eq!(latest_reference(&r, SequenceContext::Maintenance), 12_000);
    }

    #[test]
    fn test_same_day_tie_breaks_on_reading() {
        let mut r = record();
        r.fuel_entries.push(fuel(d(2024, 3, 5), 11_150));
        assert_eq!(latest_reference(&r, SequenceContext::Fuel), 11_200);
    }

    #[test]
    fn test_insertion_between_entries() {
        let pos = insertion_position(&record(), d(2024, 2, 10), 10_900);
        assert_eq!(pos.reference, 10_500);
        assert_eq!(pos.successor, Some(11_200));
        assert!(check_before_successor(&pos, 10_900).is_ok());
        assert!(check_before_successor(&pos, 11_300).is_err());
    }

    #[test]
    fn test_insertion_before_first_uses_purchase() {
        let pos = insertion_position(&record(), d(2023, 12, 1), 10_100);
        assert_eq!(pos.reference, 10_000);
        assert_eq!(pos.successor, Some(10_500));
    }

    #[test]
    fn test_check_after_rejects_equal() {
        assert!(check_after(100, 101).is_ok());
        assert_eq!(
            check_after(100, 100),
            Err(ValidationError::FailsSequence {
                field: "odometer".into(),
                reference: 100,
                actual: 100,
            })
        );
    }
}
