//! Fuel efficiency derivation for new fuel entries.
//!
//! Combustion vehicles report MPG from gallons and the distance since the
//! reference reading. Electric vehicles report MPGe from energy use and a
//! reference gasoline price, and their cost is derived rather than entered.
//! Limits that differ per kind live in [`LIMITS`].

pub mod combustion;
pub mod electric;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::{FuelEntry, FuelKind, VehicleRecord};
use crate::odometer::{self, SequenceContext};
use crate::types::{Money, Odometer};

/// Per-kind sequencing limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KindLimits {
    pub kind: FuelKind,
    /// Largest distance one entry may cover since the reference reading
    pub max_distance: Odometer,
}

pub const LIMITS: [KindLimits; 2] = [
    KindLimits {
        kind: FuelKind::Combustion,
        max_distance: 1_000,
    },
    KindLimits {
        kind: FuelKind::Electric,
        max_distance: 10_000,
    },
];

pub fn limits_for(kind: FuelKind) -> KindLimits {
    match kind {
        FuelKind::Combustion => LIMITS[0],
        FuelKind::Electric => LIMITS[1],
    }
}

/// User-entered measurements for one fill-up or charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FuelReading {
    Combustion {
        gallons: Decimal,
        cost: Money,
    },
    Electric {
        kwh_per_mile: Decimal,
        cost_per_kwh: Money,
        cost_per_gallon_reference: Money,
    },
}

impl FuelReading {
    pub fn kind(&self) -> FuelKind {
        match self {
            FuelReading::Combustion { .. } => FuelKind::Combustion,
            FuelReading::Electric { .. } => FuelKind::Electric,
        }
    }
}

/// A fuel entry before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelCandidate {
    pub date: NaiveDate,
    pub odometer: Odometer,
    pub reading: FuelReading,
}

/// Validate a candidate against `reference` and derive its efficiency.
pub fn compute_entry(
    kind: FuelKind,
    candidate: &FuelCandidate,
    reference: Odometer,
) -> Result<FuelEntry, ValidationError> {
    if candidate.reading.kind() != kind {
        let field = match kind {
            FuelKind::Combustion => "gallons",
            FuelKind::Electric => "kwh_per_mile",
        };
        return Err(ValidationError::required(field));
    }

    odometer::check_after(reference, candidate.odometer)?;

    let limits = limits_for(kind);
    let distance = candidate.odometer - reference;
    if distance > limits.max_distance {
        return Err(ValidationError::FailsPlausibility {
            field: "odometer".into(),
            limit: Decimal::from(reference) + Decimal::from(limits.max_distance),
            actual: Decimal::from(candidate.odometer),
            reason: format!(
                "a single entry cannot cover more than {} miles",
                limits.max_distance
            ),
        });
    }

    match candidate.reading {
        FuelReading::Combustion { gallons, cost } => {
            combustion::compute(candidate, distance, gallons, cost)
        }
        FuelReading::Electric {
            kwh_per_mile,
            cost_per_kwh,
            cost_per_gallon_reference,
        } => electric::compute(
            candidate,
            distance,
            kwh_per_mile,
            cost_per_kwh,
            cost_per_gallon_reference,
        ),
    }
}

/// Interactive entry: the reference is the latest reading on record.
pub fn validate_fuel_entry(
    record: &VehicleRecord,
    candidate: &FuelCandidate,
) -> Result<FuelEntry, ValidationError> {
    let reference = odometer::latest_reference(record, SequenceContext::Fuel);
    compute_entry(record.vehicle.fuel_kind(), candidate, reference)
}

/// Out-of-order entry: the reference is the preceding entry, and the
/// reading must also stay below the following one.
pub fn validate_fuel_insertion(
    record: &VehicleRecord,
    candidate: &FuelCandidate,
) -> Result<FuelEntry, ValidationError> {
    let position = odometer::insertion_position(record, candidate.date, candidate.odometer);
    let entry = compute_entry(record.vehicle.fuel_kind(), candidate, position.reference)?;
    odometer::check_before_successor(&position, candidate.odometer)?;
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FuelType, Vehicle};
    use rust_decimal_macros::dec;

    fn candidate(odometer: Odometer, reading: FuelReading) -> FuelCandidate {
        FuelCandidate {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            odometer,
            reading,
        }
    }

    #[test]
    fn test_limits_table() {
        assert_eq!(limits_for(FuelKind::Combustion).max_distance, 1_000);
        assert_eq!(limits_for(FuelKind::Electric).max_distance, 10_000);
    }

    #[test]
    fn test_wrong_reading_kind_is_missing_field() {
        let c = candidate(
            500,
            FuelReading::Combustion {
                gallons: dec!(10),
                cost: dec!(40),
            },
        );
        assert_eq!(
            compute_entry(FuelKind::Electric, &c, 0),
            Err(ValidationError::required("kwh_per_mile"))
        );
    }

    #[test]
    fn test_jump_limit_differs_by_kind() {
        let electric = FuelReading::Electric {
            kwh_per_mile: dec!(0.3),
            cost_per_kwh: dec!(0.125),
            cost_per_gallon_reference: dec!(4.5),
        };
        assert!(compute_entry(FuelKind::Electric, &candidate(6_000, electric), 0).is_ok());

        let gas = FuelReading::Combustion {
            gallons: dec!(60),
            cost: dec!(200),
        };
        assert!(matches!(
            compute_entry(FuelKind::Combustion, &candidate(1_001, gas), 0),
            Err(ValidationError::FailsPlausibility { .. })
        ));
    }

    #[test]
    fn test_validate_uses_latest_reference() {
        let mut v = Vehicle::new(1, 2018, "Subaru", "Outback", FuelType::Gasoline);
        v.purchased_odometer = Some(20_000);
        let record = VehicleRecord::new(v);
        let c = candidate(
            20_300,
            FuelReading::Combustion {
                gallons: dec!(12),
                cost: dec!(45),
            },
        );
        let entry = validate_fuel_entry(&record, &c).unwrap();
        assert_eq!(entry.mpg(), Some(dec!(25)));
    }
}
