use autolog_core::efficiency::{
    validate_fuel_entry, validate_fuel_insertion, FuelCandidate, FuelReading,
};
use autolog_core::model::{FuelType, Vehicle, VehicleRecord};
use autolog_core::odometer::{insertion_position, latest_reference, SequenceContext};
use autolog_core::{Odometer, ValidationError};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn vehicle(fuel_type: FuelType, purchased_odometer: Odometer) -> VehicleRecord {
    let mut v = Vehicle::new(1, 2022, "Ford", "Maverick", fuel_type);
    v.purchased_date = Some(d(2024, 1, 1));
    v.purchased_odometer = Some(purchased_odometer);
    VehicleRecord::new(v)
}

fn gas(date: NaiveDate, odometer: Odometer, gallons: rust_decimal::Decimal) -> FuelCandidate {
    FuelCandidate {
        date,
        odometer,
        reading: FuelReading::Combustion {
            gallons,
            cost: dec!(38.50),
        },
    }
}

// ===========================================================================
// Combustion
// ===========================================================================

#[test]
fn test_combustion_mpg_accepted() {
    let record = vehicle(FuelType::Gasoline, 10_000);
    let entry = validate_fuel_entry(&record, &gas(d(2024, 2, 1), 10_350, dec!(10))).unwrap();
    assert_eq!(entry.mpg(), Some(dec!(35.00)));
    assert_eq!(entry.mpge(), None);
    assert_eq!(entry.cost, dec!(38.50));
}

#[test]
fn test_combustion_low_mpg_rejected() {
    let record = vehicle(FuelType::Gasoline, 10_000);
    let err = validate_fuel_entry(&record, &gas(d(2024, 2, 1), 10_020, dec!(10))).unwrap_err();
    match err {
        ValidationError::FailsPlausibility { field, limit, actual, .. } => {
            assert_eq!(field, "mpg");
            assert_eq!(limit, dec!(4.0));
            assert_eq!(actual, dec!(2.00));
        }
        other => panic!("expected plausibility failure, got {other:?}"),
    }
}

#[test]
fn test_reading_must_exceed_reference() {
    let record = vehicle(FuelType::Diesel, 10_000);
    let err = validate_fuel_entry(&record, &gas(d(2024, 2, 1), 10_000, dec!(10))).unwrap_err();
    assert_eq!(
        err,
        ValidationError::FailsSequence {
            field: "odometer".into(),
            reference: 10_000,
            actual: 10_000,
        }
    );
}

#[test]
fn test_single_fill_cannot_exceed_thousand_miles() {
    let record = vehicle(FuelType::Hybrid, 10_000);
    let ok = validate_fuel_entry(&record, &gas(d(2024, 2, 1), 11_000, dec!(20)));
    assert!(ok.is_ok());
    let err = validate_fuel_entry(&record, &gas(d(2024, 2, 1), 11_001, dec!(20))).unwrap_err();
    assert!(matches!(err, ValidationError::FailsPlausibility { ref field, .. } if field == "odometer"));
}

#[test]
fn test_sequence_checked_before_bounds() {
    let record = vehicle(FuelType::Gasoline, 10_000);
    // Both the reading and the gallons are wrong; the reading is reported
    let err = validate_fuel_entry(&record, &gas(d(2024, 2, 1), 9_000, dec!(0))).unwrap_err();
    assert!(matches!(err, ValidationError::FailsSequence { .. }));

    let err = validate_fuel_entry(&record, &gas(d(2024, 2, 1), 10_300, dec!(0))).unwrap_err();
    assert!(matches!(err, ValidationError::FailsBounds { ref field, .. } if field == "gallons"));
}

fn paid(odometer: Odometer, gallons: rust_decimal::Decimal, cost: rust_decimal::Decimal) -> FuelCandidate {
    FuelCandidate {
        date: d(2024, 2, 1),
        odometer,
        reading: FuelReading::Combustion { gallons, cost },
    }
}

#[test]
fn test_cost_upper_bound() {
    let record = vehicle(FuelType::Gasoline, 10_000);
    let entry = validate_fuel_entry(&record, &paid(10_350, dec!(10), dec!(500))).unwrap();
    assert_eq!(entry.cost, dec!(500));

    let err = validate_fuel_entry(&record, &paid(10_350, dec!(10), dec!(500.01))).unwrap_err();
    assert!(matches!(err, ValidationError::FailsBounds { ref field, .. } if field == "cost"));
}

#[test]
fn test_gallons_upper_bound() {
    let record = vehicle(FuelType::Diesel, 10_000);
    // 500 miles on 100 gallons is 5 mpg, above the floor
    let entry = validate_fuel_entry(&record, &paid(10_500, dec!(100), dec!(450))).unwrap();
    assert_eq!(entry.mpg(), Some(dec!(5)));

    let err = validate_fuel_entry(&record, &paid(10_500, dec!(100.001), dec!(450))).unwrap_err();
    assert!(matches!(err, ValidationError::FailsBounds { ref field, .. } if field == "gallons"));
}

#[test]
fn test_mpg_ceiling() {
    let record = vehicle(FuelType::Hybrid, 10_000);
    let ok = validate_fuel_entry(&record, &paid(11_000, dec!(10), dec!(40))).unwrap();
    assert_eq!(ok.mpg(), Some(dec!(100)));

    let err = validate_fuel_entry(&record, &paid(11_000, dec!(5), dec!(20))).unwrap_err();
    match err {
        ValidationError::FailsPlausibility { field, limit, actual, .. } => {
            assert_eq!(field, "mpg");
            assert_eq!(limit, dec!(100.0));
            assert_eq!(actual, dec!(200));
        }
        other => panic!("expected plausibility failure, got {other:?}"),
    }
}

// ===========================================================================
// Electric
// ===========================================================================

fn charge(odometer: Odometer) -> FuelCandidate {
    FuelCandidate {
        date: d(2024, 3, 1),
        odometer,
        reading: FuelReading::Electric {
            kwh_per_mile: dec!(0.300),
            cost_per_kwh: dec!(0.125),
            cost_per_gallon_reference: dec!(4.50),
        },
    }
}

#[test]
fn test_electric_mpge_and_derived_cost() {
    let record = vehicle(FuelType::Electric, 5_000);
    let entry = validate_fuel_entry(&record, &charge(5_300)).unwrap();
    assert_eq!(entry.mpge(), Some(dec!(120.0)));
    assert_eq!(entry.cost, dec!(11.25));
    assert_eq!(entry.mpg(), None);
}

#[test]
fn test_electric_allows_wider_jump() {
    let record = vehicle(FuelType::Electric, 5_000);
    assert!(validate_fuel_entry(&record, &charge(14_000)).is_ok());
    assert!(matches!(
        validate_fuel_entry(&record, &charge(15_001)),
        Err(ValidationError::FailsPlausibility { .. })
    ));
}

#[test]
fn test_reading_kind_must_match_vehicle() {
    let record = vehicle(FuelType::Electric, 5_000);
    let err = validate_fuel_entry(&record, &gas(d(2024, 3, 1), 5_300, dec!(10))).unwrap_err();
    assert_eq!(err.field(), "kwh_per_mile");
}

// ===========================================================================
// Sequencing against history
// ===========================================================================

fn with_history() -> VehicleRecord {
    let mut record = vehicle(FuelType::Gasoline, 10_000);
    for (date, odometer) in [(d(2024, 1, 10), 10_500), (d(2024, 2, 10), 11_200)] {
        let entry = validate_fuel_entry(&record, &gas(date, odometer, dec!(15))).unwrap();
        record.fuel_entries.push(entry);
    }
    record
}

#[test]
fn test_reference_for_latest_and_between_entries() {
    let record = with_history();
    assert_eq!(latest_reference(&record, SequenceContext::Fuel), 11_200);
    assert_eq!(insertion_position(&record, d(2024, 2, 10), 11_300).reference, 11_200);
    assert_eq!(insertion_position(&record, d(2024, 1, 20), 10_800).reference, 10_500);
}

#[test]
fn test_insertion_between_entries_uses_preceding_reading() {
    let record = with_history();
    let entry = validate_fuel_insertion(&record, &gas(d(2024, 1, 20), 10_800, dec!(10))).unwrap();
    assert_eq!(entry.mpg(), Some(dec!(30.00)));

    // Interactive entry would compare against 11,200 and reject it
    assert!(validate_fuel_entry(&record, &gas(d(2024, 1, 20), 10_800, dec!(10))).is_err());
}

#[test]
fn test_insertion_must_stay_below_successor() {
    let record = with_history();
    let err = validate_fuel_insertion(&record, &gas(d(2024, 1, 20), 11_300, dec!(10))).unwrap_err();
    assert!(matches!(err, ValidationError::FailsSequence { .. }));
}
