use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use autolog_core::efficiency::{
    limits_for, validate_fuel_entry, validate_fuel_insertion, FuelCandidate, FuelReading,
};
use autolog_core::model::FuelKind;
use autolog_core::odometer::{insertion_position, latest_reference, SequenceContext};
use autolog_core::VehicleId;

use crate::input;

/// Arguments for validating a new fill-up or charge
#[derive(Args)]
pub struct FuelArgs {
    /// Vehicle records file (interchange shape); stdin when omitted
    #[arg(long)]
    pub input: Option<String>,

    /// Vehicle to add the entry to
    #[arg(long)]
    pub vehicle: VehicleId,

    /// Entry date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    /// Odometer reading in miles
    #[arg(long)]
    pub odometer: u32,

    /// Gallons bought (combustion)
    #[arg(long)]
    pub gallons: Option<Decimal>,

    /// Amount paid (combustion)
    #[arg(long)]
    pub cost: Option<Decimal>,

    /// Energy use (electric)
    #[arg(long)]
    pub kwh_per_mile: Option<Decimal>,

    /// Electricity price (electric)
    #[arg(long)]
    pub cost_per_kwh: Option<Decimal>,

    /// Reference gasoline price for MPGe (electric)
    #[arg(long)]
    pub gas_price: Option<Decimal>,

    /// Place the entry among existing ones by date instead of after the latest
    #[arg(long)]
    pub insert: bool,
}

pub fn run_fuel(args: FuelArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let records = input::records(args.input.as_deref(), "fuel entry validation")?;
    let record = input::select(records, Some(args.vehicle))?
        .into_iter()
        .next()
        .ok_or("vehicle not found")?;

    let kind = record.vehicle.fuel_kind();
    let reading = match kind {
        FuelKind::Combustion => FuelReading::Combustion {
            gallons: args.gallons.ok_or("--gallons is required for this vehicle")?,
            cost: args.cost.ok_or("--cost is required for this vehicle")?,
        },
        FuelKind::Electric => FuelReading::Electric {
            kwh_per_mile: args.kwh_per_mile.ok_or("--kwh-per-mile is required for this vehicle")?,
            cost_per_kwh: args.cost_per_kwh.ok_or("--cost-per-kwh is required for this vehicle")?,
            cost_per_gallon_reference: args.gas_price.ok_or("--gas-price is required for this vehicle")?,
        },
    };
    let candidate = FuelCandidate {
        date: args.date,
        odometer: args.odometer,
        reading,
    };

    let (entry, reference) = if args.insert {
        let position = insertion_position(&record, candidate.date, candidate.odometer);
        (validate_fuel_insertion(&record, &candidate)?, position.reference)
    } else {
        let reference = latest_reference(&record, SequenceContext::Fuel);
        (validate_fuel_entry(&record, &candidate)?, reference)
    };

    Ok(json!({
        "result": {
            "vehicle": record.vehicle.display_name(),
            "reference_odometer": reference,
            "distance": entry.odometer - reference,
            "max_distance": limits_for(kind).max_distance,
            "mpg": entry.mpg(),
            "mpge": entry.mpge(),
            "cost": entry.cost,
            "entry": entry,
        }
    }))
}
