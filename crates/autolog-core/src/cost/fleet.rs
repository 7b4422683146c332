use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use chrono::NaiveDate;
use log::{info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::VehicleRecord;
use crate::types::*;

use super::vehicle::{compute_vehicle_costs, VehicleCostReport};

/// Numeric report columns that rows can be sorted and highlighted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportField {
    DaysOwned,
    MilesDriven,
    Depreciation,
    InterestPaid,
    LeasePayments,
    VehicleCost,
    FuelCost,
    MaintenanceCost,
    InsuranceCost,
    RegistrationCost,
    TotalCost,
    TotalCostPerDay,
    VehicleCostPerDay,
    CostPerMile,
    AverageEfficiency,
}

impl ReportField {
    pub const ALL: [ReportField; 15] = [
        ReportField::DaysOwned,
        ReportField::MilesDriven,
        ReportField::Depreciation,
        ReportField::InterestPaid,
        ReportField::LeasePayments,
        ReportField::VehicleCost,
        ReportField::FuelCost,
        ReportField::MaintenanceCost,
        ReportField::InsuranceCost,
        ReportField::RegistrationCost,
        ReportField::TotalCost,
        ReportField::TotalCostPerDay,
        ReportField::VehicleCostPerDay,
        ReportField::CostPerMile,
        ReportField::AverageEfficiency,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportField::DaysOwned => "days_owned",
            ReportField::MilesDriven => "miles_driven",
            ReportField::Depreciation => "depreciation",
            ReportField::InterestPaid => "interest_paid",
            ReportField::LeasePayments => "lease_payments",
            ReportField::VehicleCost => "vehicle_cost",
            ReportField::FuelCost => "fuel_cost",
            ReportField::MaintenanceCost => "maintenance_cost",
            ReportField::InsuranceCost => "insurance_cost",
            ReportField::RegistrationCost => "registration_cost",
            ReportField::TotalCost => "total_cost",
            ReportField::TotalCostPerDay => "total_cost_per_day",
            ReportField::VehicleCostPerDay => "vehicle_cost_per_day",
            ReportField::CostPerMile => "cost_per_mile",
            ReportField::AverageEfficiency => "average_efficiency",
        }
    }

    /// Column value; an unknown depreciation reads as zero.
    pub fn value(self, row: &VehicleCostReport) -> Decimal {
        match self {
            ReportField::DaysOwned => Decimal::from(row.days_owned),
            ReportField::MilesDriven => Decimal::from(row.miles_driven),
            ReportField::Depreciation => row.depreciation.unwrap_or(Decimal::ZERO),
            ReportField::InterestPaid => row.interest_paid,
            ReportField::LeasePayments => row.lease_payments,
            ReportField::VehicleCost => row.vehicle_cost,
            ReportField::FuelCost => row.fuel_cost,
            ReportField::MaintenanceCost => row.maintenance_cost,
            ReportField::InsuranceCost => row.insurance_cost,
            ReportField::RegistrationCost => row.registration_cost,
            ReportField::TotalCost => row.total_cost,
            ReportField::TotalCostPerDay => row.total_cost_per_day,
            ReportField::VehicleCostPerDay => row.vehicle_cost_per_day,
            ReportField::CostPerMile => row.cost_per_mile,
            ReportField::AverageEfficiency => row.average_efficiency,
        }
    }
}

impl fmt::Display for ReportField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        ReportField::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| format!("unknown report field '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Smallest and largest positive value of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldExtremes {
    pub min: Decimal,
    pub max: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetReport {
    pub rows: Vec<VehicleCostReport>,
    pub highlights: BTreeMap<ReportField, FieldExtremes>,
    /// Vehicles left out for lack of an ownership start date
    pub skipped: Vec<VehicleId>,
}

/// Stable sort of report rows by one column.
pub fn sort_rows(rows: &mut [VehicleCostReport], field: ReportField, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = field.value(a).cmp(&field.value(b));
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// Min and max over positive values only; `None` when no row is positive.
pub fn field_extremes(rows: &[VehicleCostReport], field: ReportField) -> Option<FieldExtremes> {
    let mut positive = rows
        .iter()
        .map(|r| field.value(r))
        .filter(|v| *v > Decimal::ZERO);
    let first = positive.next()?;
    let (min, max) = positive.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    Some(FieldExtremes { min, max })
}

pub fn highlights(rows: &[VehicleCostReport]) -> BTreeMap<ReportField, FieldExtremes> {
    ReportField::ALL
        .into_iter()
        .filter_map(|field| field_extremes(rows, field).map(|ext| (field, ext)))
        .collect()
}

/// Cost rows for every vehicle that has an ownership start, optionally
/// sorted, with per-column highlights.
pub fn fleet_report(
    records: &[VehicleRecord],
    today: NaiveDate,
    sort: Option<(ReportField, SortDirection)>,
) -> ComputationOutput<FleetReport> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for record in records {
        if record.vehicle.ownership_start().is_none() {
            warn!(
                "vehicle {}: skipped in fleet report, no ownership start date",
                record.vehicle.id
            );
            warnings.push(format!(
                "{} skipped: no purchase date or lease start",
                record.vehicle.display_name()
            ));
            skipped.push(record.vehicle.id);
            continue;
        }
        match compute_vehicle_costs(record, today, &mut warnings) {
            Ok(row) => rows.push(row),
            Err(e) => {
                warnings.push(format!("{}: {e}", record.vehicle.display_name()));
                skipped.push(record.vehicle.id);
            }
        }
    }

    if let Some((field, direction)) = sort {
        sort_rows(&mut rows, field, direction);
    }
    let highlights = highlights(&rows);

    info!(
        "fleet report: {} vehicles reported, {} skipped",
        rows.len(),
        skipped.len()
    );

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Per-vehicle ownership cost, highlights over positive values",
        &serde_json::json!({
            "today": today.to_string(),
            "vehicles": records.len(),
            "sort": sort.map(|(f, d)| format!("{f} {d:?}")),
        }),
        warnings,
        elapsed,
        FleetReport {
            rows,
            highlights,
            skipped,
        },
    )
}
