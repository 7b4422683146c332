//! Bulk import of externally shaped JSON.
//!
//! Each record is mapped, type-converted and then run through the same
//! validators as interactive entry. A failing record is reported with its
//! ordinal position and the batch carries on.

use std::fmt;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::efficiency::{validate_fuel_insertion, FuelCandidate, FuelReading};
use crate::error::{AutologError, ValidationError};
use crate::model::{
    check_odometer, ExpenseKind, Financing, FuelEntry, FuelKind, FuelType, LeaseTerms, LoanTerms,
    MaintenanceCategory, MaintenanceEntry, OtherExpense, PaymentKind, Vehicle, VehicleRecord,
};
use crate::types::{Odometer, VehicleId};
use crate::AutologResult;

use super::fields::Fields;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Vehicle,
    FuelEntry,
    MaintenanceEntry,
    OtherExpense,
}

impl RecordKind {
    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Vehicle => "Vehicle",
            RecordKind::FuelEntry => "Fuel entry",
            RecordKind::MaintenanceEntry => "Maintenance entry",
            RecordKind::OtherExpense => "Expense",
        }
    }
}

/// One rejected record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportError {
    pub record: RecordKind,
    /// 1-based position within its list
    pub position: usize,
    /// Position of the owning vehicle, for children nested in a vehicle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    pub error: ValidationError,
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parent {
            Some(parent) => write!(
                f,
                "Vehicle {parent}, {} {}: {}",
                self.record.label().to_ascii_lowercase(),
                self.position,
                self.error
            ),
            None => write!(f, "{} {}: {}", self.record.label(), self.position, self.error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport<T> {
    pub accepted: Vec<T>,
    pub errors: Vec<ImportError>,
}

impl<T> ImportReport<T> {
    pub fn new() -> Self {
        Self {
            accepted: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

impl<T> Default for ImportReport<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse raw text, rejecting anything that is not JSON.
pub fn parse_payload(text: &str) -> AutologResult<Value> {
    serde_json::from_str(text)
        .map_err(|e| AutologError::InvalidPayload(format!("malformed JSON: {e}")))
}

/// Records of a payload: an array, an envelope `{"<key>": [...]}`, or a
/// single object.
fn records_of<'a>(payload: &'a Value, envelope: &str) -> AutologResult<Vec<&'a Value>> {
    match payload {
        Value::Array(items) => Ok(items.iter().collect()),
        Value::Object(map) => match map.get(envelope) {
            Some(Value::Array(items)) => Ok(items.iter().collect()),
            Some(_) => Err(AutologError::InvalidPayload(format!(
                "'{envelope}' must be an array"
            ))),
            None => Ok(vec![payload]),
        },
        _ => Err(AutologError::InvalidPayload(
            "expected a JSON object or an array of objects".into(),
        )),
    }
}

fn ingest<I, T>(
    kind: RecordKind,
    items: impl IntoIterator<Item = I>,
    parent: Option<usize>,
    mut accept: impl FnMut(I) -> Result<T, ValidationError>,
) -> ImportReport<T> {
    let mut report = ImportReport::new();
    for (idx, item) in items.into_iter().enumerate() {
        match accept(item) {
            Ok(value) => report.accepted.push(value),
            Err(error) => report.errors.push(rejected(kind, idx + 1, parent, error)),
        }
    }
    report
}

fn rejected(
    kind: RecordKind,
    position: usize,
    parent: Option<usize>,
    error: ValidationError,
) -> ImportError {
    debug!("{} {position} rejected: {error}", kind.label());
    ImportError {
        record: kind,
        position,
        parent,
        error,
    }
}

// ---------------------------------------------------------------------------
// Vehicles
// ---------------------------------------------------------------------------

/// Import vehicles, numbering accepted ones from `first_id`. Children nested
/// under a vehicle are imported into its record; their failures are reported
/// alongside the vehicle failures, tagged with the vehicle's position.
pub fn import_vehicles(
    payload: &Value,
    first_id: VehicleId,
) -> AutologResult<ImportReport<VehicleRecord>> {
    let items = records_of(payload, "vehicles")?;
    let mut report = ImportReport::new();
    let mut next_id = first_id;

    for (idx, item) in items.into_iter().enumerate() {
        let position = idx + 1;
        match vehicle_from(item, next_id) {
            Ok(vehicle) => {
                next_id += 1;
                let mut record = VehicleRecord::new(vehicle);
                report
                    .errors
                    .extend(import_children(&mut record, item, position));
                report.accepted.push(record);
            }
            Err(error) => {
                debug!("Vehicle {position} rejected: {error}");
                report.errors.push(ImportError {
                    record: RecordKind::Vehicle,
                    position,
                    parent: None,
                    error,
                });
            }
        }
    }

    info!(
        "vehicle import: {} accepted, {} errors",
        report.accepted.len(),
        report.errors.len()
    );
    Ok(report)
}

fn import_children(record: &mut VehicleRecord, item: &Value, parent: usize) -> Vec<ImportError> {
    let Ok(fields) = Fields::new(item) else {
        return Vec::new();
    };
    let mut errors = Vec::new();

    if let Some(items) = fields.array("fuelEntries") {
        errors.extend(ingest_fuel(record, items.iter(), Some(parent)).errors);
    }
    if let Some(items) = nested_maintenance(item) {
        errors.extend(ingest_maintenance(record, items, Some(parent)).errors);
    }
    if let Some(items) = fields.array("otherExpenses") {
        errors.extend(ingest_expenses(record, items.iter(), Some(parent)).errors);
    }
    errors
}

fn vehicle_from(item: &Value, id: VehicleId) -> Result<Vehicle, ValidationError> {
    let f = Fields::new(item)?;
    let year = f.required_integer::<u16>("year")?;
    let make = f.required_string("make")?;
    let model = f.required_string("model")?;
    let fuel_type = f
        .choice::<FuelType>("fuelType", &FuelType::ALL.map(FuelType::as_str))?
        .unwrap_or_default();

    let mut vehicle = Vehicle::new(id, year, &make, &model, fuel_type);
    vehicle.color = f.string("color");
    vehicle.vin_number = f.string("vinNumber");
    vehicle.license_plate_number = f.string("licensePlateNumber");
    vehicle.registration_number = f.string("registrationNumber");
    vehicle.state = f.string("state");
    vehicle.dealer_name = f.string("dealerName");
    vehicle.purchased_date = f.date("purchasedDate")?;
    vehicle.purchased_price = f.decimal("purchasedPrice")?;
    vehicle.purchased_odometer = f.integer::<Odometer>("purchasedOdometer")?;
    vehicle.sold_date = f.date("soldDate")?;
    vehicle.sold_price = f.decimal("soldPrice")?;
    vehicle.sold_odometer = f.integer::<Odometer>("soldOdometer")?;
    vehicle.current_value = f.decimal("currentValue")?;
    vehicle.current_value_date = f.date("currentValueDate")?;
    vehicle.financing = financing_from(&f)?;

    vehicle.validate()?;
    Ok(vehicle)
}

fn financing_from(f: &Fields<'_>) -> Result<Financing, ValidationError> {
    match (f.object("loanInfo"), f.object("leaseInfo")) {
        (Some(_), Some(_)) => Err(ValidationError::format(
            "leaseInfo",
            "loanInfo and leaseInfo",
            "either a loan or a lease, not both",
        )),
        (Some(loan), None) => loan_from(&Fields::new(loan)?).map(Financing::Loan),
        (None, Some(lease)) => lease_from(&Fields::new(lease)?).map(Financing::Lease),
        (None, None) => Ok(Financing::None),
    }
}

fn loan_from(f: &Fields<'_>) -> Result<LoanTerms, ValidationError> {
    let principal = match f.decimal("amount")? {
        Some(amount) => Some(amount),
        None => f.decimal("principal")?,
    };
    Ok(LoanTerms {
        start_date: f.date("startDate")?,
        principal,
        annual_rate: f.decimal("interestRate")?,
        term_months: f.integer("termMonths")?,
        payment_day: f.integer("paymentDay")?,
        auto_payment: f.boolean("autoPayment")?,
        down_payment: f.decimal("downPayment")?,
    })
}

fn lease_from(f: &Fields<'_>) -> Result<LeaseTerms, ValidationError> {
    Ok(LeaseTerms {
        start_date: f.date("startDate")?,
        monthly_payment: f.decimal("monthlyPayment")?,
        term_months: f.integer("termMonths")?,
        payment_day: f.integer("paymentDay")?,
        auto_payment: f.boolean("autoPayment")?,
        down_payment: f.decimal("downPayment")?,
    })
}

// ---------------------------------------------------------------------------
// Fuel entries
// ---------------------------------------------------------------------------

/// Import fuel entries into `record`. Entries may arrive in any order; each
/// one is sequenced against its neighbours by date, then odometer.
pub fn import_fuel_entries(
    record: &mut VehicleRecord,
    payload: &Value,
) -> AutologResult<ImportReport<FuelEntry>> {
    let items = records_of(payload, "fuelEntries")?;
    let report = ingest_fuel(record, items, None);
    info!(
        "vehicle {}: fuel import {} accepted, {} errors",
        record.vehicle.id,
        report.accepted.len(),
        report.errors.len()
    );
    Ok(report)
}

/// Candidates are parsed in payload order, then validated in {date,
/// odometer} order so each one is derived against its true predecessor
/// whatever order the batch arrived in. Errors keep payload positions.
fn ingest_fuel<'a>(
    record: &mut VehicleRecord,
    items: impl IntoIterator<Item = &'a Value>,
    parent: Option<usize>,
) -> ImportReport<FuelEntry> {
    let kind = record.vehicle.fuel_kind();
    let mut report = ImportReport::new();
    let mut candidates = Vec::new();

    for (idx, item) in items.into_iter().enumerate() {
        match fuel_candidate(item, kind) {
            Ok(candidate) => candidates.push((idx + 1, candidate)),
            Err(error) => {
                report
                    .errors
                    .push(rejected(RecordKind::FuelEntry, idx + 1, parent, error))
            }
        }
    }

    candidates.sort_by_key(|(_, c)| (c.date, c.odometer));
    for (position, candidate) in candidates {
        match validate_fuel_insertion(record, &candidate) {
            Ok(entry) => {
                record.fuel_entries.push(entry.clone());
                report.accepted.push(entry);
            }
            Err(error) => {
                report
                    .errors
                    .push(rejected(RecordKind::FuelEntry, position, parent, error))
            }
        }
    }

    report.errors.sort_by_key(|e| e.position);
    report
}

fn fuel_candidate(item: &Value, kind: FuelKind) -> Result<FuelCandidate, ValidationError> {
    let f = Fields::new(item)?;
    let date = f.required_date("date")?;
    let odometer = f.required_integer::<Odometer>("odometer")?;
    check_odometer("odometer", odometer)?;

    let reading = match kind {
        FuelKind::Combustion => FuelReading::Combustion {
            gallons: f.required_decimal("gallons")?,
            cost: f.required_decimal("cost")?,
        },
        FuelKind::Electric => FuelReading::Electric {
            kwh_per_mile: f.required_decimal("kwhPerMile")?,
            cost_per_kwh: f.required_decimal("costPerKwh")?,
            cost_per_gallon_reference: f.required_decimal("costPerGallonReference")?,
        },
    };
    Ok(FuelCandidate {
        date,
        odometer,
        reading,
    })
}

// ---------------------------------------------------------------------------
// Maintenance entries
// ---------------------------------------------------------------------------

/// A maintenance record and, for the category-keyed shape, its group key.
type MaintenanceItem<'a> = (Option<&'a str>, &'a Value);

/// Import maintenance entries into `record`. Accepts a list of entries with
/// a `category` field, or `{"maintenance": {"oil": [...], ...}}`.
pub fn import_maintenance_entries(
    record: &mut VehicleRecord,
    payload: &Value,
) -> AutologResult<ImportReport<MaintenanceEntry>> {
    let items: Vec<MaintenanceItem<'_>> = match nested_maintenance(payload) {
        Some(items) => items,
        None => records_of(payload, "maintenanceEntries")?
            .into_iter()
            .map(|v| (None, v))
            .collect(),
    };
    let report = ingest_maintenance(record, items, None);
    info!(
        "vehicle {}: maintenance import {} accepted, {} errors",
        record.vehicle.id,
        report.accepted.len(),
        report.errors.len()
    );
    Ok(report)
}

fn nested_maintenance(value: &Value) -> Option<Vec<MaintenanceItem<'_>>> {
    if let Some(groups) = value.get("maintenance").and_then(Value::as_object) {
        let items = groups
            .iter()
            .filter_map(|(key, list)| list.as_array().map(|l| (key, l)))
            .flat_map(|(key, list)| list.iter().map(move |v| (Some(key.as_str()), v)))
            .collect();
        return Some(items);
    }
    value
        .get("maintenanceEntries")
        .and_then(Value::as_array)
        .map(|list| list.iter().map(|v| (None, v)).collect())
}

fn ingest_maintenance<'a>(
    record: &mut VehicleRecord,
    items: impl IntoIterator<Item = MaintenanceItem<'a>>,
    parent: Option<usize>,
) -> ImportReport<MaintenanceEntry> {
    ingest(RecordKind::MaintenanceEntry, items, parent, |(group, item)| {
        let entry = maintenance_from(item, group)?;
        record.maintenance_entries.push(entry.clone());
        Ok(entry)
    })
}

fn maintenance_from(item: &Value, group: Option<&str>) -> Result<MaintenanceEntry, ValidationError> {
    let names = MaintenanceCategory::ALL.map(MaintenanceCategory::as_str);
    let f = Fields::new(item)?;
    let category = match group {
        Some(key) => key.parse::<MaintenanceCategory>().map_err(|_| {
            ValidationError::format("maintenance", key, &format!("one of: {}", names.join(", ")))
        })?,
        None => f
            .choice::<MaintenanceCategory>("category", &names)?
            .ok_or_else(|| ValidationError::required("category"))?,
    };

    let entry = MaintenanceEntry {
        category,
        date: f.required_date("date")?,
        odometer: f.required_integer("odometer")?,
        cost: f.required_decimal("cost")?,
        notes: f.string("notes").unwrap_or_default(),
    };
    entry.validate()?;
    Ok(entry)
}

// ---------------------------------------------------------------------------
// Other expenses
// ---------------------------------------------------------------------------

/// Import insurance, registration and vehicle payment expenses into
/// `record`.
pub fn import_other_expenses(
    record: &mut VehicleRecord,
    payload: &Value,
) -> AutologResult<ImportReport<OtherExpense>> {
    let items = records_of(payload, "otherExpenses")?;
    let report = ingest_expenses(record, items, None);
    info!(
        "vehicle {}: expense import {} accepted, {} errors",
        record.vehicle.id,
        report.accepted.len(),
        report.errors.len()
    );
    Ok(report)
}

fn ingest_expenses<'a>(
    record: &mut VehicleRecord,
    items: impl IntoIterator<Item = &'a Value>,
    parent: Option<usize>,
) -> ImportReport<OtherExpense> {
    ingest(RecordKind::OtherExpense, items, parent, |item| {
        let expense = expense_from(item)?;
        record.other_expenses.push(expense.clone());
        Ok(expense)
    })
}

fn expense_from(item: &Value) -> Result<OtherExpense, ValidationError> {
    let f = Fields::new(item)?;
    let date = f.required_date("date")?;
    let cost = f.required_decimal("cost")?;
    let notes = f.string("notes").unwrap_or_default();

    let type_name = f.string("expenseType").map(|t| t.to_ascii_lowercase());
    let kind = match type_name.as_deref() {
        Some("insurance") => ExpenseKind::Insurance,
        Some("registration") => ExpenseKind::Registration,
        // "loan" is the legacy name for any vehicle payment
        Some("vehicle_payment") | Some("loan") => {
            ExpenseKind::VehiclePayment(payment_kind(&f, &notes)?)
        }
        Some(other) => {
            return Err(ValidationError::format(
                "expenseType",
                other,
                "one of: insurance, registration, vehicle_payment",
            ))
        }
        None if f.contains("paymentKind") => ExpenseKind::VehiclePayment(payment_kind(&f, &notes)?),
        None => return Err(ValidationError::required("expenseType")),
    };

    let expense = OtherExpense {
        kind,
        date,
        cost,
        notes,
    };
    expense.validate()?;
    Ok(expense)
}

/// Explicit `paymentKind`, else classified once from the note text.
fn payment_kind(f: &Fields<'_>, notes: &str) -> Result<PaymentKind, ValidationError> {
    match f.string("paymentKind") {
        Some(text) => PaymentKind::parse(&text).ok_or_else(|| {
            ValidationError::format(
                "paymentKind",
                &text,
                "one of: down_payment, loan_installment, lease_installment",
            )
        }),
        None => PaymentKind::from_notes(notes).ok_or_else(|| ValidationError::required("paymentKind")),
    }
}
