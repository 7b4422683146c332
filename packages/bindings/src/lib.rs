use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use autolog_core::cost::{ReportField, SortDirection};
use autolog_core::efficiency::FuelCandidate;
use autolog_core::model::{LoanTerms, VehicleRecord};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_date(today: &str) -> NapiResult<NaiveDate> {
    NaiveDate::parse_from_str(today, autolog_core::interchange::DATE_FORMAT).map_err(to_napi_error)
}

fn parse_record(record_json: &str) -> NapiResult<VehicleRecord> {
    serde_json::from_str(record_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Financing
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct LoanInput {
    principal: Decimal,
    annual_rate: Decimal,
    term_months: u32,
    #[serde(default)]
    payments_made: u32,
}

#[napi]
pub fn loan_summary(input_json: String) -> NapiResult<String> {
    let input: LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let terms = LoanTerms {
        principal: Some(input.principal),
        annual_rate: Some(input.annual_rate),
        term_months: Some(input.term_months),
        ..Default::default()
    };
    let output =
        autolog_core::financing::loan_summary(&terms, input.payments_made).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Generate due payments; returns the updated record and what was created.
#[napi]
pub fn backfill_payments(record_json: String, today: String) -> NapiResult<String> {
    let mut record = parse_record(&record_json)?;
    let run = autolog_core::financing::backfill_payments(&mut record, parse_date(&today)?);
    serde_json::to_string(&serde_json::json!({ "record": record, "backfill": run }))
        .map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Fuel entries
// ---------------------------------------------------------------------------

/// Validate a candidate fill-up or charge. `insert` places it among existing
/// entries by date instead of after the latest one.
#[napi]
pub fn validate_fuel_entry(
    record_json: String,
    candidate_json: String,
    insert: Option<bool>,
) -> NapiResult<String> {
    let record = parse_record(&record_json)?;
    let candidate: FuelCandidate = serde_json::from_str(&candidate_json).map_err(to_napi_error)?;
    let entry = if insert.unwrap_or(false) {
        autolog_core::efficiency::validate_fuel_insertion(&record, &candidate)
    } else {
        autolog_core::efficiency::validate_fuel_entry(&record, &candidate)
    }
    .map_err(to_napi_error)?;
    serde_json::to_string(&entry).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Cost reports
// ---------------------------------------------------------------------------

#[napi]
pub fn vehicle_cost_report(record_json: String, today: String) -> NapiResult<String> {
    let record = parse_record(&record_json)?;
    let output = autolog_core::cost::vehicle_cost_report(&record, parse_date(&today)?)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn fleet_report(
    records_json: String,
    today: String,
    sort_field: Option<String>,
    descending: Option<bool>,
) -> NapiResult<String> {
    let records: Vec<VehicleRecord> = serde_json::from_str(&records_json).map_err(to_napi_error)?;
    let sort = match sort_field {
        Some(name) => {
            let field: ReportField = name.parse().map_err(to_napi_error)?;
            let direction = if descending.unwrap_or(false) {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            Some((field, direction))
        }
        None => None,
    };
    let output = autolog_core::cost::fleet_report(&records, parse_date(&today)?, sort);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Interchange
// ---------------------------------------------------------------------------

/// Import a camelCase payload; per-record failures come back in `errors`.
#[napi]
pub fn import_vehicles(payload_json: String, first_id: Option<u32>) -> NapiResult<String> {
    let payload = autolog_core::interchange::parse_payload(&payload_json).map_err(to_napi_error)?;
    let report =
        autolog_core::interchange::import_vehicles(&payload, u64::from(first_id.unwrap_or(1)))
            .map_err(to_napi_error)?;
    serde_json::to_string(&serde_json::json!({
        "accepted": report.accepted,
        "errors": report.errors,
        "messages": report.error_messages(),
    }))
    .map_err(to_napi_error)
}

#[napi]
pub fn export_vehicles(records_json: String) -> NapiResult<String> {
    let records: Vec<VehicleRecord> = serde_json::from_str(&records_json).map_err(to_napi_error)?;
    autolog_core::interchange::export_json(&records).map_err(to_napi_error)
}
