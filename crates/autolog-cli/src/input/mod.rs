pub mod file;
pub mod stdin;

use serde_json::Value;

use autolog_core::interchange::import_vehicles;
use autolog_core::model::VehicleRecord;
use autolog_core::VehicleId;

/// JSON from `--input`, else from piped stdin.
pub fn payload(path: Option<&str>, what: &str) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_json_value(path);
    }
    if let Some(value) = stdin::read_stdin()? {
        return Ok(value);
    }
    Err(format!("--input <file.json> or stdin required for {what}").into())
}

/// Vehicle records in the interchange shape, numbered from 1 in file order.
/// Records that fail validation are logged and left out.
pub fn records(path: Option<&str>, what: &str) -> Result<Vec<VehicleRecord>, Box<dyn std::error::Error>> {
    let value = payload(path, what)?;
    let report = import_vehicles(&value, 1)?;
    for error in &report.errors {
        tracing::warn!("skipping invalid record: {error}");
    }
    Ok(report.accepted)
}

/// Narrow `records` to one vehicle when `--vehicle` is given.
pub fn select(
    records: Vec<VehicleRecord>,
    vehicle: Option<VehicleId>,
) -> Result<Vec<VehicleRecord>, Box<dyn std::error::Error>> {
    let Some(id) = vehicle else {
        return Ok(records);
    };
    let selected: Vec<VehicleRecord> = records.into_iter().filter(|r| r.vehicle.id == id).collect();
    if selected.is_empty() {
        return Err(format!("no vehicle {id} in input").into());
    }
    Ok(selected)
}
