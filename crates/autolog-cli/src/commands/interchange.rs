use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use autolog_core::interchange::{
    export_json, export_vehicles, import_fuel_entries, import_maintenance_entries,
    import_other_expenses, import_vehicles, ImportError,
};
use autolog_core::VehicleId;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ImportKind {
    Vehicles,
    Fuel,
    Maintenance,
    Expenses,
}

/// Arguments for validating an import payload
#[derive(Args)]
pub struct ImportArgs {
    /// Payload to import; stdin when omitted
    #[arg(long)]
    pub input: Option<String>,

    /// What the payload holds
    #[arg(long, value_enum, default_value = "vehicles")]
    pub kind: ImportKind,

    /// Existing vehicle records, required for child imports
    #[arg(long)]
    pub records: Option<String>,

    /// Vehicle the child records belong to
    #[arg(long)]
    pub vehicle: Option<VehicleId>,

    /// Write the accepted records, in export shape, to this file
    #[arg(long)]
    pub save: Option<String>,
}

/// Arguments for normalising records to the export shape
#[derive(Args)]
pub struct ExportArgs {
    /// Vehicle records in any importable shape; stdin when omitted
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_import(args: ImportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payload = input::payload(args.input.as_deref(), "import")?;

    let (records, accepted, errors) = match args.kind {
        ImportKind::Vehicles => {
            let report = import_vehicles(&payload, 1)?;
            let accepted = report.accepted.len();
            (report.accepted, accepted, report.errors)
        }
        kind => {
            let path = args
                .records
                .as_deref()
                .ok_or("--records <file.json> is required for child imports")?;
            let vehicle = args.vehicle.ok_or("--vehicle is required for child imports")?;
            let mut records = input::records(Some(path), "import")?;
            let record = records
                .iter_mut()
                .find(|r| r.vehicle.id == vehicle)
                .ok_or_else(|| format!("no vehicle {vehicle} in {path}"))?;

            let (accepted, errors) = match kind {
                ImportKind::Fuel => {
                    let r = import_fuel_entries(record, &payload)?;
                    (r.accepted.len(), r.errors)
                }
                ImportKind::Maintenance => {
                    let r = import_maintenance_entries(record, &payload)?;
                    (r.accepted.len(), r.errors)
                }
                _ => {
                    let r = import_other_expenses(record, &payload)?;
                    (r.accepted.len(), r.errors)
                }
            };
            (records, accepted, errors)
        }
    };

    for error in &errors {
        tracing::info!("{error}");
    }
    if let Some(ref path) = args.save {
        input::file::write_text(path, &export_json(&records)?)?;
    }

    Ok(json!({
        "result": {
            "accepted": accepted,
            "rejected": errors.len(),
            "errors": errors.iter().map(ImportError::to_string).collect::<Vec<_>>(),
        }
    }))
}

pub fn run_export(args: ExportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let records = input::records(args.input.as_deref(), "export")?;
    Ok(serde_json::to_value(export_vehicles(&records))?)
}
