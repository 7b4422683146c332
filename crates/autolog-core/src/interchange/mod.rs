//! JSON interchange: bulk import with per-record error collection, and the
//! mirror export shape.

pub mod export;
mod fields;
pub mod import;

pub use export::{export_json, export_vehicles, ExportEnvelope, VehicleExport};
pub use fields::DATE_FORMAT;
pub use import::{
    import_fuel_entries, import_maintenance_entries, import_other_expenses, import_vehicles,
    parse_payload, ImportError, ImportReport, RecordKind,
};
