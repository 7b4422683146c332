use chrono::NaiveDate;
use clap::Args;
use serde_json::{json, Value};

use autolog_core::financing::backfill_payments;
use autolog_core::interchange::export_json;
use autolog_core::VehicleId;

use crate::input;

/// Arguments for backfilling loan and lease payments
#[derive(Args)]
pub struct PaymentsArgs {
    /// Vehicle records file (interchange shape); stdin when omitted
    #[arg(long)]
    pub input: Option<String>,

    /// Only this vehicle
    #[arg(long)]
    pub vehicle: Option<VehicleId>,

    /// Write the records, generated payments included, back to this file
    #[arg(long)]
    pub save: Option<String>,
}

pub fn run_payments(args: PaymentsArgs, today: NaiveDate) -> Result<Value, Box<dyn std::error::Error>> {
    let records = input::records(args.input.as_deref(), "payment backfill")?;
    let mut records = input::select(records, args.vehicle)?;

    let mut rows = Vec::new();
    for record in records.iter_mut() {
        let run = backfill_payments(record, today);
        tracing::debug!(
            vehicle = run.vehicle_id,
            created = run.created.len(),
            total = run.total_payments,
            "payment backfill"
        );
        for payment in &run.created {
            rows.push(json!({
                "vehicle_id": run.vehicle_id,
                "date": payment.date,
                "payment_kind": payment.payment_kind(),
                "cost": payment.cost,
                "notes": payment.notes,
            }));
        }
    }

    if let Some(ref path) = args.save {
        input::file::write_text(path, &export_json(&records)?)?;
    }

    Ok(json!({
        "result": {
            "today": today,
            "created": rows.len(),
            "rows": rows,
        }
    }))
}
