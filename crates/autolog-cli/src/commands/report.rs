use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use autolog_core::cost::{fleet_report, ReportField, SortDirection};
use autolog_core::financing::backfill_payments;
use autolog_core::VehicleId;

use crate::input;

/// Arguments for the ownership cost report
#[derive(Args)]
pub struct ReportArgs {
    /// Vehicle records file (interchange shape); stdin when omitted
    #[arg(long)]
    pub input: Option<String>,

    /// Only this vehicle
    #[arg(long)]
    pub vehicle: Option<VehicleId>,

    /// Column to sort by (e.g. total-cost, cost-per-mile)
    #[arg(long)]
    pub sort: Option<ReportField>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Report on the records as given, without generating due payments first
    #[arg(long)]
    pub no_backfill: bool,
}

pub fn run_report(args: ReportArgs, today: NaiveDate) -> Result<Value, Box<dyn std::error::Error>> {
    let records = input::records(args.input.as_deref(), "cost report")?;
    let mut records = input::select(records, args.vehicle)?;

    if !args.no_backfill {
        for record in records.iter_mut() {
            backfill_payments(record, today);
        }
    }

    let direction = if args.desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    let result = fleet_report(&records, today, args.sort.map(|field| (field, direction)));
    Ok(serde_json::to_value(result)?)
}
