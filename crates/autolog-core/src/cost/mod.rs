//! Ownership cost roll-ups for one vehicle or a fleet.
//!
//! Vehicle cost is depreciation plus loan interest paid to date plus lease
//! payments. Operating costs (fuel, maintenance, insurance, registration)
//! are added on top for the total.

pub mod fleet;
pub mod vehicle;

pub use fleet::{
    field_extremes, fleet_report, highlights, sort_rows, FieldExtremes, FleetReport, ReportField,
    SortDirection,
};
pub use vehicle::{vehicle_cost_report, EfficiencyUnit, VehicleCostReport};
