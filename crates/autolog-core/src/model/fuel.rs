use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Odometer};

/// Measured inputs and the derived efficiency of one fill-up or charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FuelEfficiency {
    Combustion {
        gallons: Decimal,
        mpg: Decimal,
    },
    Electric {
        kwh_per_mile: Decimal,
        cost_per_kwh: Money,
        cost_per_gallon_reference: Money,
        mpge: Decimal,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelEntry {
    pub date: NaiveDate,
    pub odometer: Odometer,
    /// Entered for combustion vehicles, derived for electric ones.
    pub cost: Money,
    pub efficiency: FuelEfficiency,
}

impl FuelEntry {
    pub fn mpg(&self) -> Option<Decimal> {
        match self.efficiency {
            FuelEfficiency::Combustion { mpg, .. } => Some(mpg),
            FuelEfficiency::Electric { .. } => None,
        }
    }

    pub fn mpge(&self) -> Option<Decimal> {
        match self.efficiency {
            FuelEfficiency::Electric { mpge, .. } => Some(mpge),
            FuelEfficiency::Combustion { .. } => None,
        }
    }

    /// MPG or MPGe, whichever the entry carries.
    pub fn efficiency_value(&self) -> Decimal {
        match self.efficiency {
            FuelEfficiency::Combustion { mpg, .. } => mpg,
            FuelEfficiency::Electric { mpge, .. } => mpge,
        }
    }
}
