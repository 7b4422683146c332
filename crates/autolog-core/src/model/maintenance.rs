use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::{Money, Odometer};

use super::{check_odometer, check_range, ENTRY_COST_RANGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceCategory {
    Oil,
    Repairs,
    Tires,
    Wash,
    Accessories,
}

impl MaintenanceCategory {
    pub const ALL: [MaintenanceCategory; 5] = [
        MaintenanceCategory::Oil,
        MaintenanceCategory::Repairs,
        MaintenanceCategory::Tires,
        MaintenanceCategory::Wash,
        MaintenanceCategory::Accessories,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MaintenanceCategory::Oil => "oil",
            MaintenanceCategory::Repairs => "repairs",
            MaintenanceCategory::Tires => "tires",
            MaintenanceCategory::Wash => "wash",
            MaintenanceCategory::Accessories => "accessories",
        }
    }
}

impl fmt::Display for MaintenanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaintenanceCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        MaintenanceCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == lowered)
            .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceEntry {
    pub category: MaintenanceCategory,
    pub date: NaiveDate,
    pub odometer: Odometer,
    pub cost: Money,
    #[serde(default)]
    pub notes: String,
}

impl MaintenanceEntry {
    /// Maintenance has no sequencing rule against other entries; the
    /// reading is only checked for absolute plausibility.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_odometer("odometer", self.odometer)?;
        check_range("cost", ENTRY_COST_RANGE, self.cost)
    }
}
