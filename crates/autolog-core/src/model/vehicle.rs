use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValueRange};
use crate::types::{Money, Odometer, PercentRate, VehicleId};

use super::check_odometer;

pub const YEAR_RANGE: ValueRange = ValueRange::inclusive(dec!(1886), dec!(2100));

/// Fuel type as recorded on the vehicle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    #[default]
    Gasoline,
    Diesel,
    Hybrid,
    Electric,
}

/// The efficiency model a fuel type is measured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelKind {
    Combustion,
    Electric,
}

impl FuelType {
    pub const ALL: [FuelType; 4] = [
        FuelType::Gasoline,
        FuelType::Diesel,
        FuelType::Hybrid,
        FuelType::Electric,
    ];

    pub fn kind(self) -> FuelKind {
        match self {
            FuelType::Electric => FuelKind::Electric,
            FuelType::Gasoline | FuelType::Diesel | FuelType::Hybrid => FuelKind::Combustion,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FuelType::Gasoline => "gasoline",
            FuelType::Diesel => "diesel",
            FuelType::Hybrid => "hybrid",
            FuelType::Electric => "electric",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FuelType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        FuelType::ALL
            .into_iter()
            .find(|t| t.as_str() == lowered)
            .ok_or(())
    }
}

/// Loan parameters. Every field except the flag may be missing while the
/// owner is still filling the vehicle in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanTerms {
    pub start_date: Option<NaiveDate>,
    pub principal: Option<Money>,
    /// Annual rate in percent (5.75 = 5.75%)
    pub annual_rate: Option<PercentRate>,
    pub term_months: Option<u32>,
    /// Day of month the installment is due (1-31)
    pub payment_day: Option<u32>,
    pub auto_payment: bool,
    pub down_payment: Option<Money>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaseTerms {
    pub start_date: Option<NaiveDate>,
    pub monthly_payment: Option<Money>,
    pub term_months: Option<u32>,
    pub payment_day: Option<u32>,
    pub auto_payment: bool,
    pub down_payment: Option<Money>,
}

/// How the vehicle is financed. The variant selects which parameter set is
/// active, so loan and lease terms can never both apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Financing {
    #[default]
    None,
    Loan(LoanTerms),
    Lease(LeaseTerms),
}

impl Financing {
    pub fn loan(&self) -> Option<&LoanTerms> {
        match self {
            Financing::Loan(terms) => Some(terms),
            _ => None,
        }
    }

    pub fn lease(&self) -> Option<&LeaseTerms> {
        match self {
            Financing::Lease(terms) => Some(terms),
            _ => None,
        }
    }

    pub fn is_lease(&self) -> bool {
        matches!(self, Financing::Lease(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub year: u16,
    pub make: String,
    pub model: String,
    pub fuel_type: FuelType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vin_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_plate_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealer_name: Option<String>,
    pub purchased_date: Option<NaiveDate>,
    pub purchased_price: Option<Money>,
    pub purchased_odometer: Option<Odometer>,
    pub sold_date: Option<NaiveDate>,
    pub sold_price: Option<Money>,
    pub sold_odometer: Option<Odometer>,
    /// Estimated value, only meaningful while the vehicle is owned
    pub current_value: Option<Money>,
    pub current_value_date: Option<NaiveDate>,
    pub financing: Financing,
}

impl Vehicle {
    pub fn new(id: VehicleId, year: u16, make: &str, model: &str, fuel_type: FuelType) -> Self {
        Self {
            id,
            year,
            make: make.into(),
            model: model.into(),
            fuel_type,
            ..Default::default()
        }
    }

    pub fn is_sold(&self) -> bool {
        self.sold_date.is_some()
    }

    pub fn fuel_kind(&self) -> FuelKind {
        self.fuel_type.kind()
    }

    /// Purchase date, or the lease start for leased vehicles with no
    /// recorded purchase.
    pub fn ownership_start(&self) -> Option<NaiveDate> {
        self.purchased_date
            .or_else(|| self.financing.lease().and_then(|l| l.start_date))
    }

    pub fn display_name(&self) -> String {
        format!("{} {} {}", self.year, self.make, self.model)
    }

    /// Field-level checks shared by interactive entry and bulk import.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.make.trim().is_empty() {
            return Err(ValidationError::required("make"));
        }
        if self.model.trim().is_empty() {
            return Err(ValidationError::required("model"));
        }
        let year = Decimal::from(self.year);
        if !YEAR_RANGE.contains(year) {
            return Err(ValidationError::FailsBounds {
                field: "year".into(),
                range: YEAR_RANGE,
                actual: year,
            });
        }

        let texts = [
            ("color", &self.color, 30),
            ("vin_number", &self.vin_number, 17),
            ("license_plate_number", &self.license_plate_number, 15),
            ("registration_number", &self.registration_number, 50),
            ("state", &self.state, 2),
            ("dealer_name", &self.dealer_name, 100),
        ];
        for (field, value, max) in texts {
            let Some(value) = value else { continue };
            if value.chars().count() > max {
                return Err(ValidationError::format(
                    field,
                    value,
                    &format!("text of at most {max} characters"),
                ));
            }
        }

        for (field, reading) in [
            ("purchased_odometer", self.purchased_odometer),
            ("sold_odometer", self.sold_odometer),
        ] {
            if let Some(reading) = reading {
                check_odometer(field, reading)?;
            }
        }

        if let (Some(bought), Some(sold)) = (self.purchased_date, self.sold_date) {
            if sold < bought {
                return Err(ValidationError::format(
                    "sold_date",
                    sold,
                    "a date on or after the purchase date",
                ));
            }
        }

        if let (Some(bought), Some(sold)) = (self.purchased_odometer, self.sold_odometer) {
            if sold < bought {
                return Err(ValidationError::FailsSequence {
                    field: "sold_odometer".into(),
                    reference: bought,
                    actual: sold,
                });
            }
        }

        match &self.financing {
            Financing::None => {}
            Financing::Loan(loan) => validate_payment_day(loan.payment_day)?,
            Financing::Lease(lease) => validate_payment_day(lease.payment_day)?,
        }

        Ok(())
    }
}

fn validate_payment_day(day: Option<u32>) -> Result<(), ValidationError> {
    match day {
        Some(d) if !(1..=31).contains(&d) => Err(ValidationError::FailsBounds {
            field: "payment_day".into(),
            range: ValueRange::inclusive(Decimal::ONE, Decimal::from(31)),
            actual: Decimal::from(d),
        }),
        _ => Ok(()),
    }
}
