//! Export in the same camelCase shape bulk import reads.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{
    Financing, FuelEfficiency, FuelEntry, LeaseTerms, LoanTerms, MaintenanceEntry, OtherExpense,
    VehicleRecord,
};
use crate::types::{Money, Odometer};
use crate::AutologResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEnvelope {
    pub vehicles: Vec<VehicleExport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleExport {
    pub year: u16,
    pub make: String,
    pub model: String,
    pub fuel_type: String,
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
    pub current_value: Option<Money>,
    pub current_value_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_info: Option<LoanExport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lease_info: Option<LeaseExport>,
    pub fuel_entries: Vec<FuelEntryExport>,
    pub maintenance_entries: Vec<MaintenanceExport>,
    pub other_expenses: Vec<ExpenseExport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanExport {
    pub start_date: Option<NaiveDate>,
    pub amount: Option<Money>,
    pub interest_rate: Option<Decimal>,
    pub term_months: Option<u32>,
    pub payment_day: Option<u32>,
    pub auto_payment: bool,
    pub down_payment: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseExport {
    pub start_date: Option<NaiveDate>,
    pub monthly_payment: Option<Money>,
    pub term_months: Option<u32>,
    pub payment_day: Option<u32>,
    pub auto_payment: bool,
    pub down_payment: Option<Money>,
}

/// Combustion entries fill `gallons`/`mpg`, electric ones the energy fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelEntryExport {
    pub date: NaiveDate,
    pub odometer: Odometer,
    pub cost: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallons: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mpg: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kwh_per_mile: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_per_kwh: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_per_gallon_reference: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mpge: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceExport {
    pub category: String,
    pub date: NaiveDate,
    pub odometer: Odometer,
    pub cost: Money,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseExport {
    pub expense_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_kind: Option<String>,
    pub date: NaiveDate,
    pub cost: Money,
    pub notes: String,
}

impl From<&LoanTerms> for LoanExport {
    fn from(loan: &LoanTerms) -> Self {
        Self {
            start_date: loan.start_date,
            amount: loan.principal,
            interest_rate: loan.annual_rate,
            term_months: loan.term_months,
            payment_day: loan.payment_day,
            auto_payment: loan.auto_payment,
            down_payment: loan.down_payment,
        }
    }
}

impl From<&LeaseTerms> for LeaseExport {
    fn from(lease: &LeaseTerms) -> Self {
        Self {
            start_date: lease.start_date,
            monthly_payment: lease.monthly_payment,
            term_months: lease.term_months,
            payment_day: lease.payment_day,
            auto_payment: lease.auto_payment,
            down_payment: lease.down_payment,
        }
    }
}

impl From<&FuelEntry> for FuelEntryExport {
    fn from(entry: &FuelEntry) -> Self {
        let mut out = Self {
            date: entry.date,
            odometer: entry.odometer,
            cost: entry.cost,
            gallons: None,
            mpg: None,
            kwh_per_mile: None,
            cost_per_kwh: None,
            cost_per_gallon_reference: None,
            mpge: None,
        };
        match entry.efficiency {
            FuelEfficiency::Combustion { gallons, mpg } => {
                out.gallons = Some(gallons);
                out.mpg = Some(mpg);
            }
            FuelEfficiency::Electric {
                kwh_per_mile,
                cost_per_kwh,
                cost_per_gallon_reference,
                mpge,
            } => {
                out.kwh_per_mile = Some(kwh_per_mile);
                out.cost_per_kwh = Some(cost_per_kwh);
                out.cost_per_gallon_reference = Some(cost_per_gallon_reference);
                out.mpge = Some(mpge);
            }
        }
        out
    }
}

impl From<&MaintenanceEntry> for MaintenanceExport {
    fn from(entry: &MaintenanceEntry) -> Self {
        Self {
            category: entry.category.as_str().into(),
            date: entry.date,
            odometer: entry.odometer,
            cost: entry.cost,
            notes: entry.notes.clone(),
        }
    }
}

impl From<&OtherExpense> for ExpenseExport {
    fn from(expense: &OtherExpense) -> Self {
        Self {
            expense_type: expense.kind.type_name().into(),
            payment_kind: expense.payment_kind().map(|k| k.as_str().into()),
            date: expense.date,
            cost: expense.cost,
            notes: expense.notes.clone(),
        }
    }
}

impl From<&VehicleRecord> for VehicleExport {
    fn from(record: &VehicleRecord) -> Self {
        let v = &record.vehicle;
        Self {
            year: v.year,
            make: v.make.clone(),
            model: v.model.clone(),
            fuel_type: v.fuel_type.as_str().into(),
            color: v.color.clone(),
            vin_number: v.vin_number.clone(),
            license_plate_number: v.license_plate_number.clone(),
            registration_number: v.registration_number.clone(),
            state: v.state.clone(),
            dealer_name: v.dealer_name.clone(),
            purchased_date: v.purchased_date,
            purchased_price: v.purchased_price,
            purchased_odometer: v.purchased_odometer,
            sold_date: v.sold_date,
            sold_price: v.sold_price,
            sold_odometer: v.sold_odometer,
            current_value: v.current_value,
            current_value_date: v.current_value_date,
            loan_info: match &v.financing {
                Financing::Loan(loan) => Some(loan.into()),
                _ => None,
            },
            lease_info: match &v.financing {
                Financing::Lease(lease) => Some(lease.into()),
                _ => None,
            },
            fuel_entries: record.fuel_entries.iter().map(Into::into).collect(),
            maintenance_entries: record.maintenance_entries.iter().map(Into::into).collect(),
            other_expenses: record.other_expenses.iter().map(Into::into).collect(),
        }
    }
}

/// The `{"vehicles": [...]}` envelope for a set of records.
pub fn export_vehicles(records: &[VehicleRecord]) -> ExportEnvelope {
    ExportEnvelope {
        vehicles: records.iter().map(VehicleExport::from).collect(),
    }
}

pub fn export_json(records: &[VehicleRecord]) -> AutologResult<String> {
    Ok(serde_json::to_string_pretty(&export_vehicles(records))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExpenseKind, FuelType, PaymentKind, Vehicle};
    use rust_decimal_macros::dec;

    #[test]
    fn test_decimals_export_as_strings() {
        let mut v = Vehicle::new(1, 2021, "Tesla", "Model 3", FuelType::Electric);
        v.purchased_price = Some(dec!(41990.00));
        v.purchased_date = NaiveDate::from_ymd_opt(2021, 3, 9);
        let mut record = VehicleRecord::new(v);
        record.other_expenses.push(OtherExpense {
            kind: ExpenseKind::VehiclePayment(PaymentKind::DownPayment),
            date: NaiveDate::from_ymd_opt(2021, 3, 9).unwrap(),
            cost: dec!(5000),
            notes: String::new(),
        });

        let json = serde_json::to_value(export_vehicles(&[record])).unwrap();
        let vehicle = &json["vehicles"][0];
        assert_eq!(vehicle["purchasedPrice"], "41990.00");
        assert_eq!(vehicle["purchasedDate"], "2021-03-09");
        assert_eq!(vehicle["fuelType"], "electric");
        assert_eq!(vehicle["otherExpenses"][0]["expenseType"], "vehicle_payment");
        assert_eq!(vehicle["otherExpenses"][0]["paymentKind"], "down_payment");
        assert!(vehicle.get("loanInfo").is_none());
    }
}
