use std::time::Instant;

use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AutologError;
use crate::model::{ExpenseKind, Financing, FuelKind, FuelType, PaymentKind, VehicleRecord};
use crate::types::*;
use crate::AutologResult;

/// Which efficiency figure `average_efficiency` is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EfficiencyUnit {
    Mpg,
    Mpge,
}

/// One row of the ownership cost report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleCostReport {
    pub vehicle_id: VehicleId,
    pub name: String,
    pub fuel_type: FuelType,
    pub is_sold: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Never below one
    pub days_owned: i64,
    pub miles_driven: Odometer,
    /// True when no purchase reading exists and miles are the latest reading
    pub miles_approximate: bool,
    /// Purchase price less sale price or current estimate; `None` when
    /// neither is known
    pub depreciation: Option<Money>,
    pub interest_paid: Money,
    pub lease_payments: Money,
    pub vehicle_cost: Money,
    pub fuel_cost: Money,
    pub maintenance_cost: Money,
    pub insurance_cost: Money,
    pub registration_cost: Money,
    pub total_cost: Money,
    pub total_cost_per_day: Money,
    pub vehicle_cost_per_day: Money,
    pub cost_per_mile: Money,
    pub average_efficiency: Decimal,
    pub efficiency_unit: EfficiencyUnit,
}

/// Ownership cost for one vehicle, wrapped with methodology and warnings.
pub fn vehicle_cost_report(
    record: &VehicleRecord,
    today: NaiveDate,
) -> AutologResult<ComputationOutput<VehicleCostReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let report = compute_vehicle_costs(record, today, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Ownership cost: depreciation + loan interest to date + lease payments + operating costs",
        &serde_json::json!({
            "today": today.to_string(),
            "vehicle_id": record.vehicle.id,
        }),
        warnings,
        elapsed,
        report,
    ))
}

pub(crate) fn compute_vehicle_costs(
    record: &VehicleRecord,
    today: NaiveDate,
    warnings: &mut Vec<String>,
) -> AutologResult<VehicleCostReport> {
    let vehicle = &record.vehicle;

    let start_date = vehicle.ownership_start().ok_or_else(|| {
        AutologError::InsufficientData(format!(
            "vehicle {} has neither a purchase date nor a lease start",
            vehicle.id
        ))
    })?;
    let end_date = vehicle.sold_date.unwrap_or(today);
    let days_owned = (end_date - start_date).num_days().max(1);

    let (miles_driven, miles_approximate) = miles_driven(record);
    if miles_approximate {
        warn!(
            "vehicle {}: no purchase odometer, miles driven approximated by latest reading",
            vehicle.id
        );
        warnings.push(format!(
            "{}: no purchase odometer; miles driven is the latest reading, not a measured distance",
            vehicle.display_name()
        ));
    }

    let depreciation = depreciation(record);
    let interest_paid = match &vehicle.financing {
        Financing::Loan(loan) => loan
            .interest_paid_to_date(record.loan_installments_made())
            .unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    };
    let lease_payments = lease_payments(record);
    let vehicle_cost = depreciation.unwrap_or(Decimal::ZERO) + interest_paid + lease_payments;

    let fuel_cost: Money = record.fuel_entries.iter().map(|e| e.cost).sum();
    let maintenance_cost: Money = record.maintenance_entries.iter().map(|e| e.cost).sum();
    let insurance_cost = expense_total(record, ExpenseKind::Insurance);
    let registration_cost = expense_total(record, ExpenseKind::Registration);

    let total_cost = vehicle_cost + fuel_cost + maintenance_cost + insurance_cost + registration_cost;
    let days = Decimal::from(days_owned);

    let (average_efficiency, efficiency_unit) = average_efficiency(record);

    Ok(VehicleCostReport {
        vehicle_id: vehicle.id,
        name: vehicle.display_name(),
        fuel_type: vehicle.fuel_type,
        is_sold: vehicle.is_sold(),
        start_date,
        end_date,
        days_owned,
        miles_driven,
        miles_approximate,
        depreciation: depreciation.map(round_money),
        interest_paid: round_money(interest_paid),
        lease_payments: round_money(lease_payments),
        vehicle_cost: round_money(vehicle_cost),
        fuel_cost: round_money(fuel_cost),
        maintenance_cost: round_money(maintenance_cost),
        insurance_cost: round_money(insurance_cost),
        registration_cost: round_money(registration_cost),
        total_cost: round_money(total_cost),
        total_cost_per_day: round_money(per_unit(total_cost, days)),
        vehicle_cost_per_day: round_money(per_unit(vehicle_cost, days)),
        cost_per_mile: round_money(per_unit(total_cost, Decimal::from(miles_driven))),
        average_efficiency,
        efficiency_unit,
    })
}

fn per_unit(amount: Money, units: Decimal) -> Money {
    if units.is_zero() {
        Decimal::ZERO
    } else {
        amount / units
    }
}

/// Terminal reading less the purchase reading. Without a purchase reading
/// the latest reading stands in, flagged as approximate.
fn miles_driven(record: &VehicleRecord) -> (Odometer, bool) {
    let vehicle = &record.vehicle;
    let observed = record.max_observed_odometer();
    let terminal = if vehicle.is_sold() {
        vehicle.sold_odometer.or(observed)
    } else {
        observed
    };

    match vehicle.purchased_odometer {
        Some(baseline) => (terminal.unwrap_or(baseline).saturating_sub(baseline), false),
        None => (terminal.unwrap_or(0), true),
    }
}

fn depreciation(record: &VehicleRecord) -> Option<Money> {
    let vehicle = &record.vehicle;
    let bought = vehicle.purchased_price?;
    if vehicle.is_sold() {
        vehicle.sold_price.map(|sold| bought - sold)
    } else {
        vehicle.current_value.map(|value| bought - value)
    }
}

/// Lease installments, plus down payments when the vehicle is leased. Loan
/// installments are left out because the purchase price already carries
/// that principal.
fn lease_payments(record: &VehicleRecord) -> Money {
    let installments = record.payments_total(PaymentKind::LeaseInstallment);
    if record.vehicle.financing.is_lease() {
        installments + record.payments_total(PaymentKind::DownPayment)
    } else {
        installments
    }
}

fn expense_total(record: &VehicleRecord, kind: ExpenseKind) -> Money {
    record
        .other_expenses
        .iter()
        .filter(|e| e.kind == kind)
        .map(|e| e.cost)
        .sum()
}

fn average_efficiency(record: &VehicleRecord) -> (Decimal, EfficiencyUnit) {
    let (values, unit): (Vec<Decimal>, EfficiencyUnit) = match record.vehicle.fuel_kind() {
        FuelKind::Combustion => (
            record.fuel_entries.iter().filter_map(|e| e.mpg()).collect(),
            EfficiencyUnit::Mpg,
        ),
        FuelKind::Electric => (
            record.fuel_entries.iter().filter_map(|e| e.mpge()).collect(),
            EfficiencyUnit::Mpge,
        ),
    };

    if values.is_empty() {
        return (Decimal::ZERO, unit);
    }
    let sum: Decimal = values.iter().sum();
    ((sum / Decimal::from(values.len())).round_dp(2), unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OtherExpense, Vehicle};
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_same_day_purchase_counts_one_day() {
        let mut v = Vehicle::new(1, 2024, "Toyota", "Prius", FuelType::Hybrid);
        v.purchased_date = Some(d(2024, 5, 1));
        let report = compute_vehicle_costs(&VehicleRecord::new(v), d(2024, 5, 1), &mut Vec::new())
            .unwrap();
        assert_eq!(report.days_owned, 1);
        assert_eq!(report.miles_driven, 0);
        assert_eq!(report.cost_per_mile, Decimal::ZERO);
    }

    #[test]
    fn test_missing_start_is_insufficient_data() {
        let v = Vehicle::new(1, 2024, "Toyota", "Prius", FuelType::Hybrid);
        assert!(compute_vehicle_costs(&VehicleRecord::new(v), d(2024, 5, 1), &mut Vec::new()).is_err());
    }

    #[test]
    fn test_leased_down_payment_counts_toward_vehicle_cost() {
        let mut v = Vehicle::new(2, 2023, "BMW", "i4", FuelType::Electric);
        v.financing = Financing::Lease(Default::default());
        v.purchased_date = Some(d(2023, 1, 1));
        let mut record = VehicleRecord::new(v);
        for (kind, cost) in [
            (PaymentKind::DownPayment, dec!(2000)),
            (PaymentKind::LeaseInstallment, dec!(450)),
        ] {
            record.other_expenses.push(OtherExpense {
                kind: ExpenseKind::VehiclePayment(kind),
                date: d(2023, 1, 1),
                cost,
                notes: String::new(),
            });
        }
        let report = compute_vehicle_costs(&record, d(2023, 2, 1), &mut Vec::new()).unwrap();
        assert_eq!(report.depreciation, None);
        assert_eq!(report.lease_payments, dec!(2450));
        assert_eq!(report.vehicle_cost, dec!(2450));
        assert_eq!(report.efficiency_unit, EfficiencyUnit::Mpge);
    }
}
