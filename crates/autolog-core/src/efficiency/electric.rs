use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{ValidationError, ValueRange};
use crate::model::{check_range, FuelEfficiency, FuelEntry};
use crate::types::{round_money, Money, Odometer};

use super::FuelCandidate;

pub const KWH_PER_MILE_RANGE: ValueRange = ValueRange::inclusive(dec!(0.100), dec!(0.500));
pub const COST_PER_KWH_RANGE: ValueRange = ValueRange::inclusive(dec!(0.050), dec!(0.500));
pub const GAS_PRICE_RANGE: ValueRange = ValueRange::inclusive(dec!(0.50), dec!(20.00));

/// MPGe is energy-cost parity with gasoline:
/// `gas_price / (kwh_per_mile × cost_per_kwh)`, one decimal place. The
/// entry's cost is the energy bought for `distance` miles.
pub(crate) fn compute(
    candidate: &FuelCandidate,
    distance: Odometer,
    kwh_per_mile: Decimal,
    cost_per_kwh: Money,
    cost_per_gallon_reference: Money,
) -> Result<FuelEntry, ValidationError> {
    check_range("kwh_per_mile", KWH_PER_MILE_RANGE, kwh_per_mile)?;
    check_range("cost_per_kwh", COST_PER_KWH_RANGE, cost_per_kwh)?;
    check_range(
        "cost_per_gallon_reference",
        GAS_PRICE_RANGE,
        cost_per_gallon_reference,
    )?;

    let cost_per_mile = kwh_per_mile * cost_per_kwh;
    let mpge = (cost_per_gallon_reference / cost_per_mile).round_dp(1);
    let cost = round_money(Decimal::from(distance) * cost_per_mile);

    Ok(FuelEntry {
        date: candidate.date,
        odometer: candidate.odometer,
        cost,
        efficiency: FuelEfficiency::Electric {
            kwh_per_mile,
            cost_per_kwh,
            cost_per_gallon_reference,
            mpge,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::efficiency::FuelReading;
    use chrono::NaiveDate;

    fn candidate() -> FuelCandidate {
        FuelCandidate {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            odometer: 5_300,
            reading: FuelReading::Electric {
                kwh_per_mile: dec!(0.300),
                cost_per_kwh: dec!(0.125),
                cost_per_gallon_reference: dec!(4.50),
            },
        }
    }

    #[test]
    fn test_each_bound_reported_on_its_own_field() {
        let c = candidate();
        let err = compute(&c, 300, dec!(0.6), dec!(0.125), dec!(4.5)).unwrap_err();
        assert_eq!(err.field(), "kwh_per_mile");
        let err = compute(&c, 300, dec!(0.3), dec!(0.01), dec!(4.5)).unwrap_err();
        assert_eq!(err.field(), "cost_per_kwh");
        let err = compute(&c, 300, dec!(0.3), dec!(0.125), dec!(25)).unwrap_err();
        assert_eq!(err.field(), "cost_per_gallon_reference");
    }

    #[test]
    fn test_mpge_rounds_to_one_place() {
        // 3.99 / (0.25 * 0.13) = 122.769...
        let entry = compute(&candidate(), 100, dec!(0.25), dec!(0.13), dec!(3.99)).unwrap();
        assert_eq!(entry.mpge(), Some(dec!(122.8)));
        assert_eq!(entry.cost, dec!(3.25));
    }
}
