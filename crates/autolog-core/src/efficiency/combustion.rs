use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{ValidationError, ValueRange};
use crate::model::{check_range, FuelEfficiency, FuelEntry};
use crate::types::{round_money, Money, Odometer};

use super::FuelCandidate;

pub const GALLONS_RANGE: ValueRange = ValueRange::positive_up_to(dec!(100));
pub const COST_RANGE: ValueRange = ValueRange::positive_up_to(dec!(500));
pub const MPG_FLOOR: Decimal = dec!(4.0);
pub const MPG_CEILING: Decimal = dec!(100.0);

/// MPG over `distance` miles, rounded to two places.
pub(crate) fn compute(
    candidate: &FuelCandidate,
    distance: Odometer,
    gallons: Decimal,
    cost: Money,
) -> Result<FuelEntry, ValidationError> {
    check_range("gallons", GALLONS_RANGE, gallons)?;
    check_range("cost", COST_RANGE, cost)?;

    let mpg = Decimal::from(distance) / gallons;
    if mpg < MPG_FLOOR {
        return Err(ValidationError::FailsPlausibility {
            field: "mpg".into(),
            limit: MPG_FLOOR,
            actual: mpg.round_dp(2),
            reason: "below the lowest plausible fuel economy".into(),
        });
    }
    if mpg > MPG_CEILING {
        return Err(ValidationError::FailsPlausibility {
            field: "mpg".into(),
            limit: MPG_CEILING,
            actual: mpg.round_dp(2),
            reason: "above the highest plausible fuel economy".into(),
        });
    }

    Ok(FuelEntry {
        date: candidate.date,
        odometer: candidate.odometer,
        cost: round_money(cost),
        efficiency: FuelEfficiency::Combustion {
            gallons,
            mpg: mpg.round_dp(2),
        },
    })
}
