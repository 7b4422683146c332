use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A closed or half-open numeric interval used for field bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: Decimal,
    pub max: Decimal,
    /// When true the lower bound itself is rejected, i.e. `(min, max]`.
    pub min_exclusive: bool,
}

impl ValueRange {
    pub const fn inclusive(min: Decimal, max: Decimal) -> Self {
        Self {
            min,
            max,
            min_exclusive: false,
        }
    }

    pub const fn positive_up_to(max: Decimal) -> Self {
        Self {
            min: Decimal::ZERO,
            max,
            min_exclusive: true,
        }
    }

    pub fn contains(&self, value: Decimal) -> bool {
        let above_min = if self.min_exclusive {
            value > self.min
        } else {
            value >= self.min
        };
        above_min && value <= self.max
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.min_exclusive { '(' } else { '[' };
        write!(f, "{open}{}, {}]", self.min, self.max)
    }
}

/// Record-scoped validation failure. Never fatal: the worst outcome is that
/// one record is not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("{field}: reading {actual} must be greater than the previous reading {reference}")]
    FailsSequence {
        field: String,
        reference: u32,
        actual: u32,
    },

    #[error("{field}: {actual} is not plausible against limit {limit} ({reason})")]
    FailsPlausibility {
        field: String,
        limit: Decimal,
        actual: Decimal,
        reason: String,
    },

    #[error("{field}: {actual} is outside the allowed range {range}")]
    FailsBounds {
        field: String,
        range: ValueRange,
        actual: Decimal,
    },

    #[error("{field}: cannot parse {value:?} as {expected}")]
    FailsFormat {
        field: String,
        value: String,
        expected: String,
    },

    #[error("{field}: missing required field")]
    FailsRequired { field: String },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            Self::FailsSequence { field, .. }
            | Self::FailsPlausibility { field, .. }
            | Self::FailsBounds { field, .. }
            | Self::FailsFormat { field, .. }
            | Self::FailsRequired { field } => field,
        }
    }

    pub(crate) fn required(field: &str) -> Self {
        Self::FailsRequired {
            field: field.into(),
        }
    }

    pub(crate) fn format(field: &str, value: impl ToString, expected: &str) -> Self {
        Self::FailsFormat {
            field: field.into(),
            value: value.to_string(),
            expected: expected.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AutologError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AutologError {
    fn from(e: serde_json::Error) -> Self {
        AutologError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_range_display_and_membership() {
        let gallons = ValueRange::positive_up_to(dec!(100));
        assert_eq!(gallons.to_string(), "(0, 100]");
        assert!(!gallons.contains(Decimal::ZERO));
        assert!(gallons.contains(dec!(100)));
        assert!(!gallons.contains(dec!(100.001)));

        let kwh = ValueRange::inclusive(dec!(0.100), dec!(0.500));
        assert_eq!(kwh.to_string(), "[0.100, 0.500]");
        assert!(kwh.contains(dec!(0.100)));
    }

    #[test]
    fn test_field_accessor() {
        let err = ValidationError::required("make");
        assert_eq!(err.field(), "make");
        assert_eq!(err.to_string(), "make: missing required field");
    }
}
