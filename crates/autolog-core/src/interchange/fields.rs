//! Typed access to camelCase fields of an external JSON object.
//!
//! Missing keys, `null` and empty strings all count as absent. Numbers may
//! arrive as JSON numbers or as strings; decimals are parsed from their
//! textual form so no float rounding creeps in.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::error::ValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(value: &'a Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Ok(Self { map }),
            other => Err(ValidationError::format("record", other, "a JSON object")),
        }
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    fn raw(&self, key: &str) -> Option<&'a Value> {
        match self.map.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(v) => Some(v),
        }
    }

    pub(crate) fn string(&self, key: &str) -> Option<String> {
        self.raw(key).map(|v| match v {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        })
    }

    pub(crate) fn required_string(&self, key: &str) -> Result<String, ValidationError> {
        self.string(key).ok_or_else(|| ValidationError::required(key))
    }

    pub(crate) fn date(&self, key: &str) -> Result<Option<NaiveDate>, ValidationError> {
        let Some(v) = self.raw(key) else {
            return Ok(None);
        };
        let text = v
            .as_str()
            .ok_or_else(|| ValidationError::format(key, v, "a date (YYYY-MM-DD)"))?;
        NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
            .map(Some)
            .map_err(|_| ValidationError::format(key, text, "a date (YYYY-MM-DD)"))
    }

    pub(crate) fn required_date(&self, key: &str) -> Result<NaiveDate, ValidationError> {
        self.date(key)?.ok_or_else(|| ValidationError::required(key))
    }

    pub(crate) fn decimal(&self, key: &str) -> Result<Option<Decimal>, ValidationError> {
        let Some(v) = self.raw(key) else {
            return Ok(None);
        };
        let text = match v {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.trim().to_string(),
            other => return Err(ValidationError::format(key, other, "a decimal number")),
        };
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map(Some)
            .map_err(|_| ValidationError::format(key, text, "a decimal number"))
    }

    pub(crate) fn required_decimal(&self, key: &str) -> Result<Decimal, ValidationError> {
        self.decimal(key)?.ok_or_else(|| ValidationError::required(key))
    }

    /// Non-negative whole number that fits `T`.
    pub(crate) fn integer<T: TryFrom<u64>>(&self, key: &str) -> Result<Option<T>, ValidationError> {
        let Some(v) = self.raw(key) else {
            return Ok(None);
        };
        let parsed = match v {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        parsed
            .and_then(|n| T::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| ValidationError::format(key, v, "a whole number"))
    }

    pub(crate) fn required_integer<T: TryFrom<u64>>(&self, key: &str) -> Result<T, ValidationError> {
        self.integer(key)?.ok_or_else(|| ValidationError::required(key))
    }

    pub(crate) fn boolean(&self, key: &str) -> Result<bool, ValidationError> {
        match self.raw(key) {
            None => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(true),
                "false" | "no" | "0" => Ok(false),
                _ => Err(ValidationError::format(key, s, "true or false")),
            },
            Some(other) => Err(ValidationError::format(key, other, "true or false")),
        }
    }

    /// Parse an enumerated value, listing the accepted names on failure.
    pub(crate) fn choice<T: FromStr>(
        &self,
        key: &str,
        accepted: &[&str],
    ) -> Result<Option<T>, ValidationError> {
        let Some(text) = self.string(key) else {
            return Ok(None);
        };
        text.parse::<T>()
            .map(Some)
            .map_err(|_| ValidationError::format(key, &text, &format!("one of: {}", accepted.join(", "))))
    }

    pub(crate) fn object(&self, key: &str) -> Option<&'a Value> {
        self.raw(key).filter(|v| v.is_object())
    }

    pub(crate) fn array(&self, key: &str) -> Option<&'a Vec<Value>> {
        self.raw(key).and_then(Value::as_array)
    }
}
