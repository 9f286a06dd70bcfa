//! Float-to-decimal coercion for values persisted to the summary table.
//!
//! The table cannot hold binary floating-point numbers, so every float is
//! rebuilt as an exact decimal from its shortest round-trip string form
//! (`0.1` stays `0.1` instead of `0.1000000000000000055511151231257827`).

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

pub type StorageItem = BTreeMap<String, StorageValue>;

/// A table attribute value. There is deliberately no float variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageValue {
    Null,
    Bool(bool),
    Integer(i64),
    Decimal(Decimal),
    String(String),
    List(Vec<StorageValue>),
    Map(StorageItem),
}

impl StorageValue {
    /// Renders the value as JSON for response bodies. Decimals fall back to
    /// their string form.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(value) => Value::Bool(*value),
            Self::Integer(value) => Value::from(*value),
            Self::Decimal(value) => Value::String(value.to_string()),
            Self::String(value) => Value::String(value.clone()),
            Self::List(values) => Value::Array(values.iter().map(Self::to_json).collect()),
            Self::Map(entries) => Value::Object(item_to_json_map(entries)),
        }
    }

    /// The value as the table hands it back: every number, integral or not,
    /// becomes an exact decimal.
    pub fn as_read_back(&self) -> Self {
        match self {
            Self::Integer(value) => Self::Decimal(Decimal::from(*value)),
            Self::List(values) => Self::List(values.iter().map(Self::as_read_back).collect()),
            Self::Map(entries) => Self::Map(item_as_read_back(entries)),
            other => other.clone(),
        }
    }
}

pub fn item_as_read_back(item: &StorageItem) -> StorageItem {
    item.iter()
        .map(|(key, value)| (key.clone(), value.as_read_back()))
        .collect()
}

pub fn item_to_json(item: &StorageItem) -> Value {
    Value::Object(item_to_json_map(item))
}

fn item_to_json_map(item: &StorageItem) -> Map<String, Value> {
    item.iter()
        .map(|(key, value)| (key.clone(), value.to_json()))
        .collect()
}

/// Converts a float to an exact decimal through its shortest round-trip
/// representation.
///
/// Magnitudes beyond the decimal range saturate at `Decimal::MIN`/`Decimal::MAX`;
/// more than 28 fractional digits round to 28.
pub fn exact_decimal(value: f64) -> Decimal {
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64_retain(value))
        .unwrap_or(if value.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}

/// Walks `value` and replaces every float with an exact decimal, keeping
/// structure and all other scalars as they are.
///
/// Unsigned integers above `i64::MAX` have no `Integer` slot and are carried
/// as integral decimals; the table stores both as the same `N` text.
pub fn coerce_floats(value: &Value) -> StorageValue {
    match value {
        Value::Null => StorageValue::Null,
        Value::Bool(flag) => StorageValue::Bool(*flag),
        Value::Number(number) => {
            if let Some(integer) = number.as_i64() {
                StorageValue::Integer(integer)
            } else if let Some(unsigned) = number.as_u64() {
                StorageValue::Decimal(Decimal::from(unsigned))
            } else {
                StorageValue::Decimal(exact_decimal(number.as_f64().unwrap_or_default()))
            }
        }
        Value::String(text) => StorageValue::String(text.clone()),
        Value::Array(values) => StorageValue::List(values.iter().map(coerce_floats).collect()),
        Value::Object(entries) => StorageValue::Map(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), coerce_floats(value)))
                .collect(),
        ),
    }
}
