//! Lenient parsing for filter fields.
//!
//! A bound that cannot be read as a number is treated as absent, never as an error.
//! A list that is null or of the wrong shape is treated as empty.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeSet;

/// Parse an integer bound such as a model year
pub fn parse_int_bound(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(value) = raw.parse::<i32>() {
        return Some(value);
    }

    raw.parse::<f64>().ok().and_then(whole_i32)
}

/// Parse a numeric bound such as a price or mileage
pub fn parse_number_bound(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Split a comma-joined list, dropping blank items
pub fn parse_list(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}

fn whole_i32(value: f64) -> Option<i32> {
    if value.is_finite()
        && value.fract() == 0.0
        && value >= i32::MIN as f64
        && value <= i32::MAX as f64
    {
        Some(value as i32)
    } else {
        None
    }
}

/// Serde adapter: integer bound from a JSON number or numeric string
pub fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => i32::try_from(i).ok(),
            None => n.as_f64().and_then(whole_i32),
        },
        Some(Value::String(s)) => parse_int_bound(&s),
        _ => None,
    })
}

/// Serde adapter: numeric bound from a JSON number or numeric string
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        Some(Value::String(s)) => parse_number_bound(&s),
        _ => None,
    })
}

/// Serde adapter: value set from a JSON array, a comma-joined string, or null
///
/// Non-string array items are skipped.
pub fn lenient_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => parse_list(&s).collect(),
        _ => BTreeSet::new(),
    })
}
