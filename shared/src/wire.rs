//! Lenient readers for the PHP API's JSON.
//!
//! The API returns numbers as numbers, as strings, as empty strings or not at
//! all, and the same value sometimes lives under different field names. These
//! helpers turn all of that into plain Rust values exactly once, so the rest
//! of the crate never looks at a raw `Value`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a JSON value as a number. Anything unreadable is 0.
pub fn number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

/// Reads a JSON value as display text. Numbers are rendered, null is empty.
pub fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// First of `keys` that is present and not blank, read as a number.
pub fn first_number(record: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !is_blank(value))
        .map(number)
}

/// First of `keys` that is present and not blank, read as text.
pub fn first_text(record: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !is_blank(value))
        .map(text)
        .unwrap_or_default()
}

/// Pulls the row array out of a list response.
///
/// Accepts `{ "<key>": [...] }` or a bare array; every other shape is treated
/// as "no data".
pub fn extract_rows(body: &Value, key: &str) -> Vec<Value> {
    match body {
        Value::Array(rows) => rows.clone(),
        Value::Object(map) => match map.get(key) {
            Some(Value::Array(rows)) => rows.clone(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Deserializes each row on its own, skipping rows that are not usable.
pub fn decode_rows<T>(rows: Vec<Value>) -> Vec<T>
where
    T: for<'de> Deserialize<'de>,
{
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<T>(row) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                log::warn!("Skipping malformed row: {}", e);
                None
            }
        })
        .collect()
}

/// `deserialize_with` adapter for money and quantity fields.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number(&value))
}

/// `deserialize_with` adapter for optional money fields; blank reads as `None`.
pub fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(if is_blank(&value) { None } else { Some(number(&value)) })
}

/// `deserialize_with` adapter for ids and labels that may arrive as numbers.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_is_lenient() {
        assert_eq!(number(&json!(12.5)), 12.5);
        assert_eq!(number(&json!("1,250.75")), 1250.75);
        assert_eq!(number(&json!(" 40 ")), 40.0);
        assert_eq!(number(&json!("abc")), 0.0);
        assert_eq!(number(&json!(null)), 0.0);
        assert_eq!(number(&json!("NaN")), 0.0);
    }

    #[test]
    fn test_first_number_prefers_earlier_keys() {
        let header = json!({ "SubTotal": 90, "SubTotalAll": "100", "SubtotalAll": "" });
        assert_eq!(
            first_number(&header, &["SubtotalAll", "SubTotalAll", "SubTotal"]),
            Some(100.0)
        );
        assert_eq!(first_number(&header, &["Missing"]), None);
    }

    #[test]
    fn test_extract_rows_shapes() {
        assert_eq!(extract_rows(&json!({ "result": [1, 2] }), "result").len(), 2);
        assert_eq!(extract_rows(&json!([1, 2, 3]), "result").len(), 3);
        assert!(extract_rows(&json!({ "result": "none" }), "result").is_empty());
        assert!(extract_rows(&json!("error"), "result").is_empty());
    }
}
