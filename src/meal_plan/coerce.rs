//! Lenient conversions from model-produced JSON values into plain Rust values.
//!
//! Model output is typed loosely: numbers arrive as strings ("15 min"),
//! lists arrive as single strings, ingredient maps arrive as arrays. Every
//! helper here returns a default instead of failing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::model::Ingredient;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

/// Parses the calendar date out of a date or timestamp string.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(text, format) {
            return Some(timestamp.date());
        }
    }
    None
}

/// Reads a number from a JSON number or from the leading numeric token of a
/// string (`"4.50"`, `"$4.50"`, `"15 minutes"`).
pub fn as_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_number(s),
        _ => None,
    }
}

fn leading_number(text: &str) -> Option<f64> {
    let trimmed = text.trim().trim_start_matches('$');
    let end = trimmed
        .char_indices()
        .find(|(idx, c)| !(c.is_ascii_digit() || *c == '.' || (*c == '-' && *idx == 0)))
        .map(|(idx, _)| idx)
        .unwrap_or(trimmed.len());
    trimmed[..end].parse::<f64>().ok()
}

/// Non-negative whole number; absent, negative or non-numeric values become 0.
pub fn as_u32(value: Option<&Value>) -> u32 {
    match as_f64(value) {
        Some(n) if n.is_finite() && n > 0.0 => n.round().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

/// Non-negative decimal; absent, negative or non-numeric values become 0.
pub fn as_non_negative(value: Option<&Value>) -> f64 {
    match as_f64(value) {
        Some(n) if n.is_finite() && n > 0.0 => n,
        _ => 0.0,
    }
}

/// Text form of a scalar. Objects, arrays and null yield `None`.
pub fn as_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn as_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// A list of strings. A lone string counts as a one-element list; non-text
/// elements are dropped.
pub fn as_string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| as_text(Some(item)))
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Ingredient list from either an `{name: amount}` object, or an array of
/// strings / `{name, amount|quantity}` objects.
pub fn as_ingredients(value: Option<&Value>) -> Vec<Ingredient> {
    match value {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(name, amount)| Ingredient::new(name.clone(), as_text(Some(amount)).unwrap_or_default()))
            .collect(),
        Some(Value::Array(items)) => items.iter().filter_map(ingredient_from_element).collect(),
        _ => Vec::new(),
    }
}

fn ingredient_from_element(element: &Value) -> Option<Ingredient> {
    match element {
        Value::String(name) if !name.trim().is_empty() => Some(Ingredient::new(name.clone(), "")),
        Value::Object(fields) => {
            let name = as_text(fields.get("name").or_else(|| fields.get("ingredient")))?;
            let amount = as_text(fields.get("amount").or_else(|| fields.get("quantity"))).unwrap_or_default();
            Some(Ingredient::new(name, amount))
        }
        _ => None,
    }
}
