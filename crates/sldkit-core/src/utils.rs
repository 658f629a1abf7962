use ryu_js::Buffer;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use uuid::Uuid;

/// Formats a number the way JavaScript's `Number#toString` does (`2`, `0.5`).
///
/// Style servers echo back whatever the editor sent, so `2.0` must stay `2` on the wire.
pub fn js_number(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut b = Buffer::new();
    b.format_finite(v).to_string()
}

/// Parses a trimmed decimal number, rejecting `inf`/`NaN` spellings.
pub(crate) fn parse_finite(text: &str) -> Option<f64> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }
    let v = t.parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => n.as_f64().map(js_number),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Editor payloads use numbers and strings interchangeably for ids and literal values.
pub(crate) fn de_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    scalar_to_string(v).ok_or_else(|| serde::de::Error::custom("expected a string or a number"))
}

pub(crate) fn de_opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(v.and_then(scalar_to_string))
}
