//! Permissive field decoders for stored and imported items.
//!
//! Stored collections and JSON imports are trusted as-is, so a wrong type or a
//! `null` must degrade to the field default instead of failing the whole
//! collection.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decodes any JSON scalar into text; `null` becomes `""`.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_text(Value::deserialize(deserializer)?))
}

/// Decodes epoch milliseconds from a number or numeric string; anything else
/// becomes `0`.
pub(crate) fn millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let millis = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64)),
        Value::String(text) => text.trim().parse::<f64>().ok().map(|float| float as i64),
        _ => None,
    };
    Ok(millis.unwrap_or(0))
}

pub(crate) fn value_to_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    }
}
