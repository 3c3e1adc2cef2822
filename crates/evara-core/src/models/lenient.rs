//! Forgiving field decoders for records read from the store.
//!
//! Documents written by other clients may carry a number where text is
//! expected, or `null` for a flag. A stray field type loses that field, never
//! the whole record.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Text field: numbers and booleans are kept as their text, anything else is `None`.
pub(crate) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    })
}

/// Boolean field that also accepts `"true"`/`"false"` and `0`/`1`.
pub(crate) fn optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(flag)) => Some(flag),
        Some(Value::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        Some(Value::Number(number)) => number.as_i64().map(|value| value != 0),
        _ => None,
    })
}

/// Like [`optional_flag`], with unreadable values as `false`.
pub(crate) fn flag_or_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_flag(deserializer)?.unwrap_or_default())
}
