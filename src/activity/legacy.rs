//! Lenient field decoders for activity tables written by older tools.
//!
//! Older tables store the recurrence as a textual mapping and the tag and
//! dependency lists as comma-separated strings. Both shapes are accepted
//! alongside the structured forms.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::types::{Recurrence, split_labels};

/// Decode a recurrence given either as an object or as legacy text.
///
/// Anything that does not decode (text that is not a mapping, an object
/// with out-of-range days or a non-string type, any other JSON value)
/// yields `None` so the caller can fall back to the activity's schedule
/// kind. Only the surrounding document being malformed JSON is an error.
pub(crate) fn recurrence<'de, D>(deserializer: D) -> Result<Option<Recurrence>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => decode_text(&text),
        Some(value @ Value::Object(_)) => decode_object(value),
        Some(other) => {
            tracing::warn!("ignoring recurrence of unexpected shape: {other}");
            None
        }
    })
}

fn decode_object(value: Value) -> Option<Recurrence> {
    match serde_json::from_value::<Recurrence>(value.clone()) {
        Ok(rec) => Some(rec),
        Err(e) => {
            tracing::warn!("ignoring malformed recurrence {value}: {e}");
            None
        }
    }
}

fn decode_text(text: &str) -> Option<Recurrence> {
    let trimmed = text.trim();
    if !trimmed.starts_with('{') {
        return None;
    }
    match Recurrence::parse_text(trimmed) {
        Ok(rec) => Some(rec),
        Err(e) => {
            tracing::warn!("ignoring malformed recurrence text {trimmed:?}: {e}");
            None
        }
    }
}

/// Decode a label list given either as an array or a comma-separated string.
///
/// Non-string array items and values of any other shape are dropped with a
/// warning.
pub(crate) fn label_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(text)) => split_labels(&text),
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(label) => Some(label.trim().to_owned()),
                other => {
                    tracing::warn!("ignoring non-text label {other}");
                    None
                }
            })
            .filter(|label| !label.is_empty())
            .collect(),
        Some(other) => {
            tracing::warn!("ignoring label list of unexpected shape: {other}");
            Vec::new()
        }
    })
}
