//! List-field codec for the record store boundary.
//!
//! The store keeps every list-valued field as a JSON-encoded string. Older
//! records, fixtures and in-flight documents may already carry the decoded
//! array, so `decode` accepts both shapes. Decoding is total: a field that
//! does not parse becomes an empty list and a malformed entry is dropped on
//! its own. Both are logged.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::error;

/// Decodes a raw list field that may be a JSON string, an array, or null.
pub fn decode<T: DeserializeOwned>(field: &str, raw: &Value) -> Vec<T> {
    match raw {
        Value::Null => vec![],
        Value::String(text) => decode_str(field, text),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| decode_entry(field, index, item))
            .collect(),
        other => {
            error!(field = %field, "Expected a list, got {other}; using empty list");
            vec![]
        }
    }
}

/// Decodes one list element. Null members of an object fall back to their
/// defaults; an element that still fails is dropped on its own.
fn decode_entry<T: DeserializeOwned>(field: &str, index: usize, item: &Value) -> Option<T> {
    let item = match item {
        Value::Object(members) => Value::Object(
            members
                .iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ),
        other => other.clone(),
    };
    serde_json::from_value(item)
        .map_err(|e| error!(field = %field, index, "Dropping malformed list entry: {e}"))
        .ok()
}

/// Decodes a JSON-encoded list field. Blank text is an empty list.
pub fn decode_str<T: DeserializeOwned>(field: &str, text: &str) -> Vec<T> {
    if text.trim().is_empty() {
        return vec![];
    }

    match serde_json::from_str::<Value>(text) {
        // A string that itself holds the encoded list.
        Ok(Value::String(inner)) if inner != text => decode_str(field, &inner),
        Ok(value @ Value::Array(_)) => decode(field, &value),
        Ok(other) => {
            error!(field = %field, "Expected an encoded list, got {other}; using empty list");
            vec![]
        }
        Err(e) => {
            error!(field = %field, "Failed to parse encoded list, using empty list: {e}");
            vec![]
        }
    }
}

/// Encodes a list for transmission to the store.
pub fn encode<T: Serialize>(items: &[T]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

/// Applies [`decode`] to a struct field while deserializing. Wrapped per
/// field by a `deserialize_with` function that supplies the field name.
pub fn tolerant<'de, D, T>(field: &str, deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(decode(field, &raw))
}
