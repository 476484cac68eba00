//! Unwrapping of the backend's response envelope.
//!
//! Most endpoints answer `{"status": "success", "message": ..., "data": ...}`,
//! router-generated endpoints answer the bare payload, and paginated lists
//! arrive as `{"count": n, "results": [...]}` at either level.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::Result;

/// `data` when present and non-null, else the value itself.
pub fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if !data.is_null() => data,
            Some(_) | None => Value::Object(map),
        },
        other => other,
    }
}

/// List items and total count from an array, a paginated object, or either
/// wrapped in the envelope. Count falls back to the number of items.
pub fn unwrap_page(value: Value) -> (Vec<Value>, u64) {
    match unwrap_data(value) {
        Value::Array(items) => {
            let count = items.len() as u64;
            (items, count)
        }
        Value::Object(mut map) => {
            let items = match map.remove("results") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            };
            let count = map
                .get("count")
                .and_then(Value::as_u64)
                .unwrap_or(items.len() as u64);
            (items, count)
        }
        _ => (Vec::new(), 0),
    }
}

/// List items only; anything that is not a list becomes empty.
pub fn unwrap_list(value: Value) -> Vec<Value> {
    unwrap_page(value).0
}

/// Typed version of [`unwrap_page`].
pub fn decode_page<T: DeserializeOwned>(value: Value) -> Result<(Vec<T>, u64)> {
    let (items, count) = unwrap_page(value);
    let items = items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<std::result::Result<Vec<T>, _>>()?;
    Ok((items, count))
}

pub fn decode_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>> {
    Ok(decode_page(value)?.0)
}

/// Typed version of [`unwrap_data`].
pub fn decode_data<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(unwrap_data(value))?)
}

/// Best human message in an error body: `message`, `error`, `detail`, then the
/// first field error (`errors.{field}` or a top-level `{field: [..]}`).
pub fn error_message(body: &Value) -> Option<String> {
    if !(body.is_object() || body.is_array()) {
        return None;
    }
    let text = |v: Option<&Value>| {
        v.and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
    };

    if let Some(found) = text(body.get("message"))
        .or_else(|| text(body.get("error")))
        .or_else(|| text(body.get("detail")))
    {
        return Some(found);
    }

    let fields = body
        .get("errors")
        .filter(|e| e.is_object())
        .unwrap_or(body);
    first_field_error(fields)
}

fn first_field_error(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_field_error),
        Value::Object(map) => map
            .iter()
            .filter(|(field, _)| !matches!(field.as_str(), "status" | "code"))
            .find_map(|(field, v)| {
                let message = first_field_error(v)?;
                Some(if field == "non_field_errors" {
                    message
                } else {
                    format!("{field}: {message}")
                })
            }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_is_preferred_over_bare_payload() {
        assert_eq!(
            unwrap_data(json!({ "status": "success", "data": { "id": 1 } })),
            json!({ "id": 1 })
        );
        assert_eq!(unwrap_data(json!({ "id": 2 })), json!({ "id": 2 }));
        assert_eq!(
            unwrap_data(json!({ "status": "success", "data": null, "id": 3 })),
            json!({ "status": "success", "id": 3 })
        );
    }

    #[test]
    fn paginated_lists_flatten_with_counts() {
        let (items, count) = unwrap_page(json!({
            "status": "success",
            "data": { "count": 42, "results": [{ "id": 1 }, { "id": 2 }] }
        }));
        assert_eq!(items.len(), 2);
        assert_eq!(count, 42);

        let (items, count) = unwrap_page(json!([{ "id": 1 }]));
        assert_eq!((items.len(), count), (1, 1));

        let (items, count) = unwrap_page(json!({ "results": [{ "id": 1 }] }));
        assert_eq!((items.len(), count), (1, 1));

        assert!(unwrap_list(json!({ "detail": "nope" })).is_empty());
    }

    #[test]
    fn error_message_priority() {
        assert_eq!(
            error_message(&json!({ "message": "Invalid input data", "detail": "x" })),
            Some("Invalid input data".into())
        );
        assert_eq!(
            error_message(&json!({ "detail": "Not found." })),
            Some("Not found.".into())
        );
        assert_eq!(
            error_message(&json!({ "status": "error", "errors": { "name": ["This field is required."] } })),
            Some("name: This field is required.".into())
        );
        assert_eq!(
            error_message(&json!({ "non_field_errors": ["Passwords differ"] })),
            Some("Passwords differ".into())
        );
        assert_eq!(error_message(&json!({})), None);
    }
}
