// ABOUTME: Value inspection shared by template functions
// ABOUTME: Zero-value and emptiness checks plus the default string form of JSON values

use serde_json::Value as JsonValue;

/// Whether `value` is the zero value of its own type.
///
/// Arrays and objects have no comparable zero value and count as zero, so a
/// condition of that kind always suppresses emission.
pub fn is_zero(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Bool(b) => !b,
        JsonValue::Number(n) => n.as_f64().map_or(false, |f| f == 0.0),
        JsonValue::String(s) => s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

/// Emptiness in the helper-library sense: like `is_zero`, but collections are
/// empty only when they hold no elements.
pub fn is_empty(value: &JsonValue) -> bool {
    match value {
        JsonValue::Array(items) => items.is_empty(),
        JsonValue::Object(fields) => fields.is_empty(),
        other => is_zero(other),
    }
}

/// Default string form: strings verbatim, null as empty, everything else as compact JSON.
pub fn stringify(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}
