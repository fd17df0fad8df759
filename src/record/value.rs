use serde_json::Value;
use std::borrow::Cow;

/// Render an output value as the string candidates are matched against.
///
/// Strings are used verbatim and numbers keep their JSON text. Booleans and
/// null are spelled `True`/`False`/`None`, as the archive tooling prints them.
/// Nested containers render as compact JSON.
pub fn stringify(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Bool(true) => Cow::Borrowed("True"),
        Value::Bool(false) => Cow::Borrowed("False"),
        Value::Null => Cow::Borrowed("None"),
        other => Cow::Owned(other.to_string()),
    }
}
