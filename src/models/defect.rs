//! Field-level validation for opaque API records.
//!
//! Records arrive as untyped JSON. Each field the dashboard reads is validated
//! on its own and reported as a [`FieldDefect`] when unusable, so one bad field
//! never takes down the row (let alone the page).

use serde_json::Value;
use thiserror::Error;

/// A field that could not be read from a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldDefect {
    #[error("record is {0}, expected an object")]
    NotAnObject(&'static str),

    #[error("missing field `{0}`")]
    Missing(&'static str),

    #[error("field `{field}` is {found}, expected {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

/// Short description of a JSON value's kind, for error messages.
#[must_use]
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Walk a dotted path (`"status.k8sNodeStatus"`) through nested objects.
///
/// Every intermediate segment must be an object. A missing segment or a `null`
/// intermediate is reported as [`FieldDefect::Missing`]; the final value is
/// returned as-is, including `null`, so callers can tell "absent" from "null".
pub fn lookup<'a>(value: &'a Value, path: &'static str) -> Result<&'a Value, FieldDefect> {
    let mut current = value;
    let mut walked = 0usize;

    for segment in path.split('.') {
        let object = match current {
            Value::Object(map) => map,
            Value::Null => return Err(FieldDefect::Missing(path)),
            other => {
                // Report the prefix that should have been an object
                let field = if walked == 0 { "record" } else { path };
                return Err(FieldDefect::WrongType {
                    field,
                    expected: "an object",
                    found: json_kind(other),
                });
            }
        };
        current = object.get(segment).ok_or(FieldDefect::Missing(path))?;
        walked += 1;
    }

    Ok(current)
}

/// Like [`lookup`], but treats a trailing `null` as missing.
pub fn lookup_present<'a>(value: &'a Value, path: &'static str) -> Result<&'a Value, FieldDefect> {
    match lookup(value, path)? {
        Value::Null => Err(FieldDefect::Missing(path)),
        found => Ok(found),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_nested_field() {
        let record = json!({"status": {"current": {"state": "RUNNING"}}});
        assert_eq!(
            lookup(&record, "status.current.state"),
            Ok(&json!("RUNNING"))
        );
    }

    #[test]
    fn test_lookup_missing_segment() {
        let record = json!({"status": {}});
        assert_eq!(
            lookup(&record, "status.current.state"),
            Err(FieldDefect::Missing("status.current.state"))
        );
    }

    #[test]
    fn test_lookup_null_intermediate_is_missing() {
        let record = json!({"status": null});
        assert_eq!(
            lookup(&record, "status.current"),
            Err(FieldDefect::Missing("status.current"))
        );
    }

    #[test]
    fn test_lookup_keeps_trailing_null() {
        let record = json!({"status": {"current": null}});
        assert_eq!(lookup(&record, "status.current"), Ok(&Value::Null));
        assert_eq!(
            lookup_present(&record, "status.current"),
            Err(FieldDefect::Missing("status.current"))
        );
    }

    #[test]
    fn test_lookup_wrong_intermediate_type() {
        let record = json!({"status": [1, 2]});
        let err = lookup(&record, "status.current").unwrap_err();
        assert_eq!(
            err,
            FieldDefect::WrongType {
                field: "status.current",
                expected: "an object",
                found: "an array",
            }
        );
        assert!(err.to_string().contains("an array"));
    }
}
