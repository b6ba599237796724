//! Dotted key paths over a generic JSON document
//!
//! `thresholds.api.failure` addresses `doc["thresholds"]["api"]["failure"]`.

use serde_json::{Map, Value};

use crate::common::{Error, Result};

/// Split a dotted path into its segments
///
/// Empty paths and empty segments (`a..b`, `.a`, `a.`) are rejected.
pub fn split_key_path(key_path: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = key_path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(Error::InvalidKeyPath(key_path.to_string()));
    }
    Ok(segments)
}

/// Interpret a textual value given on the command line
///
/// Anything that parses as JSON is stored structured (`42`, `true`,
/// `{"a":1}`, `[1,2]`, `"quoted"`). Input that fails to parse is stored as
/// the literal string. `null` also falls back to the literal string `"null"`,
/// so JSON null cannot be written through this interface.
pub fn parse_value(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Null) | Err(_) => Value::String(raw.to_string()),
        Ok(value) => value,
    }
}

/// Store `value` at `key_path`, creating intermediate objects as needed
///
/// Fails with `TypeConflict` when an intermediate segment holds a non-object.
/// The document is only modified once the whole path has been validated.
pub fn set_path(doc: &mut Map<String, Value>, key_path: &str, value: Value) -> Result<()> {
    let segments = split_key_path(key_path)?;
    check_path(doc, &segments)?;

    let (last, parents) = segments
        .split_last()
        .ok_or_else(|| Error::InvalidKeyPath(key_path.to_string()))?;

    let mut current = doc;
    for (depth, segment) in parents.iter().enumerate() {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match entry {
            Value::Object(map) => map,
            other => {
                return Err(Error::TypeConflict {
                    key: segments[..=depth].join("."),
                    found: kind_of(other),
                })
            }
        };
    }
    current.insert(last.to_string(), value);
    Ok(())
}

/// Look up the value at `key_path`
pub fn get_path<'a>(doc: &'a Map<String, Value>, key_path: &str) -> Result<Option<&'a Value>> {
    let segments = split_key_path(key_path)?;
    let (first, rest) = match segments.split_first() {
        Some(split) => split,
        None => return Ok(None),
    };

    let mut current = match doc.get(*first) {
        Some(value) => value,
        None => return Ok(None),
    };
    for segment in rest {
        current = match current.as_object().and_then(|map| map.get(*segment)) {
            Some(value) => value,
            None => return Ok(None),
        };
    }
    Ok(Some(current))
}

/// Walk the existing prefix of `segments` without touching the document
fn check_path(doc: &Map<String, Value>, segments: &[&str]) -> Result<()> {
    let parents = &segments[..segments.len().saturating_sub(1)];
    let mut current = doc;
    for (depth, segment) in parents.iter().enumerate() {
        match current.get(*segment) {
            None => return Ok(()),
            Some(Value::Object(map)) => current = map,
            Some(other) => {
                return Err(Error::TypeConflict {
                    key: segments[..=depth].join("."),
                    found: kind_of(other),
                })
            }
        }
    }
    Ok(())
}

/// Human name of a JSON value's variant
fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
