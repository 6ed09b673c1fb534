//! Parse-then-validate of untrusted model replies.
//!
//! Structured-output mode only guides the model; nothing here assumes the
//! reply actually follows the schema it was given.

use std::collections::{BTreeMap, HashSet};

use serde_json::{Map, Value};

use crate::chart::{
    COLOR_FIELD, ChartKind, DataRow, FILL_FIELD, GenerationResult, KEY_FIELD, NAME_FIELD,
    ROWS_FIELD, SERIES_KEYS_FIELD, SeriesKey, VALUE_FIELD,
};

use super::GenerationError;

type Object = Map<String, Value>;

/// Trim, parse and validate raw reply text.
///
/// # Errors
///
/// [`GenerationError::EmptyResponse`] for blank text,
/// [`GenerationError::MalformedResponse`] for invalid JSON, and
/// [`GenerationError::SchemaViolation`] for a reply of the wrong shape.
pub fn parse_reply(kind: ChartKind, text: &str) -> Result<GenerationResult, GenerationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    validate_reply(kind, &value)
}

/// Check a parsed reply against the shape `kind` requires.
///
/// # Errors
///
/// Returns [`GenerationError::SchemaViolation`] naming the first violated
/// expectation.
pub fn validate_reply(kind: ChartKind, value: &Value) -> Result<GenerationResult, GenerationError> {
    let reply = value
        .as_object()
        .ok_or_else(|| GenerationError::schema_violation("reply is not a JSON object"))?;

    let rows = reply
        .get(ROWS_FIELD)
        .ok_or_else(|| GenerationError::schema_violation(format!("missing `{ROWS_FIELD}` array")))?
        .as_array()
        .ok_or_else(|| {
            GenerationError::schema_violation(format!("`{ROWS_FIELD}` is not an array"))
        })?;

    if rows.is_empty() {
        return Err(GenerationError::schema_violation(format!(
            "`{ROWS_FIELD}` array is empty"
        )));
    }

    if kind.is_series() {
        validate_series(reply, rows)
    } else {
        validate_categorical(rows)
    }
}

fn validate_categorical(rows: &[Value]) -> Result<GenerationResult, GenerationError> {
    let rows = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let row = row_object(index, row)?;
            let name = label(index, row)?;
            let value = number(index, row, VALUE_FIELD)?;
            let fill = text(row, FILL_FIELD).ok_or_else(|| {
                GenerationError::schema_violation(format!(
                    "row {index} is missing text field `{FILL_FIELD}`"
                ))
            })?;
            Ok::<_, GenerationError>(DataRow::slice(name, value, fill))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GenerationResult::categorical(rows))
}

fn validate_series(reply: &Object, rows: &[Value]) -> Result<GenerationResult, GenerationError> {
    let keys = series_keys(reply)?;

    let rows = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let row = row_object(index, row)?;
            let name = label(index, row)?;
            let mut values = BTreeMap::new();
            for key in &keys {
                let value = match row.get(&key.key) {
                    None => {
                        return Err(GenerationError::schema_violation(format!(
                            "series key `{}` is missing from row {index} (`{name}`)",
                            key.key
                        )));
                    }
                    Some(v) => v.as_f64().ok_or_else(|| {
                        GenerationError::schema_violation(format!(
                            "series key `{}` on row {index} (`{name}`) is not a number",
                            key.key
                        ))
                    })?,
                };
                values.insert(key.key.clone(), value);
            }
            Ok::<_, GenerationError>(DataRow {
                name,
                fill: None,
                values,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GenerationResult::series(rows, keys))
}

fn series_keys(reply: &Object) -> Result<Vec<SeriesKey>, GenerationError> {
    let entries = reply
        .get(SERIES_KEYS_FIELD)
        .ok_or_else(|| {
            GenerationError::schema_violation(format!("missing `{SERIES_KEYS_FIELD}` array"))
        })?
        .as_array()
        .ok_or_else(|| {
            GenerationError::schema_violation(format!("`{SERIES_KEYS_FIELD}` is not an array"))
        })?;

    if entries.is_empty() {
        return Err(GenerationError::schema_violation(format!(
            "`{SERIES_KEYS_FIELD}` array is empty"
        )));
    }

    let mut seen = HashSet::new();
    let mut keys = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let entry = entry.as_object().ok_or_else(|| {
            GenerationError::schema_violation(format!(
                "`{SERIES_KEYS_FIELD}` entry {index} is not an object"
            ))
        })?;
        let key = text(entry, KEY_FIELD).ok_or_else(|| {
            GenerationError::schema_violation(format!(
                "`{SERIES_KEYS_FIELD}` entry {index} is missing text field `{KEY_FIELD}`"
            ))
        })?;
        let color = text(entry, COLOR_FIELD).ok_or_else(|| {
            GenerationError::schema_violation(format!(
                "`{SERIES_KEYS_FIELD}` entry {index} is missing text field `{COLOR_FIELD}`"
            ))
        })?;
        if key == NAME_FIELD {
            return Err(GenerationError::schema_violation(format!(
                "series key `{key}` collides with the row label field"
            )));
        }
        if !seen.insert(key.clone()) {
            return Err(GenerationError::schema_violation(format!(
                "series key `{key}` is declared more than once"
            )));
        }
        keys.push(SeriesKey::new(key, color));
    }
    Ok(keys)
}

fn row_object(index: usize, row: &Value) -> Result<&Object, GenerationError> {
    row.as_object().ok_or_else(|| {
        GenerationError::schema_violation(format!("row {index} is not an object"))
    })
}

/// Row label; numeric labels such as years are accepted as text.
fn label(index: usize, row: &Object) -> Result<String, GenerationError> {
    match row.get(NAME_FIELD) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(GenerationError::schema_violation(format!(
            "row {index} has a non-text `{NAME_FIELD}`"
        ))),
        None => Err(GenerationError::schema_violation(format!(
            "row {index} is missing `{NAME_FIELD}`"
        ))),
    }
}

fn number(index: usize, row: &Object, field: &str) -> Result<f64, GenerationError> {
    row.get(field).and_then(Value::as_f64).ok_or_else(|| {
        GenerationError::schema_violation(format!(
            "row {index} is missing numeric field `{field}`"
        ))
    })
}

fn text(object: &Object, field: &str) -> Option<String> {
    object.get(field).and_then(Value::as_str).map(str::to_owned)
}
