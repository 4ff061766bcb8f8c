//! Raw field coercion used by generated `from_fields` / `from_map`
//!
//! All parsers take the raw text of one field. An absent field, an empty
//! string, or the `\N` null marker yields `None` for every column type.

use crate::error::FieldCoercionError;
use crate::value::{ValueMap, TIMESTAMP_FORMAT};
use chrono::{DateTime, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Null marker used by flat-file exports
pub const NULL_MARKER: &str = "\\N";

const TIMESTAMP_INPUT_FORMATS: &[&str] = &[TIMESTAMP_FORMAT, "%Y-%m-%dT%H:%M:%S%.f"];

fn present(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.is_empty() && *s != NULL_MARKER)
}

/// Field at `index`, `None` when the row is shorter
pub fn field<S: AsRef<str>>(fields: &[S], index: usize) -> Option<&str> {
    fields.get(index).map(AsRef::as_ref)
}

/// Rows may omit trailing fields but never carry extra ones
pub fn check_arity(table: &str, actual: usize, expected: usize) -> Result<(), FieldCoercionError> {
    if actual > expected {
        return Err(FieldCoercionError::Arity {
            table: table.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// Text form of a named entry in a value map
///
/// Strings pass through, numbers and booleans are rendered, null or a
/// missing key is absent. Arrays and objects are rejected.
pub fn map_field(table: &str, column: &str, map: &ValueMap) -> Result<Option<String>, FieldCoercionError> {
    use serde_json::Value;

    match map.get(column) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(FieldCoercionError::invalid(
            table,
            column,
            other.to_string(),
            "scalar",
            "nested values are not supported",
        )),
    }
}

fn parse_number<T: FromStr>(
    table: &str,
    column: &str,
    raw: Option<&str>,
    expected: &'static str,
) -> Result<Option<T>, FieldCoercionError>
where
    T::Err: std::fmt::Display,
{
    let Some(raw) = present(raw) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|e| FieldCoercionError::invalid(table, column, raw, expected, e.to_string()))
}

pub fn int(table: &str, column: &str, raw: Option<&str>) -> Result<Option<i32>, FieldCoercionError> {
    parse_number(table, column, raw, "INT")
}

pub fn bigint(table: &str, column: &str, raw: Option<&str>) -> Result<Option<i64>, FieldCoercionError> {
    parse_number(table, column, raw, "BIGINT")
}

/// Decimal with at most `scale` fractional digits; the input's own scale is kept
pub fn decimal(
    table: &str,
    column: &str,
    raw: Option<&str>,
    scale: u32,
) -> Result<Option<Decimal>, FieldCoercionError> {
    let Some(value) = parse_number::<Decimal>(table, column, raw, "DECIMAL")? else {
        return Ok(None);
    };
    if value.scale() > scale {
        return Err(FieldCoercionError::invalid(
            table,
            column,
            raw.unwrap_or_default(),
            "DECIMAL",
            format!("more than {} fractional digits", scale),
        ));
    }
    Ok(Some(value))
}

/// String of at most `max_length` characters
pub fn varchar(
    table: &str,
    column: &str,
    raw: Option<&str>,
    max_length: u32,
) -> Result<Option<String>, FieldCoercionError> {
    let Some(raw) = present(raw) else {
        return Ok(None);
    };
    let length = raw.chars().count();
    if length > max_length as usize {
        return Err(FieldCoercionError::invalid(
            table,
            column,
            raw,
            "VARCHAR",
            format!("{} characters exceeds maximum length {}", length, max_length),
        ));
    }
    Ok(Some(raw.to_string()))
}

/// `true`/`false`, `t`/`f`, `1`/`0`, `yes`/`no`, case-insensitive
pub fn boolean(table: &str, column: &str, raw: Option<&str>) -> Result<Option<bool>, FieldCoercionError> {
    let Some(raw) = present(raw) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" => Ok(Some(true)),
        "false" | "f" | "0" | "no" => Ok(Some(false)),
        _ => Err(FieldCoercionError::invalid(
            table,
            column,
            raw,
            "BOOLEAN",
            "expected true or false",
        )),
    }
}

/// `YYYY-MM-DD HH:MM:SS[.fff]`, the `T`-separated form, or RFC 3339 (normalized to UTC)
pub fn timestamp(
    table: &str,
    column: &str,
    raw: Option<&str>,
) -> Result<Option<NaiveDateTime>, FieldCoercionError> {
    let Some(raw) = present(raw) else {
        return Ok(None);
    };
    let text = raw.trim();

    for format in TIMESTAMP_INPUT_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(Some(value));
        }
    }

    DateTime::parse_from_rfc3339(text)
        .map(|dt| Some(dt.naive_utc()))
        .map_err(|e| FieldCoercionError::invalid(table, column, raw, "TIMESTAMP", e.to_string()))
}
