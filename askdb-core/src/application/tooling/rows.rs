//! Conversion of raw driver cells into JSON values the model can read.
//!
//! Temporal values are rendered in one fixed layout regardless of how the
//! engine printed them: `YYYY-MM-DD` for dates, `YYYY-MM-DDTHH:MM:SS[.ffffff]` for
//! date-times and `HH:MM:SS` for times.

use super::interface::{Cell, ColumnHeader, RawRows};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;
use serde_json::{Number, Value, json};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_OUTPUT: &str = "%Y-%m-%dT%H:%M:%S";
const DATETIME_FRACTION_OUTPUT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const TIME_OUTPUT: &str = "%H:%M:%S";
const ENGINE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Normalised result set handed back to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub row_count: usize,
    pub truncated: bool,
}

impl RowSet {
    /// Normalises `raw`, keeping at most `limit` rows.
    pub fn from_raw(raw: RawRows, limit: usize) -> Self {
        let truncated = raw.rows.len() > limit;
        let rows: Vec<Vec<Value>> = raw
            .rows
            .into_iter()
            .take(limit)
            .map(|row| normalize_row(&raw.columns, row))
            .collect();
        Self {
            columns: raw.columns.into_iter().map(|column| column.name).collect(),
            row_count: rows.len(),
            rows,
            truncated,
        }
    }
}

fn normalize_row(columns: &[ColumnHeader], row: Vec<Cell>) -> Vec<Value> {
    row.into_iter()
        .enumerate()
        .map(|(index, cell)| {
            let type_name = columns
                .get(index)
                .map(|column| column.type_name.as_str())
                .unwrap_or("");
            normalize_cell(type_name, cell)
        })
        .collect()
}

/// Converts one cell using the column's driver type name.
pub fn normalize_cell(type_name: &str, cell: Cell) -> Value {
    match cell {
        Cell::Null => Value::Null,
        Cell::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => normalize_text(type_name, text),
            Err(err) => json!({ "base64": STANDARD.encode(err.into_bytes()) }),
        },
        Cell::Text(text) => normalize_text(type_name, text),
    }
}

fn normalize_text(type_name: &str, text: String) -> Value {
    let upper = type_name.to_ascii_uppercase();
    let base = upper.split_whitespace().next().unwrap_or("");
    match base {
        "DATE" => Value::String(normalize_date(&text).unwrap_or(text)),
        "DATETIME" | "TIMESTAMP" => Value::String(normalize_datetime(&text).unwrap_or(text)),
        "TIME" => Value::String(normalize_time(&text).unwrap_or(text)),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "INTEGER" | "BIGINT" | "YEAR" => {
            integer(&text).unwrap_or(Value::String(text))
        }
        "FLOAT" | "DOUBLE" | "REAL" => float(&text).unwrap_or(Value::String(text)),
        "BOOLEAN" | "BOOL" => match text.trim() {
            "0" => Value::Bool(false),
            "1" => Value::Bool(true),
            _ => Value::String(text),
        },
        "JSON" => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        _ => Value::String(normalize_datetime(&text).unwrap_or(text)),
    }
}

pub fn normalize_date(text: &str) -> Option<String> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .ok()
        .map(|date| date.format(DATE_FORMAT).to_string())
}

/// Renders an engine-formatted date-time in ISO layout. `None` when `text`
/// is not a date-time, including zero dates.
pub fn normalize_datetime(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.len() < 19 {
        return None;
    }
    ENGINE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|value| {
            let layout = if value.nanosecond() == 0 {
                DATETIME_OUTPUT
            } else {
                DATETIME_FRACTION_OUTPUT
            };
            value.format(layout).to_string()
        })
}

pub fn normalize_time(text: &str) -> Option<String> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M:%S%.f")
        .ok()
        .map(|time| time.format(TIME_OUTPUT).to_string())
}

fn integer(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(Value::Number(value.into()));
    }
    trimmed
        .parse::<u64>()
        .ok()
        .map(|value| Value::Number(value.into()))
}

fn float(text: &str) -> Option<Value> {
    text.trim()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}
