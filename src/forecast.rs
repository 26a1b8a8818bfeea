// 📰 Forecast Extractor - Nested JMA JSON → flat display records
//
// Walks one forecast document (an array of area forecasts) and emits an
// ordered list of DisplayRecord values. Every field is optional: a missing or
// mistyped field skips its line, it never fails the extraction.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::weather_codes;

/// Raw forecast document: the array of area forecasts as fetched
pub type ForecastDocument = Vec<Value>;

/// Placeholder for absent temperature/wind/wave cells
const MISSING_CELL: &str = "  -";

/// Joins temperature/wind/wave cells on one line
const CELL_SEPARATOR: &str = " | ";

// ============================================================================
// DISPLAY RECORD
// ============================================================================

/// One renderer-agnostic output line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayRecord {
    AreaHeader {
        name: String,
    },

    /// Report time, passed through verbatim
    Timestamp {
        raw: String,
    },

    ForecastLine {
        area_name: String,
    },

    DayLine {
        /// 1-based position within the time series
        day_index: usize,
        date_short: String,
        weather_text: String,
        code: String,
    },

    TempLine {
        values: String,
    },

    WindLine {
        values: String,
    },

    WaveLine {
        values: String,
    },

    Separator,

    /// Data came back but nothing in it was renderable
    Empty,

    /// The document itself was empty
    NoData,
}

// ============================================================================
// BOUNDARY
// ============================================================================

/// Parse a forecast payload. Anything but a top-level JSON array is rejected.
pub fn parse_forecast_document(text: &str) -> Result<ForecastDocument> {
    serde_json::from_str::<ForecastDocument>(text)
        .context("Forecast document must be a JSON array of area forecasts")
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Flatten a forecast document into display records.
///
/// An empty document yields `[NoData]`; a document that produced no lines
/// yields `[Empty]`. Pure: the same input always yields the same output.
pub fn extract(doc: &[Value]) -> Vec<DisplayRecord> {
    if doc.is_empty() {
        return vec![DisplayRecord::NoData];
    }

    let mut records = Vec::new();
    for area_forecast in doc {
        extract_area_forecast(area_forecast, &mut records);
    }

    if records.is_empty() {
        records.push(DisplayRecord::Empty);
    }
    records
}

fn extract_area_forecast(area_forecast: &Value, records: &mut Vec<DisplayRecord>) {
    if let Some(name) = area_name(area_forecast) {
        records.push(DisplayRecord::AreaHeader {
            name: name.to_string(),
        });
    }

    if let Some(raw) = area_forecast.get("reportDatetime").and_then(Value::as_str) {
        records.push(DisplayRecord::Timestamp {
            raw: raw.to_string(),
        });
    }

    for block in array_field(area_forecast, "timeSeries") {
        extract_time_series(block, records);
    }

    records.push(DisplayRecord::Separator);
}

fn extract_time_series(block: &Value, records: &mut Vec<DisplayRecord>) {
    // A block without time definitions has nothing to anchor its series to
    let time_defines = match block.get("timeDefines").and_then(Value::as_array) {
        Some(defines) => defines,
        None => return,
    };

    for entry in array_field(block, "areas") {
        extract_area_series(entry, time_defines, records);
    }
}

fn extract_area_series(entry: &Value, time_defines: &[Value], records: &mut Vec<DisplayRecord>) {
    if let Some(codes) = entry.get("weatherCodes").and_then(Value::as_array) {
        records.push(DisplayRecord::ForecastLine {
            area_name: area_name(entry).unwrap_or_default().to_string(),
        });

        for (i, (time_define, code)) in time_defines.iter().zip(codes).enumerate() {
            let code = cell_text(code).unwrap_or_default();
            records.push(DisplayRecord::DayLine {
                day_index: i + 1,
                date_short: date_short(time_define.as_str().unwrap_or_default()),
                weather_text: weather_codes::describe(&code),
                code,
            });
        }
    }

    if let Some(values) = joined_cells(entry, "temps", |t| format!("{:>3}°C", t)) {
        records.push(DisplayRecord::TempLine { values });
    }

    if let Some(values) = joined_cells(entry, "winds", |w| w.to_string()) {
        records.push(DisplayRecord::WindLine { values });
    }

    if let Some(values) = joined_cells(entry, "waves", |w| w.to_string()) {
        records.push(DisplayRecord::WaveLine { values });
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Short date label: "2024-01-01T00:00:00+09:00" → "01/01".
///
/// Only the shape of the date part is checked (`DDDD-DD-DD`), not calendar
/// validity. Anything else falls back to the first 10 characters.
pub fn date_short(raw: &str) -> String {
    let date_part = raw.split('T').next().unwrap_or(raw);

    if is_date_shaped(date_part) {
        format!("{}/{}", &date_part[5..7], &date_part[8..10])
    } else {
        raw.chars().take(10).collect()
    }
}

fn is_date_shaped(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn area_name(value: &Value) -> Option<&str> {
    value.get("area")?.get("name")?.as_str()
}

fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Text of a scalar cell. Null, empty strings and containers count as absent.
fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Format each cell of a positional array and join them on one line.
/// Returns None when the array is missing or empty.
fn joined_cells(entry: &Value, key: &str, format_cell: impl Fn(&str) -> String) -> Option<String> {
    let cells = array_field(entry, key);
    if cells.is_empty() {
        return None;
    }

    let formatted: Vec<String> = cells
        .iter()
        .map(|cell| match cell_text(cell) {
            Some(text) => format_cell(&text),
            None => MISSING_CELL.to_string(),
        })
        .collect();

    Some(formatted.join(CELL_SEPARATOR))
}

// ============================================================================
// TESTS
// ============================================================================
