//! Data file loading
//!
//! Reads a CSV file (header row plus records) or a JSON array of objects
//! into engine rows. CSV cells are typed on the way in: empty cells are
//! null, and numbers, booleans and dates are recognised.

use chrono::{DateTime, NaiveDate, Utc};
use gridline::engine::{FilterFacet, Row, Value};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Most distinct values a column may have to get an inferred facet
pub const MAX_FACET_OPTIONS: usize = 8;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Expected a JSON array of objects")]
    NotAnArray,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedData {
    /// Field names in first-seen order
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

pub fn load_file(path: &Path) -> Result<LoadedData, LoadError> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => load_csv(File::open(path)?),
        "json" => {
            let mut contents = String::new();
            File::open(path)?.read_to_string(&mut contents)?;
            load_json(&contents)
        }
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

pub fn load_csv<R: Read>(source: R) -> Result<LoadedData, LoadError> {
    let mut reader = csv::Reader::from_reader(source);

    let headers = reader
        .headers()?
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<String>>();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(field, cell)| (field.clone(), parse_cell(cell)))
            .collect();
        rows.push(row);
    }

    Ok(LoadedData { headers, rows })
}

pub fn load_json(contents: &str) -> Result<LoadedData, LoadError> {
    let parsed: serde_json::Value = serde_json::from_str(contents)?;
    let serde_json::Value::Array(items) = parsed else {
        return Err(LoadError::NotAnArray);
    };

    let mut headers: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(items.len());
    for item in &items {
        let serde_json::Value::Object(object) = item else {
            return Err(LoadError::NotAnArray);
        };
        let mut row = Row::new();
        for (field, json) in object {
            if !headers.contains(field) {
                headers.push(field.clone());
            }
            let value = match json {
                serde_json::Value::String(s) => {
                    parse_date(s).unwrap_or_else(|| Value::from(s.as_str()))
                }
                other => Value::from_json(other),
            };
            row.insert(field.as_str(), value);
        }
        rows.push(row);
    }

    Ok(LoadedData { headers, rows })
}

/// Type a raw CSV cell
pub fn parse_cell(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    match cell {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = cell.parse::<f64>() {
        if n.is_finite() {
            return Value::Number(n);
        }
    }
    parse_date(cell).unwrap_or_else(|| Value::from(cell))
}

fn parse_date(text: &str) -> Option<Value> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(Value::Date(dt.with_timezone(&Utc)));
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    Some(Value::Date(date.and_hms_opt(0, 0, 0)?.and_utc()))
}

/// One facet per text column with a small set of repeated values
pub fn infer_facets(data: &LoadedData) -> Vec<FilterFacet> {
    let mut facets = Vec::new();

    for field in &data.headers {
        if field == "id" {
            continue;
        }
        let mut distinct: BTreeSet<String> = BTreeSet::new();
        let mut all_text = true;
        for row in &data.rows {
            match row.value(field) {
                Value::Null => {}
                Value::String(s) => {
                    distinct.insert(s.clone());
                }
                _ => {
                    all_text = false;
                    break;
                }
            }
            if distinct.len() > MAX_FACET_OPTIONS {
                break;
            }
        }

        if !all_text || distinct.len() < 2 || distinct.len() > MAX_FACET_OPTIONS {
            continue;
        }
        if distinct.len() >= data.rows.len() {
            continue;
        }

        let facet = distinct
            .into_iter()
            .fold(FilterFacet::new(field.as_str(), field.as_str()), |facet, value| {
                facet.option(value.as_str(), "")
            });
        facets.push(facet);
    }

    facets
}
