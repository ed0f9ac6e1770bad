//! Export of the processed row set to CSV and JSON text

use super::column::{declared_columns, Column};
use super::value::{Row, Value};
use chrono::SecondsFormat;
use regex::Regex;
use std::sync::LazyLock;

/// Title used when the caller gives none
pub const DEFAULT_EXPORT_TITLE: &str = "table-export";

/// Runs of characters not allowed in export file names
static NON_ALNUM_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Json => "application/json;charset=utf-8",
        }
    }
}

/// A finished export, ready to be written wherever the caller wants
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

/// Columns that take part in exports, in declared order
pub fn exportable_columns(columns: &[Column]) -> Vec<&Column> {
    declared_columns(columns)
        .into_iter()
        .filter(|c| c.exportable)
        .collect()
}

/// Encode one value as a CSV field
fn encode_cell(value: &Value) -> String {
    let text = match value {
        Value::Null => return String::new(),
        Value::String(s) => s.clone(),
        Value::Date(d) => d.to_rfc3339_opts(SecondsFormat::Millis, true),
        other => other.to_json().to_string(),
    };

    if text.contains(DELIMITER) || text.contains(QUOTE) || text.contains('\n') || text.contains('\r')
    {
        let escaped = text.replace(QUOTE, "\"\"");
        format!("{}{}{}", QUOTE, escaped, QUOTE)
    } else {
        text
    }
}

/// CSV text: a header line of labels, then one line per row.
pub fn to_delimited_text(rows: &[&Row], columns: &[Column]) -> String {
    let columns = exportable_columns(columns);
    let separator = DELIMITER.to_string();

    let header = columns
        .iter()
        .map(|c| encode_cell(&Value::from(c.label())))
        .collect::<Vec<_>>()
        .join(&separator);

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(header);
    for row in rows {
        let line = columns
            .iter()
            .map(|c| encode_cell(&c.export_cell(row)))
            .collect::<Vec<_>>()
            .join(&separator);
        lines.push(line);
    }

    lines.join("\n")
}

/// Pretty-printed JSON array, one object per row keyed by field in column
/// order.
pub fn to_structured_text(rows: &[&Row], columns: &[Column]) -> String {
    let columns = exportable_columns(columns);

    let records: Vec<serde_json::Value> = rows
        .iter()
        .map(|row| {
            let record: serde_json::Map<String, serde_json::Value> = columns
                .iter()
                .map(|c| (c.export_key().to_string(), c.export_cell(row).to_json()))
                .collect();
            serde_json::Value::Object(record)
        })
        .collect();

    serde_json::to_string_pretty(&records).unwrap_or_else(|_| "[]".to_string())
}

/// File name from a title: lower-cased, non-alphanumeric runs collapsed to
/// `_`, trimmed. A blank title is replaced by the default before
/// sanitizing; a title that sanitizes to nothing uses the default verbatim.
pub fn build_file_name(title: &str, extension: &str) -> String {
    let title = if title.trim().is_empty() {
        DEFAULT_EXPORT_TITLE
    } else {
        title
    };

    let lowered = title.to_lowercase();
    let slug = NON_ALNUM_REGEX.replace_all(&lowered, "_");
    let slug = slug.trim_matches('_');

    let base = if slug.is_empty() {
        DEFAULT_EXPORT_TITLE
    } else {
        slug
    };

    format!("{}.{}", base, extension)
}

/// Export `rows` in `format`. Returns `None` when there is nothing to export.
pub fn export(
    rows: &[&Row],
    columns: &[Column],
    format: ExportFormat,
    title: &str,
) -> Option<ExportArtifact> {
    if rows.is_empty() || exportable_columns(columns).is_empty() {
        return None;
    }

    let contents = match format {
        ExportFormat::Csv => to_delimited_text(rows, columns),
        ExportFormat::Json => to_structured_text(rows, columns),
    };

    Some(ExportArtifact {
        file_name: build_file_name(title, format.extension()),
        mime_type: format.mime_type(),
        contents,
    })
}
