//! Column declarations

use super::value::{Row, Value};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Derives a cell value from the whole row
pub type ValueGetter = Arc<dyn Fn(&Row) -> Value + Send + Sync>;

/// Maps a raw cell value to the value written by exports
pub type ExportValue = Arc<dyn Fn(&Value, &Row) -> Value + Send + Sync>;

/// Horizontal cell alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

fn default_true() -> bool {
    true
}

/// A column declaration.
///
/// A column with an empty `field` is a configuration error and is ignored
/// everywhere.
#[derive(Clone, Deserialize)]
pub struct Column {
    #[serde(default)]
    pub field: String,
    #[serde(default, alias = "label")]
    pub header_label: String,
    #[serde(default = "default_true")]
    pub sortable: bool,
    #[serde(default = "default_true")]
    pub exportable: bool,
    #[serde(default)]
    pub align: Align,
    #[serde(default)]
    pub width: Option<u16>,
    #[serde(skip)]
    value_getter: Option<ValueGetter>,
    #[serde(skip)]
    export_value: Option<ExportValue>,
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("field", &self.field)
            .field("header_label", &self.header_label)
            .field("sortable", &self.sortable)
            .field("exportable", &self.exportable)
            .field("align", &self.align)
            .field("width", &self.width)
            .field("value_getter", &self.value_getter.is_some())
            .field("export_value", &self.export_value.is_some())
            .finish()
    }
}

impl Column {
    pub fn new(field: impl Into<String>, header_label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            header_label: header_label.into(),
            sortable: true,
            exportable: true,
            align: Align::Left,
            width: None,
            value_getter: None,
            export_value: None,
        }
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn exportable(mut self, exportable: bool) -> Self {
        self.exportable = exportable;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn value_getter<F>(mut self, getter: F) -> Self
    where
        F: Fn(&Row) -> Value + Send + Sync + 'static,
    {
        self.value_getter = Some(Arc::new(getter));
        self
    }

    pub fn export_value<F>(mut self, export: F) -> Self
    where
        F: Fn(&Value, &Row) -> Value + Send + Sync + 'static,
    {
        self.export_value = Some(Arc::new(export));
        self
    }

    /// Whether the column has a usable field id
    pub fn is_declared(&self) -> bool {
        !self.field.is_empty()
    }

    /// Label shown in headers, falling back to the field id
    pub fn label(&self) -> &str {
        if self.header_label.is_empty() {
            &self.field
        } else {
            &self.header_label
        }
    }

    /// Cell value: `value_getter(row)` if declared, else `row[field]`.
    pub fn cell_value(&self, row: &Row) -> Value {
        match &self.value_getter {
            Some(getter) => getter(row),
            None => row.value(&self.field).clone(),
        }
    }

    /// Value written by exports.
    ///
    /// Resolution order: `export_value(raw, row)`, then `value_getter(row)`,
    /// then the raw `row[field]`.
    pub fn export_cell(&self, row: &Row) -> Value {
        let raw = row.value(&self.field);
        if let Some(export) = &self.export_value {
            return export(raw, row);
        }
        if let Some(getter) = &self.value_getter {
            return getter(row);
        }
        raw.clone()
    }

    /// Key used for structured export records
    pub fn export_key(&self) -> &str {
        if self.field.is_empty() {
            &self.header_label
        } else {
            &self.field
        }
    }
}

/// Columns with a usable, unique field id, in declared order.
///
/// Later duplicates of a field are dropped.
pub fn declared_columns(columns: &[Column]) -> Vec<&Column> {
    let mut seen = HashSet::new();
    columns
        .iter()
        .filter(|c| c.is_declared() && seen.insert(c.field.as_str()))
        .collect()
}
