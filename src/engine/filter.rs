//! Facet filtering and free-text search

use super::column::Column;
use super::value::{Row, Value};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Active facet selections: facet key to the single selected value
pub type ActiveFilters = BTreeMap<String, Value>;

/// One selectable value of a facet
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FacetOption {
    pub value: Value,
    #[serde(default)]
    pub label: String,
}

impl FacetOption {
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    pub fn display_label(&self) -> String {
        if self.label.is_empty() {
            self.value.to_display_string()
        } else {
            self.label.clone()
        }
    }
}

/// A named filter dimension with a finite set of options
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FilterFacet {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub options: Vec<FacetOption>,
}

impl FilterFacet {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            options: Vec::new(),
        }
    }

    pub fn option(mut self, value: impl Into<Value>, label: impl Into<String>) -> Self {
        self.options.push(FacetOption::new(value, label));
        self
    }
}

/// Whether `row` passes a single `key -> value` facet entry.
///
/// Absent or null attributes never pass. List attributes pass on membership,
/// string attributes on case-insensitive equality with the stringified
/// filter value, everything else on strict equality.
pub fn matches_facet(row: &Row, key: &str, value: &Value) -> bool {
    match row.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::List(items)) => items.contains(value),
        Some(Value::String(s)) => s.to_lowercase() == value.to_display_string().to_lowercase(),
        Some(other) => other == value,
    }
}

/// Whether `row` passes every active facet
pub fn matches_filters(row: &Row, filters: &ActiveFilters) -> bool {
    filters
        .iter()
        .all(|(key, value)| matches_facet(row, key, value))
}

/// Whether any searchable column's value contains the lower-cased `query`
pub fn matches_search(row: &Row, query: &str, searchable: &[&Column]) -> bool {
    if query.is_empty() {
        return true;
    }
    searchable.iter().any(|column| {
        column
            .cell_value(row)
            .to_display_string()
            .to_lowercase()
            .contains(query)
    })
}

/// Indices of rows passing the facet filters, then the search.
///
/// `searchable` is the visible column set, or every declared column when
/// nothing is visible; choosing it is the caller's job.
pub fn apply(
    rows: &[Row],
    filters: &ActiveFilters,
    search_query: &str,
    searchable: &[&Column],
) -> Vec<usize> {
    let query = search_query.to_lowercase();

    rows.iter()
        .enumerate()
        .filter(|(_, row)| matches_filters(row, filters))
        .filter(|(_, row)| matches_search(row, &query, searchable))
        .map(|(i, _)| i)
        .collect()
}
