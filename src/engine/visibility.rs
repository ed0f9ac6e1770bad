//! Column visibility
//!
//! At least one declared column always stays visible.

use super::column::{declared_columns, Column};
use log::debug;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnVisibility {
    hidden: BTreeSet<String>,
}

impl ColumnVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a hidden set, keeping only fields that exist and never hiding
    /// every column.
    pub fn restore(hidden: impl IntoIterator<Item = String>, columns: &[Column]) -> Self {
        let mut visibility = Self::new();
        for field in hidden {
            visibility.hide(&field, columns);
        }
        visibility
    }

    pub fn is_hidden(&self, field: &str) -> bool {
        self.hidden.contains(field)
    }

    pub fn hidden(&self) -> impl Iterator<Item = &String> {
        self.hidden.iter()
    }

    /// Hide `field`. Hiding an unknown field or the last visible column is
    /// rejected; returns whether anything changed.
    pub fn hide(&mut self, field: &str, columns: &[Column]) -> bool {
        let declared = declared_columns(columns);
        if !declared.iter().any(|c| c.field == field) || self.hidden.contains(field) {
            return false;
        }

        let visible = declared.iter().filter(|c| !self.is_hidden(&c.field)).count();
        if visible <= 1 {
            debug!("Refusing to hide last visible column '{}'", field);
            return false;
        }

        self.hidden.insert(field.to_string())
    }

    pub fn show(&mut self, field: &str) -> bool {
        self.hidden.remove(field)
    }

    pub fn toggle(&mut self, field: &str, columns: &[Column]) -> bool {
        if self.is_hidden(field) {
            self.show(field)
        } else {
            self.hide(field, columns)
        }
    }

    pub fn reset(&mut self) -> bool {
        let changed = !self.hidden.is_empty();
        self.hidden.clear();
        changed
    }

    /// Drop entries for columns that no longer exist. If the declarations
    /// changed so that every remaining column is hidden, everything is shown.
    pub fn prune(&mut self, columns: &[Column]) -> bool {
        let declared = declared_columns(columns);
        let before = self.hidden.clone();

        self.hidden
            .retain(|field| declared.iter().any(|c| &c.field == field));
        if !declared.is_empty() && self.hidden.len() >= declared.len() {
            self.hidden.clear();
        }

        self.hidden != before
    }

    /// Declared columns that are not hidden, in declared order
    pub fn visible_columns<'a>(&self, columns: &'a [Column]) -> Vec<&'a Column> {
        declared_columns(columns)
            .into_iter()
            .filter(|c| !self.is_hidden(&c.field))
            .collect()
    }
}
