//! Selection tracking
//!
//! Holds the selected row ids. Every method that changes the selection
//! returns the new full id list when the caller should be notified.

use super::value::RowId;
use std::collections::BTreeSet;

/// Checked state of the page-level "select all" control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelection {
    None,
    Indeterminate,
    All,
}

impl PageSelection {
    pub fn symbol(&self) -> &'static str {
        match self {
            PageSelection::None => "[ ]",
            PageSelection::Indeterminate => "[-]",
            PageSelection::All => "[x]",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionTracker {
    selected: BTreeSet<RowId>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in ascending order
    pub fn ids(&self) -> Vec<RowId> {
        self.selected.iter().cloned().collect()
    }

    /// Add `id` if absent, remove it if present. Always notifies.
    pub fn toggle(&mut self, id: RowId) -> Vec<RowId> {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        self.ids()
    }

    /// Replace the selection with exactly the ids on the current page.
    pub fn select_all_visible(&mut self, page_ids: &[RowId]) -> Vec<RowId> {
        self.selected = page_ids.iter().cloned().collect();
        self.ids()
    }

    pub fn clear(&mut self) -> Vec<RowId> {
        self.selected.clear();
        Vec::new()
    }

    /// Drop ids missing from `valid_ids`. Returns the new list only when the
    /// selection actually shrank.
    pub fn reconcile(&mut self, valid_ids: &BTreeSet<RowId>) -> Option<Vec<RowId>> {
        let before = self.selected.len();
        self.selected.retain(|id| valid_ids.contains(id));
        if self.selected.len() < before {
            Some(self.ids())
        } else {
            None
        }
    }

    /// State of the page-level selector for the rows in `page_ids`
    pub fn page_state(&self, page_ids: &[RowId]) -> PageSelection {
        let selected_on_page = page_ids.iter().filter(|id| self.is_selected(id)).count();
        if !page_ids.is_empty() && selected_on_page == page_ids.len() {
            PageSelection::All
        } else if selected_on_page > 0 {
            PageSelection::Indeterminate
        } else {
            PageSelection::None
        }
    }
}
