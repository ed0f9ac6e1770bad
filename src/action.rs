//! Action enum - everything the viewer can be asked to do
//!
//! Components turn key events into Actions; the App applies them to the
//! table view and its own presentation state.

use gridline::engine::{ExportFormat, Value};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick, used to poll the background loader
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,
    /// Re-read the data file
    Reload,

    // ─────────────────────────────────────────────────────────────────────────
    // Cursor and pages
    // ─────────────────────────────────────────────────────────────────────────
    NextRow,
    PrevRow,
    FirstRow,
    LastRow,
    NextColumn,
    PrevColumn,
    NextPage,
    PrevPage,
    CycleRowsPerPage,

    // ─────────────────────────────────────────────────────────────────────────
    // Table commands
    // ─────────────────────────────────────────────────────────────────────────
    /// Sort by the column under the column cursor
    SortByCursorColumn,
    ToggleRowSelection,
    ToggleSelectAll,
    ClearSelection,
    ToggleRowExpansion,
    Export(ExportFormat),

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────
    EnterSearchMode,
    ExitSearchMode,
    SearchInput(char),
    SearchBackspace,
    ClearSearch,

    // ─────────────────────────────────────────────────────────────────────────
    // Filters and columns
    // ─────────────────────────────────────────────────────────────────────────
    SetFilter(String, Value),
    ClearFilter(String),
    ClearAllFilters,
    ToggleColumn(String),
    ResetColumns,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    OpenQuitDialog,
    OpenFilterDialog,
    OpenColumnsDialog,
    OpenHelp,
    CloseModal,
    ModalUp,
    ModalDown,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::Reload => write!(f, "Reload"),
            Action::NextRow => write!(f, "NextRow"),
            Action::PrevRow => write!(f, "PrevRow"),
            Action::FirstRow => write!(f, "FirstRow"),
            Action::LastRow => write!(f, "LastRow"),
            Action::NextColumn => write!(f, "NextColumn"),
            Action::PrevColumn => write!(f, "PrevColumn"),
            Action::NextPage => write!(f, "NextPage"),
            Action::PrevPage => write!(f, "PrevPage"),
            Action::CycleRowsPerPage => write!(f, "CycleRowsPerPage"),
            Action::SortByCursorColumn => write!(f, "SortByCursorColumn"),
            Action::ToggleRowSelection => write!(f, "ToggleRowSelection"),
            Action::ToggleSelectAll => write!(f, "ToggleSelectAll"),
            Action::ClearSelection => write!(f, "ClearSelection"),
            Action::ToggleRowExpansion => write!(f, "ToggleRowExpansion"),
            Action::Export(format) => write!(f, "Export({})", format.extension()),
            Action::EnterSearchMode => write!(f, "EnterSearchMode"),
            Action::ExitSearchMode => write!(f, "ExitSearchMode"),
            Action::SearchInput(c) => write!(f, "SearchInput({})", c),
            Action::SearchBackspace => write!(f, "SearchBackspace"),
            Action::ClearSearch => write!(f, "ClearSearch"),
            Action::SetFilter(key, value) => write!(f, "SetFilter({}={})", key, value),
            Action::ClearFilter(key) => write!(f, "ClearFilter({})", key),
            Action::ClearAllFilters => write!(f, "ClearAllFilters"),
            Action::ToggleColumn(field) => write!(f, "ToggleColumn({})", field),
            Action::ResetColumns => write!(f, "ResetColumns"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenFilterDialog => write!(f, "OpenFilterDialog"),
            Action::OpenColumnsDialog => write!(f, "OpenColumnsDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ModalUp => write!(f, "ModalUp"),
            Action::ModalDown => write!(f, "ModalDown"),
        }
    }
}
