//! UI Components
//!
//! Each component encapsulates its own presentation state, event handling,
//! and rendering. Components communicate through Actions.

pub mod columns_dialog;
pub mod filter_dialog;
pub mod help_dialog;
pub mod layout;
pub mod quit_dialog;
pub mod table;
pub mod toolbar;

pub use columns_dialog::ColumnsDialog;
pub use filter_dialog::FilterDialog;
pub use help_dialog::HelpDialog;
pub use layout::{calculate_main_layout, centered_popup};
pub use quit_dialog::QuitDialog;
pub use table::TableComponent;
pub use toolbar::{draw_footer, draw_help_bar, draw_status, draw_toolbar, ToolbarContext};
