//! Model layer - viewer state that is not table state
//!
//! - `ModalStack` - dialog overlay management
//! - `InputMode` / `StatusMessage` - presentation state

pub mod modal;
pub mod ui;

pub use modal::{Modal, ModalStack};
pub use ui::{InputMode, StatusMessage};
