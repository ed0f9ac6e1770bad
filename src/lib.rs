//! gridline - a tabular data presentation engine
//!
//! The [`engine`] module is the reusable core: filtering, sorting,
//! pagination, selection, column visibility, persisted preferences and
//! export over caller-owned rows. The `gridline` binary is a terminal viewer
//! built on top of it.

pub mod engine;
