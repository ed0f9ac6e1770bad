//! Services the viewer uses outside the terminal
//!
//! - Data file loading and typing
//! - Background loading
//! - Writing export artifacts

pub mod export_writer;
pub mod job_runner;
pub mod loader;

pub use export_writer::write_artifact;
pub use job_runner::{LoadMessage, LoadRunner};
pub use loader::{infer_facets, load_file};
