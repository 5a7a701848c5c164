//! CLI command handling module
//!
//! Handles argument parsing and the top-level commands.

mod args;
mod commands;
mod logging;

pub use args::Args;
pub use commands::{list_kinds, run_lineage};
pub use logging::*;
