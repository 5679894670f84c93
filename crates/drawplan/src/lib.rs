//! Command-line front end for the drawplan withdrawal planner
//!
//! Loads the tax reference table, parses arguments, runs one planning
//! command against `drawplan_core` and renders the result as text or JSON.

// ============================================================================
// Front-end modules
// ============================================================================

pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;
pub mod reference;
pub mod util;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use cli::{Args, Command, OutputFormat};
pub use commands::execute;
pub use logging::init_logging;
pub use reference::{default_data_dir, load_reference_data};
