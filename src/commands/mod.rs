//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod dump;
pub mod flamegraph;
pub mod fold;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use dump::execute_dump;
pub use flamegraph::{execute_flamegraph, validate_args};
pub use fold::execute_fold;
pub use models::{DumpArgs, FlamegraphArgs, FoldArgs};
