//! Output writers for flamegraphs and folded stacks.
//!
//! This module handles where rendered data goes:
//! - SVG flamegraph files
//! - Folded stack text files
//! - stdout when no path is given

pub mod sink;

// Re-export main functions
pub use sink::create_writer;

use crate::utils::error::OutputError;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
