//! Output sinks for flamegraphs and folded stacks.
//!
//! Renderers write into any `std::io::Write`; this module opens the
//! buffered file (or stdout) the CLI hands them.

use super::validate_path;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Open a buffered writer on `output_path`, or on stdout when `None`
///
/// **Public** - main entry point for file output
///
/// Parent directories are created as needed. Callers must `flush` the
/// writer once done.
///
/// # Errors
/// * `OutputError::InvalidPath` - Path is empty, a directory, or its parent cannot be created
/// * `OutputError::WriteFailed` - File cannot be created
pub fn create_writer(output_path: Option<&Path>) -> Result<Box<dyn Write>, OutputError> {
    let Some(output_path) = output_path else {
        debug!("Writing to stdout");
        return Ok(Box::new(BufWriter::new(io::stdout())));
    };

    info!("Writing output to: {}", output_path.display());

    validate_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!("Cannot create directory: {}", e))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;

    Ok(Box::new(BufWriter::new(file)))
}
