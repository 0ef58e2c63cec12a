//! Dump command implementation.
//!
//! Prints the heavier part of the stack tree as indented `weight frame`
//! lines, a quick text view when no SVG viewer is at hand.

use super::models::DumpArgs;
use super::utils::{load_input, validate_input};
use crate::aggregator::StackTree;
use crate::output::create_writer;
use anyhow::{Context, Result};
use std::io::Write;

/// Execute the dump command
///
/// **Public** - main entry point called from main.rs
pub fn execute_dump(args: DumpArgs) -> Result<()> {
    validate_input(&args.input)?;

    let samples = load_input(&args.input)?;
    let tree = StackTree::from_samples(samples.iter());

    let mut writer = create_writer(None).context("Failed to open stdout")?;
    tree.dump(&mut writer).context("Failed to write tree dump")?;
    writer.flush().context("Failed to write tree dump")?;

    Ok(())
}
