//! Flamegraph command implementation.
//!
//! The flamegraph command:
//! 1. Loads samples
//! 2. Builds the stack tree
//! 3. Renders the SVG into the output sink

use super::models::FlamegraphArgs;
use super::utils::{load_input, validate_input};
use crate::aggregator::{IngestBudget, StackTreeBuilder};
use crate::flamegraph::generate_flamegraph;
use crate::output::create_writer;
use anyhow::{Context, Result};
use log::{debug, info};
use std::io::Write;
use std::time::Instant;

/// Execute the flamegraph command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Missing or malformed sample file
/// * Output path cannot be written
pub fn execute_flamegraph(args: FlamegraphArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Step 1/3: Loading samples from {}...", args.input.display());
    let samples = load_input(&args.input)?;

    info!("Step 2/3: Building stack tree...");
    let mut builder = StackTreeBuilder::new();
    let mut budget = IngestBudget::new();
    if let Some(max_samples) = args.max_samples {
        budget = budget.with_max_samples(max_samples);
    }
    let summary = builder.ingest_with_budget(samples.iter(), budget);
    let tree = builder.finish();

    info!(
        "Built stack tree in {} ms ({} samples, max depth {})",
        start_time.elapsed().as_millis(),
        summary.ingested,
        tree.max_depth()
    );

    info!("Step 3/3: Rendering flamegraph...");
    let mut writer = create_writer(args.output.as_deref())
        .context("Failed to open flamegraph output")?;
    generate_flamegraph(&tree, &args.config, &mut writer)
        .context("Failed to generate flamegraph")?;
    writer.flush().context("Failed to write flamegraph")?;

    if let Some(path) = &args.output {
        info!("✓ Flamegraph written to: {}", path.display());
    }

    debug!("Flamegraph completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(())
}

/// Validate flamegraph arguments
///
/// **Public** - can be called before execute_flamegraph for early validation
pub fn validate_args(args: &FlamegraphArgs) -> Result<()> {
    validate_input(&args.input)?;

    if args.config.width == 0 {
        anyhow::bail!("width must be greater than 0");
    }

    if args.config.min_width.is_nan() || args.config.min_width < 0.0 {
        anyhow::bail!("min width must be a non-negative number");
    }

    if args.max_samples == Some(0) {
        anyhow::bail!("max samples must be greater than 0");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args_with_input() -> (tempfile::TempDir, FlamegraphArgs) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("samples.json");
        std::fs::write(&input, r#"[["app!main", "app!run"], ["app!main"]]"#).unwrap();
        let args = FlamegraphArgs {
            input,
            ..Default::default()
        };
        (dir, args)
    }

    #[test]
    fn test_validate_args_valid() {
        let (_dir, args) = args_with_input();
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_missing_input() {
        let args = FlamegraphArgs {
            input: PathBuf::from("does/not/exist.json"),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_zero_width() {
        let (_dir, mut args) = args_with_input();
        args.config.width = 0;
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_negative_min_width() {
        let (_dir, mut args) = args_with_input();
        args.config.min_width = -1.0;
        assert!(validate_args(&args).is_err());

        args.config.min_width = f64::NAN;
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_zero_max_samples() {
        let (_dir, mut args) = args_with_input();
        args.max_samples = Some(0);
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_execute_writes_svg() {
        let (dir, mut args) = args_with_input();
        let output = dir.path().join("out/flamegraph.svg");
        args.output = Some(output.clone());

        execute_flamegraph(args).unwrap();

        let svg = std::fs::read_to_string(output).unwrap();
        assert!(svg.contains("app!main (2 samples, 100.00%)"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_execute_huge_folded_count_with_budget() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("samples.folded");
        std::fs::write(&input, "a 4000000000\n").unwrap();
        let output = dir.path().join("flamegraph.svg");

        let start = Instant::now();
        execute_flamegraph(FlamegraphArgs {
            input,
            output: Some(output.clone()),
            max_samples: Some(1),
            ..Default::default()
        })
        .unwrap();
        assert!(start.elapsed().as_secs() < 10);

        let svg = std::fs::read_to_string(output).unwrap();
        assert!(svg.contains("<title>ROOT (1 samples, 100.00%)</title>"));
        assert!(svg.contains("<title>a (1 samples, 100.00%)</title>"));
    }
}
