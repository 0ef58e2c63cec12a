use crate::parser::{load_samples, SampleSet};
use anyhow::{Context, Result};
use log::info;
use std::path::Path;
use std::time::Instant;

/// Check that the sample file exists and is a file
pub fn validate_input(input: &Path) -> Result<()> {
    if input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if !input.is_file() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    Ok(())
}

/// Load the samples of `input`, logging how long it took
///
/// Repeated stacks stay compact; callers expand them lazily.
pub fn load_input(input: &Path) -> Result<SampleSet> {
    let start = Instant::now();

    let samples = load_samples(input)
        .with_context(|| format!("Failed to load samples from {}", input.display()))?;

    info!(
        "Loaded {} samples in {} ms",
        samples.sample_count(),
        start.elapsed().as_millis()
    );

    Ok(samples)
}
