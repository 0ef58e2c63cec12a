//! Fold command implementation.
//!
//! Writes samples as folded stacks (`a;b;c count`), heaviest first, for
//! flamegraph.pl and compatible tools. Kernel frames are dropped unless
//! asked to keep them.

use super::models::FoldArgs;
use super::utils::{load_input, validate_input};
use crate::aggregator::{fold_counted_stacks, write_folded};
use crate::output::create_writer;
use crate::parser::{is_kernel_module, keep_all};
use anyhow::{Context, Result};
use log::info;
use std::io::Write;

/// Execute the fold command
///
/// **Public** - main entry point called from main.rs
pub fn execute_fold(args: FoldArgs) -> Result<()> {
    validate_input(&args.input)?;

    let samples = load_input(&args.input)?;

    let stacks = if args.keep_kernel {
        fold_counted_stacks(samples.counted(), keep_all)
    } else {
        fold_counted_stacks(samples.counted(), is_kernel_module)
    };
    info!(
        "Folded {} samples into {} unique stacks",
        samples.sample_count(),
        stacks.len()
    );

    let mut writer =
        create_writer(args.output.as_deref()).context("Failed to open folded output")?;
    write_folded(&stacks, &mut writer).context("Failed to write folded stacks")?;
    writer.flush().context("Failed to write folded stacks")?;

    if let Some(path) = &args.output {
        info!("✓ Folded stacks written to: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_fold(keep_kernel: bool) -> String {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("samples.json");
        std::fs::write(
            &input,
            r#"[
                ["ntoskrnl!KiStartSystemThread", "app!main", "app!run"],
                ["app!main", "app!run"],
                ["app!main", "app!idle"]
            ]"#,
        )
        .unwrap();
        let output = dir.path().join("stacks.folded");

        execute_fold(FoldArgs {
            input,
            output: Some(output.clone()),
            keep_kernel,
        })
        .unwrap();

        std::fs::read_to_string(output).unwrap()
    }

    #[test]
    fn test_kernel_frames_filtered_by_default() {
        assert_eq!(run_fold(false), "app!main;app!run 2\napp!main;app!idle 1\n");
    }

    #[test]
    fn test_keep_kernel() {
        assert_eq!(
            run_fold(true),
            "ntoskrnl!KiStartSystemThread;app!main;app!run 1\napp!main;app!run 1\napp!main;app!idle 1\n"
        );
    }
}
