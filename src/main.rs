//! Stackflame CLI
//!
//! Turns sampled call stacks into SVG flamegraphs and folded stack text.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use stackflame::commands::{
    execute_dump, execute_flamegraph, execute_fold, validate_args, DumpArgs, FlamegraphArgs,
    FoldArgs,
};
use stackflame::flamegraph::FlamegraphConfig;
use stackflame::utils::config::{DEFAULT_WIDTH, MIN_RECT_WIDTH};

/// Stackflame - flamegraphs from sampled call stacks
#[derive(Parser, Debug)]
#[command(name = "stackflame")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Render samples as an SVG flamegraph
    Flamegraph {
        /// Sample file (.json, or folded text)
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the SVG (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Flamegraph width in pixels
        #[arg(long, env = "STACKFLAME_WIDTH", default_value_t = DEFAULT_WIDTH)]
        width: usize,

        /// Frames narrower than this many pixels are not drawn
        #[arg(long, default_value_t = MIN_RECT_WIDTH)]
        min_width: f64,

        /// Stop aggregating after this many samples
        #[arg(long)]
        max_samples: Option<usize>,
    },

    /// Write samples as folded stacks, heaviest first
    Fold {
        /// Sample file (.json, or folded text)
        #[arg(short, long)]
        input: PathBuf,

        /// Output path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep kernel frames (*.sys, hal, ntoskrnl)
        #[arg(long)]
        keep_kernel: bool,
    },

    /// Print the stack tree as indented text
    Dump {
        /// Sample file (.json, or folded text)
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Flamegraph {
            input,
            output,
            width,
            min_width,
            max_samples,
        } => {
            let args = FlamegraphArgs {
                input,
                output,
                max_samples,
                config: FlamegraphConfig::new()
                    .with_width(width)
                    .with_min_width(min_width),
            };

            // Validate args first
            validate_args(&args)?;

            execute_flamegraph(args)?;
        }

        Commands::Fold {
            input,
            output,
            keep_kernel,
        } => {
            execute_fold(FoldArgs {
                input,
                output,
                keep_kernel,
            })?;
        }

        Commands::Dump { input } => {
            execute_dump(DumpArgs { input })?;
        }
    }

    Ok(())
}
