use crate::flamegraph::FlamegraphConfig;
use std::path::PathBuf;

/// Arguments for the flamegraph command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct FlamegraphArgs {
    /// Sample file (JSON or folded text)
    pub input: PathBuf,

    /// Output path for the SVG (stdout when None)
    pub output: Option<PathBuf>,

    /// Stop aggregating after this many samples
    pub max_samples: Option<usize>,

    /// Flamegraph configuration
    pub config: FlamegraphConfig,
}

impl Default for FlamegraphArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("samples.json"),
            output: None,
            max_samples: None,
            config: FlamegraphConfig::default(),
        }
    }
}

/// Arguments for the fold command
#[derive(Debug, Clone)]
pub struct FoldArgs {
    /// Sample file (JSON or folded text)
    pub input: PathBuf,

    /// Output path for folded stacks (stdout when None)
    pub output: Option<PathBuf>,

    /// Keep kernel frames instead of dropping them
    pub keep_kernel: bool,
}

/// Arguments for the dump command
#[derive(Debug, Clone)]
pub struct DumpArgs {
    /// Sample file (JSON or folded text)
    pub input: PathBuf,
}
