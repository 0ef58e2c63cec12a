//! Sample file decoding.
//!
//! Two formats are accepted:
//! - JSON (`.json`): `[[frame, ...], ...]` or `{"samples": [[frame, ...], ...]}`,
//!   where a frame is a label string or `{"module", "symbol", "address"}`
//! - Folded text (anything else): `a;b;c 12` lines, each standing for 12 samples
//!
//! Repeated stacks are kept once with their count and only expanded while
//! iterating, so memory follows the file size rather than the sample count.

use super::frame::frame_label;
use crate::utils::error::ParseError;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::iter;
use std::path::Path;

/// One sample: frame labels, root first
pub type Sample = Vec<String>;

/// Decoded sample file: unique stacks in file order, each with its count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleSet {
    stacks: Vec<(Sample, u64)>,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `count` samples of `stack`
    pub fn push(&mut self, stack: Sample, count: u64) {
        if count > 0 {
            self.stacks.push((stack, count));
        }
    }

    /// Every sample in file order, repeated stacks expanded on the fly
    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.stacks.iter().flat_map(|(stack, count)| {
            iter::repeat(stack).take(usize::try_from(*count).unwrap_or(usize::MAX))
        })
    }

    /// `(stack, count)` pairs in file order
    pub fn counted(&self) -> impl Iterator<Item = (&Sample, u64)> + '_ {
        self.stacks.iter().map(|(stack, count)| (stack, *count))
    }

    /// Total number of samples
    pub fn sample_count(&self) -> u64 {
        self.stacks.iter().map(|(_, count)| count).sum()
    }

    /// Number of stored stack entries
    pub fn stack_count(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}

impl FromIterator<Sample> for SampleSet {
    fn from_iter<T: IntoIterator<Item = Sample>>(samples: T) -> Self {
        let mut set = SampleSet::new();
        for sample in samples {
            set.push(sample, 1);
        }
        set
    }
}

/// Frame as it appears in a JSON sample file
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawFrame {
    Label(String),
    Resolved {
        #[serde(default)]
        module: Option<String>,
        #[serde(default)]
        symbol: Option<String>,
        #[serde(default)]
        address: u64,
    },
}

impl RawFrame {
    fn into_label(self) -> String {
        match self {
            RawFrame::Label(label) => label,
            RawFrame::Resolved {
                module,
                symbol,
                address,
            } => frame_label(module.as_deref(), symbol.as_deref(), address),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SampleFile {
    Wrapped { samples: Vec<Vec<RawFrame>> },
    Bare(Vec<Vec<RawFrame>>),
}

/// Load samples from a file, choosing the format by extension
///
/// **Public** - main entry point for CLI input
///
/// # Errors
/// * `ParseError::Io` - File cannot be read
/// * `ParseError::JsonError` - Invalid JSON sample file
/// * `ParseError::InvalidFormat` - Malformed folded line
pub fn load_samples(path: impl AsRef<Path>) -> Result<SampleSet, ParseError> {
    let path = path.as_ref();
    debug!("Reading samples from: {}", path.display());

    let content = fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let samples = if is_json {
        parse_json_samples(&content)?
    } else {
        parse_folded_samples(&content)?
    };

    debug!(
        "Loaded {} samples ({} stacks)",
        samples.sample_count(),
        samples.stack_count()
    );
    Ok(samples)
}

/// Parse a JSON sample document
pub fn parse_json_samples(content: &str) -> Result<SampleSet, ParseError> {
    let raw = match serde_json::from_str(content)? {
        SampleFile::Wrapped { samples } => samples,
        SampleFile::Bare(samples) => samples,
    };

    Ok(raw
        .into_iter()
        .map(|sample| sample.into_iter().map(RawFrame::into_label).collect::<Sample>())
        .collect())
}

/// Parse folded stack text, keeping each stack once with its count
///
/// Blank lines are skipped. An empty stack (line ` 3`) yields empty samples.
pub fn parse_folded_samples(content: &str) -> Result<SampleSet, ParseError> {
    let mut samples = SampleSet::new();

    for (number, line) in content.lines().enumerate() {
        let line = line.trim_end();
        if line.trim_start().is_empty() {
            continue;
        }

        let (stack, count) = line
            .rsplit_once(' ')
            .and_then(|(stack, count)| count.parse::<u64>().ok().map(|count| (stack, count)))
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "line {}: expected `frame;frame;... count`",
                    number + 1
                ))
            })?;

        let frames: Sample = if stack.is_empty() {
            Vec::new()
        } else {
            stack.split(';').map(str::to_string).collect()
        };

        samples.push(frames, count);
    }

    Ok(samples)
}
