//! Sample input and frame label handling.
//!
//! This module handles:
//! - Building canonical frame labels (with fallbacks for unresolved frames)
//! - Extracting module identity for frame filtering
//! - Reading sample files for the CLI

pub mod frame;
pub mod samples;

// Re-export main types
pub use frame::{frame_label, is_kernel_module, keep_all, module_of};
pub use samples::{load_samples, parse_folded_samples, parse_json_samples, Sample, SampleSet};
