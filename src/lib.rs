//! Stackflame
//!
//! Aggregate sampled call stacks into a weighted call tree and render it
//! as an SVG flamegraph, or export it as folded stack text.
//!
//! This crate provides the core implementation for the
//! `stackflame` CLI tool.
//!
//! ## Getting Started
//!
//! ```no_run
//! use stackflame::aggregator::StackTree;
//! use stackflame::flamegraph::{generate_flamegraph, FlamegraphConfig};
//!
//! let samples = vec![
//!     vec!["app!main", "app!parse"],
//!     vec!["app!main", "app!eval"],
//! ];
//! let tree = StackTree::from_samples(&samples);
//!
//! let mut svg = Vec::new();
//! generate_flamegraph(&tree, &FlamegraphConfig::default(), &mut svg)?;
//! # Ok::<(), stackflame::utils::FlamegraphError>(())
//! ```
//!
//! Folded output for flamegraph.pl or inferno:
//!
//! ```bash
//! stackflame fold --input samples.json
//! ```

pub mod aggregator;
pub mod commands;
pub mod flamegraph;
pub mod output;
pub mod parser;
pub mod utils;
