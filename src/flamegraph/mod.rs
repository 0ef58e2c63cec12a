//! Flamegraph layout, coloring and SVG generation.
//!
//! This module converts a frozen stack tree into an SVG flamegraph.
//! Flamegraphs show where samples concentrate: one row per call depth,
//! one box per frame, box width proportional to sample count.

pub mod color;
pub mod generator;
pub mod layout;

// Re-export main types
pub use color::{color_for, Rgb};
pub use generator::{
    display_label, escape_js_string, escape_xml, fit_text, generate_flamegraph,
    generate_flamegraph_string, text_capacity, FlamegraphConfig,
};
pub use layout::{compute_layout, frame_width, FlameLayout, FrameRect};
