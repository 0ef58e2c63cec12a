//! SVG flamegraph generation.
//!
//! Writes a flamegraph.pl-compatible document straight into a sink:
//! - Header with canvas size and a script hook for interactivity
//! - One `<g>` (title, rect, text) per visible frame, parents before children
//! - Footer

use super::color::color_for;
use super::layout::{compute_layout, FrameRect};
use crate::aggregator::StackTree;
use crate::utils::config::{
    DEFAULT_WIDTH, FONT_FAMILY, FONT_SIZE, LETTER_WIDTH_RATIO, MIN_RECT_WIDTH, ROW_HEIGHT,
    TEXT_PAD_HEIGHT, TEXT_PAD_WIDTH,
};
use crate::utils::error::FlamegraphError;
use log::{debug, info};
use std::io::Write;

/// Flamegraph configuration
#[derive(Debug, Clone)]
pub struct FlamegraphConfig {
    pub width: usize,
    pub row_height: f64,
    pub min_width: f64,
    pub font_size: u32,
    pub font_family: String,
    pub text_pad_width: f64,
    pub text_pad_height: f64,
}

impl Default for FlamegraphConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            row_height: ROW_HEIGHT,
            min_width: MIN_RECT_WIDTH,
            font_size: FONT_SIZE,
            font_family: FONT_FAMILY.to_string(),
            text_pad_width: TEXT_PAD_WIDTH,
            text_pad_height: TEXT_PAD_HEIGHT,
        }
    }
}

impl FlamegraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_min_width(mut self, min_width: f64) -> Self {
        self.min_width = min_width;
        self
    }

    pub fn with_font(mut self, size: u32, family: impl Into<String>) -> Self {
        self.font_size = size;
        self.font_family = family.into();
        self
    }

    /// Average width of one character of label text
    pub fn letter_width(&self) -> f64 {
        LETTER_WIDTH_RATIO * f64::from(self.font_size)
    }
}

/// Render `tree` as an SVG flamegraph into `out`
///
/// **Public** - main entry point for flamegraph output
///
/// An empty tree still produces a complete document, without frames.
///
/// # Errors
/// * `FlamegraphError::IoError` - the sink rejected a write
pub fn generate_flamegraph<W: Write>(
    tree: &StackTree,
    config: &FlamegraphConfig,
    out: &mut W,
) -> Result<(), FlamegraphError> {
    let layout = compute_layout(tree, config);
    info!(
        "Rendering flamegraph: {} samples, {} visible frames",
        layout.total_weight,
        layout.rects.len()
    );

    write_header(out, layout.width, layout.height)?;
    write_script_hook(out)?;
    for rect in &layout.rects {
        write_frame(out, rect, layout.total_weight, config)?;
    }
    write_footer(out)?;

    Ok(())
}

/// Render `tree` into a string
pub fn generate_flamegraph_string(
    tree: &StackTree,
    config: &FlamegraphConfig,
) -> Result<String, FlamegraphError> {
    let mut buf = Vec::new();
    generate_flamegraph(tree, config, &mut buf)?;
    debug!("Flamegraph generated ({} bytes)", buf.len());
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_header<W: Write>(out: &mut W, width: f64, height: f64) -> Result<(), FlamegraphError> {
    writeln!(out, r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>"#)?;
    writeln!(
        out,
        r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">"#
    )?;
    writeln!(
        out,
        r#"<svg version="1.1" width="{w}" height="{h}" onload="init(evt)" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">"#,
        w = width,
        h = height
    )?;
    writeln!(
        out,
        "<!-- Flame graph stack visualization. See https://github.com/brendangregg/FlameGraph for latest version, and http://www.brendangregg.com/flamegraphs.html for examples. -->"
    )?;
    Ok(())
}

/// Handlers referenced by the `<svg>` and `<g>` elements.
///
/// They are intentionally empty: zoom-to-subtree, hover highlighting and
/// search go here.
fn write_script_hook<W: Write>(out: &mut W) -> Result<(), FlamegraphError> {
    writeln!(out, r#"<script type="text/ecmascript"><![CDATA["#)?;
    writeln!(out, "function init(evt) {{}}")?;
    writeln!(out, "function s(info) {{}}")?;
    writeln!(out, "function c() {{}}")?;
    writeln!(out, "function zoom(node) {{}}")?;
    writeln!(out, "]]></script>")?;
    Ok(())
}

fn write_frame<W: Write>(
    out: &mut W,
    rect: &FrameRect<'_>,
    total_weight: u64,
    config: &FlamegraphConfig,
) -> Result<(), FlamegraphError> {
    let node = rect.node;
    let label = display_label(node.frame(), node.weight(), total_weight);
    let escaped = escape_xml(&label);
    let script_arg = escape_xml(&escape_js_string(&label));

    let text_width = rect.width - 2.0 * config.text_pad_width;
    let shown = fit_text(&label, text_capacity(text_width, config.letter_width()));

    let text_x = rect.x + config.text_pad_width;
    let text_y = rect.y + (config.row_height - config.text_pad_height);

    writeln!(
        out,
        r#"<g class="func_g" onmouseover="s('{}')" onmouseout="c()" onclick="zoom(this)">"#,
        script_arg
    )?;
    writeln!(out, "<title>{}</title>", escaped)?;
    writeln!(
        out,
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" rx="2" ry="2" />"#,
        rect.x,
        rect.y,
        rect.width,
        config.row_height,
        color_for(node.frame())
    )?;
    writeln!(
        out,
        r#"<text text-anchor="start" x="{:.2}" y="{:.2}" font-size="{}" font-family="{}" fill="rgb(0,0,0)">{}</text>"#,
        text_x,
        text_y,
        config.font_size,
        escape_xml(&config.font_family),
        escape_xml(&shown)
    )?;
    writeln!(out, "</g>")?;
    Ok(())
}

fn write_footer<W: Write>(out: &mut W) -> Result<(), FlamegraphError> {
    writeln!(out, "</svg>")?;
    Ok(())
}

/// Tooltip text of a frame: `frame (N samples, P.PP%)`
pub fn display_label(frame: &str, weight: u64, total_weight: u64) -> String {
    let percentage = if total_weight > 0 {
        weight as f64 * 100.0 / total_weight as f64
    } else {
        0.0
    };
    format!("{} ({} samples, {:.2}%)", frame, weight, percentage)
}

/// Number of characters that fit in `text_width` pixels
pub fn text_capacity(text_width: f64, letter_width: f64) -> usize {
    if letter_width <= 0.0 || text_width <= 0.0 {
        return 0;
    }
    (text_width / letter_width).floor() as usize
}

/// Label text shown inside a frame of the given character capacity
///
/// Nothing fits in 3 characters or less; longer labels are cut to
/// `capacity` characters ending in `...`.
pub fn fit_text(label: &str, capacity: usize) -> String {
    if capacity <= 3 {
        return String::new();
    }

    if capacity < label.chars().count() {
        let mut shown: String = label.chars().take(capacity - 3).collect();
        shown.push_str("...");
        shown
    } else {
        label.to_string()
    }
}

/// Escape the XML-reserved characters `& < > "`
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escape `\` and `'` for a single-quoted JavaScript string
///
/// Attribute values are entity-decoded before the script sees them, so
/// this runs before `escape_xml`.
pub fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_js_string() {
        assert_eq!(escape_js_string("it's"), r"it\'s");
        assert_eq!(escape_js_string(r"a\b"), r"a\\b");
        assert_eq!(escape_js_string(r"\'"), r"\\\'");
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("app!main", 1, 3), "app!main (1 samples, 33.33%)");
        assert_eq!(display_label("ROOT", 3, 3), "ROOT (3 samples, 100.00%)");
        assert_eq!(display_label("ROOT", 0, 0), "ROOT (0 samples, 0.00%)");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(
            escape_xml(r#"std::vector<int>::push_back&"x""#),
            "std::vector&lt;int&gt;::push_back&amp;&quot;x&quot;"
        );
        assert_eq!(escape_xml("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_text_capacity() {
        let letter = FlamegraphConfig::new().letter_width();
        assert!((letter - 7.08).abs() < 1e-9);
        assert_eq!(text_capacity(71.0, letter), 10);
        assert_eq!(text_capacity(7.0, letter), 0);
        assert_eq!(text_capacity(-4.0, letter), 0);
    }

    #[test]
    fn test_fit_text() {
        assert_eq!(fit_text("abcdef", 3), "");
        assert_eq!(fit_text("abcdef", 0), "");
        assert_eq!(fit_text("abcdef", 4), "a...");
        assert_eq!(fit_text("abcdef", 6), "abcdef");
        assert_eq!(fit_text("abcdef", 60), "abcdef");

        let cut = fit_text("very_long_function_name", 10);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 10);
    }

    #[test]
    fn test_fit_text_counts_characters() {
        assert_eq!(fit_text("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_config_builder() {
        let config = FlamegraphConfig::new()
            .with_width(800)
            .with_min_width(0.5)
            .with_font(10, "monospace");

        assert_eq!(config.width, 800);
        assert_eq!(config.min_width, 0.5);
        assert_eq!(config.font_family, "monospace");
        assert_eq!(config.row_height, 20.0);
    }
}
