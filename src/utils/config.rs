//! Configuration and constants for flamegraph rendering and folding.

/// Label of the synthetic node that represents all samples
pub const ROOT_LABEL: &str = "ROOT";

/// Default canvas width in pixels
pub const DEFAULT_WIDTH: usize = 1024;

/// Height of one stack depth row
pub const ROW_HEIGHT: f64 = 20.0;

pub const FONT_SIZE: u32 = 12;
pub const FONT_FAMILY: &str = "Verdana";

/// Frames narrower than this are not drawn (their width is still reserved)
pub const MIN_RECT_WIDTH: f64 = 1.0;

// Text placement inside a frame rectangle
pub const TEXT_PAD_WIDTH: f64 = 2.0;
pub const TEXT_PAD_HEIGHT: f64 = 5.0;

/// Average glyph width as a fraction of the font size
pub const LETTER_WIDTH_RATIO: f64 = 0.59;

// Kernel frames dropped from folded output by default
pub const KERNEL_MODULE_SUFFIX: &str = ".sys";
pub const KERNEL_MODULE_NAMES: &[&str] = &["hal", "ntoskrnl"];

/// Module placeholder used when a frame's module is unknown
pub const UNKNOWN_MODULE: &str = "?";

/// Tree dump hides nodes lighter than root weight / this divisor (5%)
pub const DUMP_MIN_WEIGHT_DIVISOR: u64 = 20;
