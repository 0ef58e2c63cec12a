//! Flamegraph geometry.
//!
//! Each frame gets a width proportional to its weight and a row given by
//! its depth (root on row 0). Children are packed left to right in tree
//! order, starting at their parent's left edge.
//!
//! Frames narrower than the minimum width are dropped with their subtrees,
//! but the space they would have taken stays reserved, so siblings to the
//! right keep their exact proportional positions.

use super::generator::FlamegraphConfig;
use crate::aggregator::{StackTree, StackTreeNode};
use log::debug;

/// Placement of one visible frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRect<'a> {
    pub node: &'a StackTreeNode,
    pub depth: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

/// Geometry of a whole flamegraph
#[derive(Debug, Clone)]
pub struct FlameLayout<'a> {
    /// Visible frames in depth-first pre-order
    pub rects: Vec<FrameRect<'a>>,

    /// Canvas width in pixels
    pub width: f64,

    /// Canvas height: one row per frame of the deepest sample
    pub height: f64,

    /// Root weight the widths are relative to
    pub total_weight: u64,
}

/// Width of a frame of `weight` samples on a canvas of `canvas_width`
///
/// Zero when there are no samples at all.
pub fn frame_width(weight: u64, total_weight: u64, canvas_width: f64) -> f64 {
    if total_weight == 0 {
        return 0.0;
    }
    weight as f64 / total_weight as f64 * canvas_width
}

/// Lay out every visible frame of `tree`
///
/// **Public** - used by the SVG generator
pub fn compute_layout<'a>(tree: &'a StackTree, config: &FlamegraphConfig) -> FlameLayout<'a> {
    let total_weight = tree.total_weight();
    let canvas_width = config.width as f64;
    // ROOT takes row 0, so the deepest frames start at `height` and fall
    // one row outside this canvas.
    let height = tree.max_depth() as f64 * config.row_height;

    let mut rects = Vec::new();

    if total_weight > 0 {
        // (node, depth, x); children pushed in reverse so the leftmost pops first
        let mut pending: Vec<(&StackTreeNode, usize, f64)> = vec![(tree.root(), 0, 0.0)];

        while let Some((node, depth, x)) = pending.pop() {
            let width = frame_width(node.weight(), total_weight, canvas_width);
            if width < config.min_width {
                continue;
            }

            rects.push(FrameRect {
                node,
                depth,
                x,
                y: depth as f64 * config.row_height,
                width,
            });

            let mut child_x = x;
            let children: Vec<_> = node
                .children()
                .iter()
                .map(|child| {
                    let placed = (child, depth + 1, child_x);
                    child_x += frame_width(child.weight(), total_weight, canvas_width);
                    placed
                })
                .collect();
            pending.extend(children.into_iter().rev());
        }
    }

    debug!(
        "Laid out {} visible frames on a {}x{} canvas",
        rects.len(),
        canvas_width,
        height
    );

    FlameLayout {
        rects,
        width: canvas_width,
        height,
        total_weight,
    }
}
