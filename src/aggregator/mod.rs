//! Aggregation of samples into a call tree and folded stacks.
//!
//! This module transforms samples into:
//! - A weighted call tree (for flamegraph rendering)
//! - Collapsed stack lines (for external flamegraph tooling)

pub mod folded;
pub mod stack_tree;

// Re-export main types and functions
pub use folded::{fold_counted_stacks, fold_stacks, write_folded, FoldedStack};
pub use stack_tree::{
    ChildMap, IngestBudget, IngestSummary, StackTree, StackTreeBuilder, StackTreeNode,
};
