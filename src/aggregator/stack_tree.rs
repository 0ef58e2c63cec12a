//! Build a weighted call tree from sampled stacks.
//!
//! Every sample walks the tree from the root, adding one to the weight of
//! each node on its path. Samples sharing a prefix share the nodes of that
//! prefix. Recursive frames are not collapsed: `a;a;a` is three levels.
//!
//! Example: samples `[main, run, parse]`, `[main, run, eval]`, `[main, run, eval]`
//! produce `ROOT(3) -> main(3) -> run(3) -> {parse(1), eval(2)}`.
//!
//! The tree is built through [`StackTreeBuilder`], which holds the only
//! mutable handle, and frozen into a [`StackTree`] once ingestion is done.

use crate::utils::config::{DUMP_MIN_WEIGHT_DIVISOR, ROOT_LABEL};
use log::{debug, warn};
use std::collections::HashMap;
use std::io::{self, Write};
use std::slice;
use std::time::{Duration, Instant};

/// Children of a node, keyed by frame label, iterated in first-insertion order
///
/// **Public** - the insertion order is the left-to-right order of the flamegraph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildMap {
    nodes: Vec<StackTreeNode>,
    index: HashMap<String, usize>,
}

impl ChildMap {
    /// Look up a child by its frame label
    pub fn get(&self, frame: &str) -> Option<&StackTreeNode> {
        self.index.get(frame).map(|&i| &self.nodes[i])
    }

    pub fn iter(&self) -> slice::Iter<'_, StackTreeNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Return the child for `frame`, appending a zero-weight one if missing
    fn get_or_insert(&mut self, frame: &str) -> &mut StackTreeNode {
        let i = match self.index.get(frame) {
            Some(&i) => i,
            None => {
                let i = self.nodes.len();
                self.nodes.push(StackTreeNode::new(frame));
                self.index.insert(frame.to_string(), i);
                i
            }
        };
        &mut self.nodes[i]
    }
}

impl<'a> IntoIterator for &'a ChildMap {
    type Item = &'a StackTreeNode;
    type IntoIter = slice::Iter<'a, StackTreeNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One frame of the aggregated call tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackTreeNode {
    frame: String,
    weight: u64,
    children: ChildMap,
}

impl StackTreeNode {
    fn new(frame: &str) -> Self {
        Self {
            frame: frame.to_string(),
            weight: 0,
            children: ChildMap::default(),
        }
    }

    /// Frame label of this node
    pub fn frame(&self) -> &str {
        &self.frame
    }

    /// Number of samples passing through this node
    pub fn weight(&self) -> u64 {
        self.weight
    }

    pub fn children(&self) -> &ChildMap {
        &self.children
    }

    pub fn child(&self, frame: &str) -> Option<&StackTreeNode> {
        self.children.get(frame)
    }

    /// Samples that ended exactly at this node
    pub fn self_weight(&self) -> u64 {
        let children: u64 = self.children.iter().map(StackTreeNode::weight).sum();
        self.weight - children
    }
}

/// Limits for [`StackTreeBuilder::ingest_with_budget`]
///
/// **Public** - unlimited by default
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestBudget {
    /// Stop after this many samples
    pub max_samples: Option<usize>,

    /// Stop once this much wall-clock time has elapsed
    pub time_limit: Option<Duration>,
}

impl IngestBudget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = Some(max_samples);
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    fn is_exhausted(&self, ingested: usize, deadline: Option<Instant>) -> bool {
        self.max_samples.is_some_and(|max| ingested >= max)
            || deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Result of a budgeted ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    /// Samples added by this call
    pub ingested: usize,

    /// True when samples were left unread because the budget ran out
    pub truncated: bool,
}

/// Exclusive, mutable handle on a tree under construction
///
/// **Public** - main entry point for aggregation
#[derive(Debug, Clone)]
pub struct StackTreeBuilder {
    root: StackTreeNode,
    max_depth: usize,
}

impl Default for StackTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StackTreeBuilder {
    pub fn new() -> Self {
        Self {
            root: StackTreeNode::new(ROOT_LABEL),
            max_depth: 0,
        }
    }

    /// Add one sample, root frame first
    ///
    /// The whole path is updated before returning, so the tree satisfies
    /// its weight invariants between any two calls.
    pub fn add_sample<S, F>(&mut self, sample: S)
    where
        S: IntoIterator<Item = F>,
        F: AsRef<str>,
    {
        let mut node = &mut self.root;
        node.weight += 1;

        let mut depth = 0;
        for frame in sample {
            node = node.children.get_or_insert(frame.as_ref());
            node.weight += 1;
            depth += 1;
        }

        self.max_depth = self.max_depth.max(depth);
    }

    /// Add every sample of `samples`
    pub fn ingest<I, S, F>(&mut self, samples: I)
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = F>,
        F: AsRef<str>,
    {
        for sample in samples {
            self.add_sample(sample);
        }
    }

    /// Add samples until the input ends or `budget` runs out
    ///
    /// Stopping early leaves a smaller but complete tree.
    pub fn ingest_with_budget<I, S, F>(&mut self, samples: I, budget: IngestBudget) -> IngestSummary
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = F>,
        F: AsRef<str>,
    {
        let deadline = budget.time_limit.map(|limit| Instant::now() + limit);
        let mut samples = samples.into_iter().peekable();
        let mut ingested = 0;

        loop {
            if budget.is_exhausted(ingested, deadline) {
                let truncated = samples.peek().is_some();
                if truncated {
                    warn!(
                        "Ingestion budget exhausted after {} samples, remaining samples ignored",
                        ingested
                    );
                }
                return IngestSummary { ingested, truncated };
            }

            let Some(sample) = samples.next() else {
                break;
            };
            self.add_sample(sample);
            ingested += 1;
        }

        IngestSummary {
            ingested,
            truncated: false,
        }
    }

    /// Samples ingested so far
    pub fn sample_count(&self) -> u64 {
        self.root.weight
    }

    /// Freeze the tree
    pub fn finish(self) -> StackTree {
        debug!(
            "Built stack tree: {} samples, max depth {}",
            self.root.weight, self.max_depth
        );
        StackTree {
            root: self.root,
            max_depth: self.max_depth,
        }
    }
}

/// Frozen aggregation tree, read-only and shareable across threads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackTree {
    root: StackTreeNode,
    max_depth: usize,
}

impl StackTree {
    /// Aggregate `samples` in one go
    pub fn from_samples<I, S, F>(samples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = F>,
        F: AsRef<str>,
    {
        let mut builder = StackTreeBuilder::new();
        builder.ingest(samples);
        builder.finish()
    }

    pub fn root(&self) -> &StackTreeNode {
        &self.root
    }

    /// Total number of samples (the root weight)
    pub fn total_weight(&self) -> u64 {
        self.root.weight
    }

    /// Greatest number of frames in any sample
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn is_empty(&self) -> bool {
        self.root.weight == 0
    }

    /// Write an indented `weight frame` listing of the heavier nodes
    ///
    /// Nodes below 5% of the root weight are left out with their subtrees.
    pub fn dump<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let min_weight = self.root.weight / DUMP_MIN_WEIGHT_DIVISOR;
        dump_node(&self.root, writer, 0, min_weight)
    }
}

fn dump_node<W: Write>(
    node: &StackTreeNode,
    writer: &mut W,
    indent: usize,
    min_weight: u64,
) -> io::Result<()> {
    if node.weight < min_weight {
        return Ok(());
    }

    writeln!(writer, "{:indent$}{} {}", "", node.weight, node.frame, indent = indent)?;
    for child in &node.children {
        dump_node(child, writer, indent + 2, min_weight)?;
    }
    Ok(())
}
