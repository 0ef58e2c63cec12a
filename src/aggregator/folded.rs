//! Build folded (collapsed) stack lines from samples.
//!
//! Folded stacks are the input format of flamegraph.pl and inferno.
//! Format: "root;child;grandchild count"
//!
//! Example: "app!main;app!run;ntdll!NtWaitForSingleObject 42"
//! This means 42 samples were taken with exactly that call stack.

use crate::parser::frame::module_of;
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};

/// A single folded stack entry
///
/// **Public** - produced by `fold_stacks`, consumed by `write_folded`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedStack {
    /// Frames joined with `;`, root first
    pub stack: String,

    /// Number of samples with this stack
    pub count: u64,
}

impl FoldedStack {
    pub fn new(stack: impl Into<String>, count: u64) -> Self {
        Self {
            stack: stack.into(),
            count,
        }
    }

    /// Render as a `stack count` line (without newline)
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FoldedStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.stack, self.count)
    }
}

/// Fold samples into unique stacks, heaviest first
///
/// **Public** - main entry point for the folded export
///
/// # Arguments
/// * `samples` - Samples, root frame first
/// * `exclude` - Returns true for module names whose frames are dropped
///
/// # Returns
/// One entry per unique filtered stack, sorted by descending count.
/// Equal counts keep the order in which the stacks first appeared.
pub fn fold_stacks<I, S, F, P>(samples: I, exclude: P) -> Vec<FoldedStack>
where
    I: IntoIterator<Item = S>,
    S: IntoIterator<Item = F>,
    F: AsRef<str>,
    P: Fn(&str) -> bool,
{
    fold_counted_stacks(samples.into_iter().map(|sample| (sample, 1)), exclude)
}

/// Fold `(stack, count)` pairs, as `fold_stacks` would fold `count` copies
/// of each stack
pub fn fold_counted_stacks<I, S, F, P>(stacks: I, exclude: P) -> Vec<FoldedStack>
where
    I: IntoIterator<Item = (S, u64)>,
    S: IntoIterator<Item = F>,
    F: AsRef<str>,
    P: Fn(&str) -> bool,
{
    let mut folded: Vec<FoldedStack> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut total = 0u64;

    for (sample, count) in stacks {
        if count == 0 {
            continue;
        }

        let mut key = String::new();
        for frame in sample {
            let frame = frame.as_ref();
            if exclude(module_of(frame)) {
                continue;
            }
            if !key.is_empty() {
                key.push(';');
            }
            key.push_str(frame);
        }

        match index.get(&key) {
            Some(&i) => folded[i].count += count,
            None => {
                index.insert(key.clone(), folded.len());
                folded.push(FoldedStack::new(key, count));
            }
        }
        total += count;
    }

    // sort_by is stable
    folded.sort_by(|a, b| b.count.cmp(&a.count));

    debug!("Folded {} samples into {} unique stacks", total, folded.len());

    folded
}

/// Write folded stacks, one `stack count` line each
pub fn write_folded<W: Write>(stacks: &[FoldedStack], writer: &mut W) -> io::Result<()> {
    for stack in stacks {
        writeln!(writer, "{}", stack)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::frame::{is_kernel_module, keep_all};

    #[test]
    fn test_single_sample() {
        let folded = fold_stacks([["A", "B", "C"]], keep_all);
        assert_eq!(folded, vec![FoldedStack::new("A;B;C", 1)]);
        assert_eq!(folded[0].to_line(), "A;B;C 1");
    }

    #[test]
    fn test_sorted_by_descending_count() {
        let samples = vec![vec!["A", "C"], vec!["A", "B"], vec!["A", "B"]];
        let folded = fold_stacks(&samples, keep_all);

        let lines: Vec<String> = folded.iter().map(FoldedStack::to_line).collect();
        assert_eq!(lines, vec!["A;B 2", "A;C 1"]);
    }

    #[test]
    fn test_ties_keep_first_appearance() {
        let samples = vec![vec!["x"], vec!["y"], vec!["z"], vec!["y"], vec!["x"]];
        let folded = fold_stacks(&samples, keep_all);

        let stacks: Vec<&str> = folded.iter().map(|s| s.stack.as_str()).collect();
        assert_eq!(stacks, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_kernel_frames_dropped() {
        let samples = vec![
            vec!["ntoskrnl!KiSystemCall64", "app!main", "app!work"],
            vec!["tcpip.sys!TcpReceive", "app!main", "app!work"],
        ];
        let folded = fold_stacks(&samples, is_kernel_module);

        assert_eq!(folded, vec![FoldedStack::new("app!main;app!work", 2)]);
    }

    #[test]
    fn test_fully_excluded_sample_folds_to_empty_stack() {
        let folded = fold_stacks([["hal!HalpTimerClockInterrupt"]], is_kernel_module);
        assert_eq!(folded, vec![FoldedStack::new("", 1)]);
    }

    #[test]
    fn test_counted_stacks_match_expanded_samples() {
        let counted = vec![
            (vec!["A", "C"], 1),
            (vec!["A", "B"], 4_000_000_000),
            (vec!["hal!HalpTimerClockInterrupt", "A", "C"], 2),
            (vec!["D"], 0),
        ];
        let folded = fold_counted_stacks(counted, is_kernel_module);

        assert_eq!(
            folded,
            vec![FoldedStack::new("A;B", 4_000_000_000), FoldedStack::new("A;C", 3)]
        );

        let expanded = vec![vec!["A", "C"], vec!["A", "B"], vec!["A", "B"]];
        assert_eq!(
            fold_counted_stacks([(vec!["A", "C"], 1), (vec!["A", "B"], 2)], keep_all),
            fold_stacks(&expanded, keep_all)
        );
    }

    #[test]
    fn test_write_folded() {
        let stacks = vec![FoldedStack::new("A;B", 2), FoldedStack::new("A;C", 1)];
        let mut out = Vec::new();
        write_folded(&stacks, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "A;B 2\nA;C 1\n");
        assert_eq!(stacks[0].to_string(), stacks[0].to_line());
    }
}
