use pretty_assertions::assert_eq;
use stackflame::aggregator::{fold_stacks, FoldedStack, StackTree, StackTreeNode};
use stackflame::parser::{is_kernel_module, keep_all, module_of};

fn check_invariants(node: &StackTreeNode) {
    let children: u64 = node.children().iter().map(StackTreeNode::weight).sum();
    assert!(node.weight() >= children);
    for child in node.children() {
        check_invariants(child);
    }
}

fn shape(node: &StackTreeNode) -> String {
    let children: Vec<String> = node.children().iter().map(shape).collect();
    if children.is_empty() {
        format!("{}({})", node.frame(), node.weight())
    } else {
        format!("{}({})->{{{}}}", node.frame(), node.weight(), children.join(","))
    }
}

fn sample_set() -> Vec<Vec<String>> {
    let raw = [
        "app!main;app!parse;app!lex",
        "app!main;app!parse",
        "app!main;app!eval;app!eval;app!eval",
        "app!main;app!eval;ntdll!NtWaitForSingleObject",
        "ntoskrnl!KiSwapContext",
        "app!main;app!parse;app!lex",
    ];
    raw.iter()
        .map(|s| s.split(';').map(str::to_string).collect())
        .collect()
}

#[test]
fn test_example_single_chain() {
    let samples = vec![vec!["A", "B", "C"]];
    let tree = StackTree::from_samples(&samples);
    assert_eq!(shape(tree.root()), "ROOT(1)->{A(1)->{B(1)->{C(1)}}}");

    let folded = fold_stacks(&samples, keep_all);
    assert_eq!(folded[0].to_line(), "A;B;C 1");
}

#[test]
fn test_example_shared_prefix() {
    let samples = vec![vec!["A", "B"], vec!["A", "B"], vec!["A", "C"]];
    let tree = StackTree::from_samples(&samples);
    assert_eq!(shape(tree.root()), "ROOT(3)->{A(3)->{B(2),C(1)}}");

    let lines: Vec<String> = fold_stacks(&samples, keep_all)
        .iter()
        .map(FoldedStack::to_line)
        .collect();
    assert_eq!(lines, vec!["A;B 2", "A;C 1"]);
}

#[test]
fn test_example_excluded_module() {
    let samples = vec![vec!["K!start", "A", "B"]];
    let exclude = |module: &str| module == "K";

    let folded = fold_stacks(&samples, exclude);
    assert_eq!(folded, vec![FoldedStack::new("A;B", 1)]);

    // The tree is never filtered
    let tree = StackTree::from_samples(&samples);
    assert!(tree.root().child("K!start").is_some());
}

#[test]
fn test_root_weight_counts_samples() {
    let samples = sample_set();
    let tree = StackTree::from_samples(&samples);

    assert_eq!(tree.total_weight(), samples.len() as u64);
    assert_eq!(tree.max_depth(), 4);
    check_invariants(tree.root());
}

#[test]
fn test_same_input_same_tree() {
    let samples = sample_set();
    let first = StackTree::from_samples(&samples);
    let second = StackTree::from_samples(&samples);

    assert_eq!(first, second);
    assert_eq!(shape(first.root()), shape(second.root()));
}

#[test]
fn test_lazy_sample_source() {
    let lines = "a;b\na;c\na;b";
    let tree = StackTree::from_samples(lines.lines().map(|line| line.split(';')));

    assert_eq!(shape(tree.root()), "ROOT(3)->{a(3)->{b(2),c(1)}}");
}

#[test]
fn test_folded_counts_match_tree_leaves() {
    let samples = sample_set();
    let folded = fold_stacks(&samples, keep_all);

    let total: u64 = folded.iter().map(|s| s.count).sum();
    assert_eq!(total, samples.len() as u64);
    assert_eq!(folded[0], FoldedStack::new("app!main;app!parse;app!lex", 2));
}

#[test]
fn test_folded_drops_kernel_frames() {
    let samples = sample_set();
    let folded = fold_stacks(&samples, is_kernel_module);

    assert!(folded
        .iter()
        .all(|s| s.stack.split(';').all(|frame| !is_kernel_module(module_of(frame)))));
    assert!(folded.iter().any(|s| s.stack.is_empty()));
}

#[test]
fn test_frozen_tree_shared_between_threads() {
    let samples = sample_set();
    let tree = StackTree::from_samples(&samples);

    let (a, b) = std::thread::scope(|scope| {
        let first = scope.spawn(|| shape(tree.root()));
        let second = scope.spawn(|| shape(tree.root()));
        (first.join().unwrap(), second.join().unwrap())
    });

    assert_eq!(a, b);
}
