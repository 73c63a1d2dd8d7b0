//! Dependency cycle detection.
//!
//! Cycles are legal in a target map (the closure and reverse-map traversals
//! terminate on them) but they usually point at a build misconfiguration, so
//! they are surfaced as diagnostics.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use tracing::debug;

use crate::model::{Label, LabelGraph, TargetMap};

/// Find every dependency cycle in `targets`.
///
/// Each entry is the sorted list of labels in one strongly connected
/// component. Self-loops are reported as a one-element cycle. The outer list
/// is sorted too, so the result is independent of enumeration order.
#[must_use]
pub fn find_cycles(targets: &TargetMap) -> Vec<Vec<Label>> {
    let lg = targets.to_digraph();

    let mut cycles: Vec<Vec<Label>> = tarjan_scc(&lg.graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || component.first().is_some_and(|node| has_self_loop(&lg, *node))
        })
        .map(|component| {
            let mut labels: Vec<Label> = component
                .into_iter()
                .filter_map(|idx| lg.label(idx).cloned())
                .collect();
            labels.sort_unstable();
            labels
        })
        .collect();

    cycles.sort_unstable();
    debug!(cycles = cycles.len(), "cycle scan complete");
    cycles
}

/// A concrete dependency path from `label` back to itself, if one exists.
///
/// The path starts and ends with `label`: `a → b → … → a`. It is a shortest
/// such path; ties go to earlier-declared dependencies.
#[must_use]
pub fn cycle_through(targets: &TargetMap, label: &str) -> Option<Vec<Label>> {
    let lg = targets.to_digraph();
    let start = lg.node_index(label)?;

    let mut queue: VecDeque<NodeIndex> = VecDeque::new();
    let mut visited: HashSet<NodeIndex> = HashSet::new();
    let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();

    for next in successors(&lg, start) {
        if next == start {
            let own = lg.label(start)?.clone();
            return Some(vec![own.clone(), own]);
        }
        if visited.insert(next) {
            parent.insert(next, start);
            queue.push_back(next);
        }
    }

    while let Some(current) = queue.pop_front() {
        for next in successors(&lg, current) {
            if next == start {
                return reconstruct(&lg, start, current, &parent);
            }
            if visited.insert(next) {
                parent.insert(next, current);
                queue.push_back(next);
            }
        }
    }

    None
}

/// Outgoing neighbours in declaration order.
///
/// petgraph iterates a node's edges newest-first, so reverse to recover the
/// order the dependencies were declared in.
fn successors(lg: &LabelGraph, node: NodeIndex) -> Vec<NodeIndex> {
    let mut out: Vec<NodeIndex> = lg.graph.neighbors(node).collect();
    out.reverse();
    out
}

fn has_self_loop(lg: &LabelGraph, node: NodeIndex) -> bool {
    lg.graph.find_edge(node, node).is_some()
}

fn reconstruct(
    lg: &LabelGraph,
    start: NodeIndex,
    last: NodeIndex,
    parent: &HashMap<NodeIndex, NodeIndex>,
) -> Option<Vec<Label>> {
    // Parent links run last → … → start.
    let mut rev: Vec<NodeIndex> = vec![start, last];
    let mut cursor = last;
    while cursor != start {
        cursor = *parent.get(&cursor)?;
        rev.push(cursor);
    }
    rev.reverse();
    rev.into_iter().map(|idx| lg.label(idx).cloned()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
