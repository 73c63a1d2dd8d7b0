//! Reverse-dependency multimap ("who directly depends on X").
//!
//! # Overview
//!
//! [`ReverseDependencyMap`] is the structural transpose of a [`TargetMap`]:
//! for every edge `A → B` the map records `B ↦ A`, and nothing else.
//!
//! ## Ordering
//!
//! Keys appear in the order their first dependent was enumerated. Within a
//! key, dependents accumulate in the order targets are enumerated in the
//! source map. Equal target maps therefore always produce equal multimaps,
//! including iteration order.
//!
//! ## Dangling Edges
//!
//! A dependency on a label that is not a key of the target map still becomes
//! a reverse-map key. This is not an error: targets outside the sync scope
//! are routine.
//!
//! ## Invalidation
//!
//! The map is immutable once built. When the target map changes, build a new
//! one; there is no incremental update.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashSet, VecDeque};

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, instrument};

use crate::model::{Label, TargetMap};

/// Mapping from a target to the set of targets that directly depend on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReverseDependencyMap {
    rdeps: IndexMap<Label, IndexSet<Label>>,
}

impl ReverseDependencyMap {
    /// Build the reverse map for `targets`.
    ///
    /// # Complexity
    ///
    /// O(E) where E is the number of declared dependency edges.
    #[instrument(skip(targets), fields(targets = targets.len()))]
    #[must_use]
    pub fn build(targets: &TargetMap) -> Self {
        let mut rdeps: IndexMap<Label, IndexSet<Label>> = IndexMap::new();

        for (label, info) in targets {
            for dep in &info.deps {
                rdeps
                    .entry(dep.clone())
                    .or_default()
                    .insert(label.clone());
            }
        }

        debug!(keys = rdeps.len(), "built reverse dependency map");
        Self { rdeps }
    }

    /// Targets that directly depend on `label`, in enumeration order.
    ///
    /// Empty for labels nothing depends on, including unknown labels.
    pub fn get(&self, label: &str) -> impl Iterator<Item = &Label> {
        self.rdeps.get(label).into_iter().flatten()
    }

    /// The dependents set for `label`, if any target depends on it.
    #[must_use]
    pub fn dependents(&self, label: &str) -> Option<&IndexSet<Label>> {
        self.rdeps.get(label)
    }

    /// Return `true` if `dependent` declares a direct dependency on `dependency`.
    #[must_use]
    pub fn contains(&self, dependency: &str, dependent: &str) -> bool {
        self.rdeps
            .get(dependency)
            .is_some_and(|set| set.contains(dependent))
    }

    /// Number of keys (targets with at least one dependent).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rdeps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rdeps.is_empty()
    }

    /// Number of distinct `(dependency, dependent)` pairs.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.rdeps.values().map(IndexSet::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Label, &IndexSet<Label>)> {
        self.rdeps.iter()
    }

    /// Every target that transitively depends on `label` (impact set).
    ///
    /// Breadth-first over the reverse edges: nearer dependents first, ties in
    /// reverse-map insertion order. `label` itself is only included when a
    /// cycle leads back to it.
    #[must_use]
    pub fn transitive_rdeps(&self, label: &str) -> Vec<Label> {
        let mut visited: HashSet<&Label> = HashSet::new();
        let mut queue: VecDeque<&Label> = VecDeque::new();
        let mut out: Vec<Label> = Vec::new();

        for dependent in self.get(label) {
            if visited.insert(dependent) {
                queue.push_back(dependent);
            }
        }

        while let Some(current) = queue.pop_front() {
            out.push(current.clone());
            for dependent in self.get(current.as_str()) {
                if visited.insert(dependent) {
                    queue.push_back(dependent);
                }
            }
        }

        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TargetInfo;

    fn map(edges: &[(&str, &[&str])]) -> TargetMap {
        edges
            .iter()
            .map(|(label, deps)| (Label::new(label), TargetInfo::with_deps(deps.iter().copied())))
            .collect()
    }

    fn labels<'a>(it: impl Iterator<Item = &'a Label>) -> Vec<&'a str> {
        it.map(Label::as_str).collect()
    }

    #[test]
    fn simple_pair_is_transposed() {
        let targets = map(&[("l1", &["l2"]), ("l2", &[])]);
        let rdeps = ReverseDependencyMap::build(&targets);

        assert_eq!(rdeps.len(), 1);
        assert_eq!(labels(rdeps.get("l2")), vec!["l1"]);
        assert!(rdeps.get("l1").next().is_none());
    }

    #[test]
    fn dependents_accumulate_in_enumeration_order() {
        let targets = map(&[("c", &["x"]), ("a", &["x"]), ("b", &["x"])]);
        let rdeps = ReverseDependencyMap::build(&targets);
        assert_eq!(labels(rdeps.get("x")), vec!["c", "a", "b"]);
    }

    #[test]
    fn dangling_dependency_becomes_a_key() {
        let targets = map(&[("a", &["outside"])]);
        let rdeps = ReverseDependencyMap::build(&targets);
        assert!(!targets.contains("outside"));
        assert!(rdeps.contains("outside", "a"));
    }

    #[test]
    fn repeated_dependency_is_recorded_once() {
        let targets = map(&[("a", &["b", "b"])]);
        let rdeps = ReverseDependencyMap::build(&targets);
        assert_eq!(rdeps.pair_count(), 1);
    }

    #[test]
    fn self_loop_is_its_own_dependent() {
        let targets = map(&[("a", &["a"])]);
        let rdeps = ReverseDependencyMap::build(&targets);
        assert!(rdeps.contains("a", "a"));
        assert_eq!(rdeps.transitive_rdeps("a"), vec![Label::new("a")]);
    }

    #[test]
    fn unknown_label_has_no_dependents() {
        let rdeps = ReverseDependencyMap::build(&TargetMap::new());
        assert!(rdeps.is_empty());
        assert!(rdeps.get("nope").next().is_none());
        assert!(rdeps.dependents("nope").is_none());
        assert!(rdeps.transitive_rdeps("nope").is_empty());
    }

    #[test]
    fn transitive_rdeps_walks_breadth_first() {
        // app → feature → core, tests → core, app → tests
        let targets = map(&[
            ("app", &["feature", "tests"]),
            ("feature", &["core"]),
            ("tests", &["core"]),
            ("core", &[]),
        ]);
        let rdeps = ReverseDependencyMap::build(&targets);

        let impact: Vec<String> = rdeps
            .transitive_rdeps("core")
            .into_iter()
            .map(|l| l.to_string())
            .collect();
        assert_eq!(impact, vec!["feature", "tests", "app"]);
    }

    #[test]
    fn equal_inputs_build_equal_maps() {
        let a = ReverseDependencyMap::build(&map(&[("a", &["b", "c"]), ("b", &["c"])]));
        let b = ReverseDependencyMap::build(&map(&[("a", &["b", "c"]), ("b", &["c"])]));
        assert_eq!(a, b);
    }
}
