//! Memoized transitive-dependency closure ("everything X depends on").
//!
//! # Algorithm
//!
//! Breadth-first search over the forward [`TargetMap`], seeded with the direct
//! dependencies of the query target. A visited set marks targets when they are
//! enqueued, so each reachable target is expanded exactly once no matter how
//! many paths lead to it (diamonds, cycles, self-loops).
//!
//! Output order is non-decreasing distance from the seed; targets at equal
//! distance keep the order of the dependency lists that discovered them. Hash
//! order never leaks into the result.
//!
//! # Caching
//!
//! [`TransitiveDependencyMap::transitive_dependencies`] memoizes each closure
//! for the lifetime of the map. Entries are never invalidated: when the
//! underlying target map changes, drop the whole `TransitiveDependencyMap` and
//! build a new one.
//!
//! The cache sits behind a single mutex covering "check, else compute and
//! insert", so a map can be shared across threads. Use
//! [`TransitiveDependencyMap::precomputed`] to fill every entry up front.
//!
//! # Edge Cases
//!
//! - Unknown targets have an empty closure; that is not an error.
//! - The seed is excluded from its own closure unless a cycle (including a
//!   self-loop) routes back to it.
//! - Dangling dependencies are part of the closure but have no dependencies
//!   of their own.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexSet;
use tracing::{debug, instrument, trace};

use crate::model::{Label, TargetMap};

/// A transitive closure in breadth-first discovery order.
pub type Closure = IndexSet<Label>;

// ---------------------------------------------------------------------------
// DependencyWalk
// ---------------------------------------------------------------------------

/// Lazy breadth-first iterator over the dependencies reachable from a set of
/// seed targets.
///
/// Each reachable target is yielded once. Seeds are not yielded unless they
/// are reachable from some seed.
#[derive(Debug, Clone)]
pub struct DependencyWalk<'a> {
    targets: &'a TargetMap,
    queue: VecDeque<&'a Label>,
    visited: HashSet<&'a Label>,
}

impl<'a> DependencyWalk<'a> {
    /// Start a walk from `seeds`, enqueuing their direct dependencies in seed
    /// order then declaration order.
    pub fn new<I, S>(targets: &'a TargetMap, seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut walk = Self {
            targets,
            queue: VecDeque::new(),
            visited: HashSet::new(),
        };
        for seed in seeds {
            walk.enqueue_deps_of(seed.as_ref());
        }
        walk
    }

    fn enqueue_deps_of(&mut self, label: &str) {
        for dep in self.targets.deps(label) {
            if self.visited.insert(dep) {
                self.queue.push_back(dep);
            }
        }
    }
}

impl<'a> Iterator for DependencyWalk<'a> {
    type Item = &'a Label;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.queue.pop_front()?;
        self.enqueue_deps_of(current.as_str());
        Some(current)
    }
}

// ---------------------------------------------------------------------------
// TransitiveDependencyMap
// ---------------------------------------------------------------------------

/// Per-target transitive dependency closures over one [`TargetMap`] snapshot.
#[derive(Debug)]
pub struct TransitiveDependencyMap {
    targets: Arc<TargetMap>,
    cache: Mutex<HashMap<Label, Arc<Closure>>>,
}

impl TransitiveDependencyMap {
    /// Wrap a target map. Closures are computed lazily on first query.
    pub fn new(targets: impl Into<Arc<TargetMap>>) -> Self {
        Self {
            targets: targets.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Wrap a target map and compute every target's closure immediately.
    ///
    /// Later queries for known targets never traverse.
    #[instrument(skip(targets))]
    pub fn precomputed(targets: impl Into<Arc<TargetMap>>) -> Self {
        let map = Self::new(targets);
        {
            let mut cache = map.lock_cache();
            for label in map.targets.labels() {
                let closure = Arc::new(compute_closure(&map.targets, label.as_str()));
                cache.insert(label.clone(), closure);
            }
            debug!(entries = cache.len(), "precomputed transitive closures");
        }
        map
    }

    /// The target map this index was built over.
    #[must_use]
    pub fn targets(&self) -> &TargetMap {
        &self.targets
    }

    /// The full transitive dependency set of `label`, in BFS order.
    ///
    /// Served from the cache after the first call for a given label. Unknown
    /// labels yield an empty closure and are not cached.
    #[must_use]
    pub fn transitive_dependencies(&self, label: &str) -> Arc<Closure> {
        if !self.targets.contains(label) {
            trace!(label, "unknown target, empty closure");
            return Arc::default();
        }

        let mut cache = self.lock_cache();
        if let Some(hit) = cache.get(label) {
            trace!(label, "transitive closure cache hit");
            return Arc::clone(hit);
        }

        let closure = Arc::new(compute_closure(&self.targets, label));
        trace!(label, size = closure.len(), "computed transitive closure");
        cache.insert(Label::new(label), Arc::clone(&closure));
        closure
    }

    /// Lazily stream the dependencies reachable from `seeds` in BFS order.
    ///
    /// Not cached. For the diamond `A → {B, BB, BBB}`, `B → C`,
    /// `BB → {B, C, CC}`, `BBB → {C, CC, CCC}` the seeds `[A, BBB]` yield
    /// `B, BB, BBB, C, CC, CCC`.
    pub fn transitive_dependencies_stream<I, S>(&self, seeds: I) -> DependencyWalk<'_>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        DependencyWalk::new(&self.targets, seeds)
    }

    /// Whether `candidate` is in the transitive closure of `label`.
    ///
    /// Always agrees with `transitive_dependencies(label).contains(candidate)`.
    /// Uses the cached closure when present, otherwise walks lazily and stops
    /// at the first match without populating the cache.
    #[must_use]
    pub fn has_transitive_dependency(&self, label: &str, candidate: &str) -> bool {
        let cached = self.lock_cache().get(label).cloned();
        match cached {
            Some(closure) => closure.contains(candidate),
            None => self
                .transitive_dependencies_stream([label])
                .any(|dep| dep.as_str() == candidate),
        }
    }

    /// Number of memoized closures.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.lock_cache().len()
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<Label, Arc<Closure>>> {
        // A panic while holding the lock cannot leave a half-written entry:
        // inserts are a single call.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn compute_closure(targets: &TargetMap, label: &str) -> Closure {
    DependencyWalk::new(targets, [label]).cloned().collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
