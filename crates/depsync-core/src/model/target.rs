//! Build targets and the forward dependency map.
//!
//! A [`TargetMap`] is supplied wholesale by the build-system query layer after
//! a sync and is read-only afterwards. Every derived index in
//! [`crate::graph`] is built from one snapshot; when the snapshot changes the
//! index is rebuilt, never patched. [`TargetMap::content_hash`] lets callers
//! detect that.
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A depends on B". Dependency lists keep the order the
//! build system declared them in, and the map keeps the order targets were
//! enumerated in. Both orders are observable through traversal.

#![allow(clippy::module_name_repetitions)]

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Label
// ---------------------------------------------------------------------------

/// Opaque identifier of a build target, e.g. `//app/src/main:lib`.
///
/// Cheap to clone. Compares, hashes and borrows as its string form, so maps
/// keyed by `Label` can be queried with a plain `&str`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(Arc<str>);

impl Label {
    /// Create a label from any string-like value.
    #[must_use]
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(Arc::from(label.as_ref()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Label {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// TargetInfo
// ---------------------------------------------------------------------------

/// The declared outgoing dependencies of one target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetInfo {
    /// Direct dependencies in declaration order. May name targets that are
    /// not keys of the owning [`TargetMap`].
    pub deps: Vec<Label>,
    /// Rule kind reported by the build system (`android_library`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl TargetInfo {
    /// Info with the given dependencies and no rule kind.
    #[must_use]
    pub fn with_deps<I, L>(deps: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        Self {
            deps: deps.into_iter().map(Into::into).collect(),
            kind: None,
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

// ---------------------------------------------------------------------------
// TargetMap
// ---------------------------------------------------------------------------

/// Mapping from target label to its [`TargetInfo`], in enumeration order.
///
/// A target listed without info (a JSON `null`) is stored as having no
/// dependencies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "IndexMap<Label, Option<TargetInfo>>",
    into = "IndexMap<Label, TargetInfo>"
)]
pub struct TargetMap {
    targets: IndexMap<Label, TargetInfo>,
}

impl TargetMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from `(label, info)` pairs where info may be absent.
    ///
    /// A repeated label keeps its first position and its last info.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Label, Option<TargetInfo>)>,
    {
        Self {
            targets: entries
                .into_iter()
                .map(|(label, info)| (label, info.unwrap_or_default()))
                .collect(),
        }
    }

    /// Insert or replace a target's info.
    pub fn insert(&mut self, label: impl Into<Label>, info: TargetInfo) {
        self.targets.insert(label.into(), info);
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&TargetInfo> {
        self.targets.get(label)
    }

    /// Direct dependencies of `label`; empty for unknown targets.
    #[must_use]
    pub fn deps(&self, label: &str) -> &[Label] {
        self.targets
            .get(label)
            .map_or(&[][..], |info| info.deps.as_slice())
    }

    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.targets.contains_key(label)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Total number of declared dependency edges, dangling ones included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.targets.values().map(|info| info.deps.len()).sum()
    }

    /// Iterate targets in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (&Label, &TargetInfo)> {
        self.targets.iter()
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.targets.keys()
    }

    /// BLAKE3 hash of the edge set in enumeration order, `blake3:<hex>`.
    ///
    /// Two maps with the same targets, dependency lists and ordering hash
    /// equal. Any derived index built from a map with a different hash is
    /// stale.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for (label, info) in &self.targets {
            hasher.update(label.as_str().as_bytes());
            hasher.update(b"\x00");
            for dep in &info.deps {
                hasher.update(dep.as_str().as_bytes());
                hasher.update(b"\x00");
            }
            hasher.update(b"\n");
        }
        format!("blake3:{}", hasher.finalize())
    }

    /// Convert to a petgraph directed graph with edges `dependent → dependency`.
    ///
    /// Dangling dependencies become nodes without outgoing edges. Repeated
    /// entries in one dependency list collapse into a single edge.
    #[must_use]
    pub fn to_digraph(&self) -> LabelGraph {
        let mut graph = DiGraph::<Label, ()>::with_capacity(self.len(), self.edge_count());
        let mut node_map: HashMap<Label, NodeIndex> = HashMap::with_capacity(self.len());

        for label in self.targets.keys() {
            let idx = graph.add_node(label.clone());
            node_map.insert(label.clone(), idx);
        }

        for (label, info) in &self.targets {
            let from = node_map[label.as_str()];
            for dep in &info.deps {
                let to = *node_map
                    .entry(dep.clone())
                    .or_insert_with(|| graph.add_node(dep.clone()));
                if !graph.contains_edge(from, to) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        LabelGraph { graph, node_map }
    }
}

impl From<IndexMap<Label, Option<TargetInfo>>> for TargetMap {
    fn from(value: IndexMap<Label, Option<TargetInfo>>) -> Self {
        Self::from_entries(value)
    }
}

impl From<TargetMap> for IndexMap<Label, TargetInfo> {
    fn from(value: TargetMap) -> Self {
        value.targets
    }
}

impl FromIterator<(Label, TargetInfo)> for TargetMap {
    fn from_iter<I: IntoIterator<Item = (Label, TargetInfo)>>(iter: I) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TargetMap {
    type Item = (&'a Label, &'a TargetInfo);
    type IntoIter = indexmap::map::Iter<'a, Label, TargetInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}

// ---------------------------------------------------------------------------
// LabelGraph
// ---------------------------------------------------------------------------

/// A [`TargetMap`] materialized as a petgraph [`DiGraph`].
#[derive(Debug)]
pub struct LabelGraph {
    /// Directed graph: nodes = target labels, edges = `dependent → dependency`.
    pub graph: DiGraph<Label, ()>,
    /// Mapping from label to petgraph `NodeIndex`.
    pub node_map: HashMap<Label, NodeIndex>,
}

impl LabelGraph {
    #[must_use]
    pub fn node_index(&self, label: &str) -> Option<NodeIndex> {
        self.node_map.get(label).copied()
    }

    #[must_use]
    pub fn label(&self, idx: NodeIndex) -> Option<&Label> {
        self.graph.node_weight(idx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TargetMap {
        [
            (Label::new("//a"), TargetInfo::with_deps(["//b", "//c"])),
            (Label::new("//b"), TargetInfo::with_deps(["//c"])),
            (Label::new("//c"), TargetInfo::default()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn label_borrows_as_str_for_lookups() {
        let map = sample();
        assert!(map.contains("//a"));
        assert_eq!(map.deps("//a"), &[Label::new("//b"), Label::new("//c")]);
    }

    #[test]
    fn unknown_target_has_no_deps() {
        let map = sample();
        assert!(map.deps("//missing").is_empty());
        assert!(map.get("//missing").is_none());
    }

    #[test]
    fn absent_info_is_treated_as_no_dependencies() {
        let map = TargetMap::from_entries([
            (Label::new("//a"), Some(TargetInfo::with_deps(["//b"]))),
            (Label::new("//b"), None),
        ]);
        assert_eq!(map.len(), 2);
        assert!(map.deps("//b").is_empty());
    }

    #[test]
    fn json_null_info_deserializes_as_empty() {
        let map: TargetMap =
            serde_json::from_str(r#"{"//a": {"deps": ["//b"], "kind": "java_library"}, "//b": null}"#)
                .expect("parse target map");
        assert_eq!(map.deps("//a"), &[Label::new("//b")]);
        assert_eq!(
            map.get("//a").and_then(|info| info.kind.as_deref()),
            Some("java_library")
        );
        assert_eq!(map.get("//b"), Some(&TargetInfo::default()));
    }

    #[test]
    fn enumeration_order_is_preserved() {
        let map: TargetMap = serde_json::from_str(r#"{"//z": null, "//a": null, "//m": null}"#)
            .expect("parse target map");
        let labels: Vec<&str> = map.labels().map(Label::as_str).collect();
        assert_eq!(labels, vec!["//z", "//a", "//m"]);
    }

    #[test]
    fn content_hash_is_stable_and_edge_sensitive() {
        let a = sample();
        let b = sample();
        assert_eq!(a.content_hash(), b.content_hash());
        assert!(a.content_hash().starts_with("blake3:"));

        let mut c = sample();
        c.insert("//c", TargetInfo::with_deps(["//d"]));
        assert_ne!(a.content_hash(), c.content_hash(), "hash must change when edges change");
    }

    #[test]
    fn content_hash_distinguishes_dependency_ownership() {
        let ab: TargetMap = [
            (Label::new("a"), TargetInfo::with_deps(["b"])),
            (Label::new("c"), TargetInfo::default()),
        ]
        .into_iter()
        .collect();
        let cb: TargetMap = [
            (Label::new("a"), TargetInfo::default()),
            (Label::new("c"), TargetInfo::with_deps(["b"])),
        ]
        .into_iter()
        .collect();
        assert_ne!(ab.content_hash(), cb.content_hash());
    }

    #[test]
    fn digraph_includes_dangling_nodes_and_dedups_edges() {
        let map: TargetMap = [(Label::new("a"), TargetInfo::with_deps(["x", "x"]))]
            .into_iter()
            .collect();
        let lg = map.to_digraph();
        assert_eq!(lg.graph.node_count(), 2);
        assert_eq!(lg.graph.edge_count(), 1);

        let a = lg.node_index("a").expect("a node");
        let x = lg.node_index("x").expect("x node");
        assert!(lg.graph.contains_edge(a, x), "edge goes dependent → dependency");
        assert_eq!(lg.label(x).map(Label::as_str), Some("x"));
    }

    #[test]
    fn edge_count_counts_declared_edges() {
        assert_eq!(sample().edge_count(), 3);
        assert_eq!(TargetMap::new().edge_count(), 0);
    }
}
