//! Derived indexes over a [`TargetMap`](crate::model::TargetMap).
//!
//! ## Submodules
//!
//! - [`reverse`]: who directly depends on a target.
//! - [`transitive`]: everything a target depends on, memoized.
//! - [`cycles`]: strongly connected components and concrete cycle paths.
//!
//! Every index here is a read-only snapshot of the map it was built from.

pub mod cycles;
pub mod reverse;
pub mod transitive;

pub use cycles::{cycle_through, find_cycles};
pub use reverse::ReverseDependencyMap;
pub use transitive::{Closure, DependencyWalk, TransitiveDependencyMap};
