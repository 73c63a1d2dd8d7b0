#![forbid(unsafe_code)]
//! depsync-core library.
//!
//! Build-target graph model and the dependency index computed over it, plus
//! the sync-issue types shared with `depsync-triage`.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums for library failures, `anyhow::Result` at
//!   I/O boundaries (config loading).
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod graph;
pub mod model;

pub use graph::{ReverseDependencyMap, TransitiveDependencyMap};
pub use model::{
    BuildFileMap, IssueKind, IssuesByModule, Label, ModuleId, Severity, SyncIssue, TargetInfo,
    TargetMap,
};
