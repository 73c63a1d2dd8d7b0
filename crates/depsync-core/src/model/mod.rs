//! Plain data handed to the core by the build-system integration layer.
//!
//! - [`target`]: build-target labels and the forward [`TargetMap`].
//! - [`issue`]: sync issues, their severities and kinds.
//! - [`module`]: owning-module identifiers and build-file lookups.
//! - [`document`]: JSON documents the CLI reads these structures from.

pub mod document;
pub mod issue;
pub mod module;
pub mod target;

pub use document::{IssueDocument, TargetDocument};
pub use issue::{IssueKind, Severity, SyncIssue};
pub use module::{BuildFileMap, IssuesByModule, ModuleId};
pub use target::{Label, LabelGraph, TargetInfo, TargetMap};
