//! The per-issue-kind reporting seam.

use std::path::Path;

use depsync_core::model::{BuildFileMap, IssueKind, ModuleId, SyncIssue};

use crate::message::SyncMessage;

/// The issues handed to one strategy invocation.
///
/// Issues keep pipeline order. Each issue's owning module is available
/// through [`IssueBatch::module_of`]; only the modules of issues in this
/// batch are visible.
#[derive(Debug, Clone, Copy)]
pub struct IssueBatch<'a> {
    entries: &'a [(&'a SyncIssue, &'a ModuleId)],
    build_files: &'a BuildFileMap,
}

impl<'a> IssueBatch<'a> {
    #[must_use]
    pub const fn new(
        entries: &'a [(&'a SyncIssue, &'a ModuleId)],
        build_files: &'a BuildFileMap,
    ) -> Self {
        Self {
            entries,
            build_files,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(index, issue, module)` in batch order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a SyncIssue, &'a ModuleId)> + 'a {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, (issue, module))| (idx, *issue, *module))
    }

    #[must_use]
    pub fn issue(&self, index: usize) -> Option<&'a SyncIssue> {
        self.entries.get(index).map(|(issue, _)| *issue)
    }

    #[must_use]
    pub fn module_of(&self, index: usize) -> Option<&'a ModuleId> {
        self.entries.get(index).map(|(_, module)| *module)
    }

    /// The build file of `module`, `None` when the module has none.
    #[must_use]
    pub fn build_file(&self, module: &ModuleId) -> Option<&'a Path> {
        self.build_files.get(module).map(std::path::PathBuf::as_path)
    }
}

/// A message plus the batch indices of the issues it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueReport {
    pub message: SyncMessage,
    pub issues: Vec<usize>,
}

impl IssueReport {
    #[must_use]
    pub const fn new(message: SyncMessage, issues: Vec<usize>) -> Self {
        Self { message, issues }
    }
}

/// Turns a batch of same-kind issues into user-facing messages.
///
/// Strategies are shared across threads and across `report` calls, so they
/// must not keep per-call state.
pub trait IssueReportingStrategy: Send + Sync {
    /// Short stable name used in logs and errors.
    fn name(&self) -> &'static str;

    /// The issue kinds this strategy handles. Empty for the default strategy.
    fn kinds(&self) -> &[IssueKind];

    /// Produce messages for `batch`.
    ///
    /// # Errors
    ///
    /// Any error aborts the whole report call; nothing is delivered.
    fn report(&self, batch: &IssueBatch<'_>) -> anyhow::Result<Vec<IssueReport>>;
}
