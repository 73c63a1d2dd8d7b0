//! Sync-issue telemetry.
//!
//! One [`SyncIssueRecord`] per reported issue is collected, then flushed once
//! per report call with the project identity.

use depsync_core::model::{IssueKind, ModuleId, Severity};
use serde::Serialize;
use tracing::debug;

/// Stable telemetry tag for an issue kind: `TYPE_<NAME>`, or `TYPE_UNKNOWN`
/// for codes without a name.
#[must_use]
pub fn usage_tag(kind: IssueKind) -> String {
    kind.name()
        .map_or_else(|| "TYPE_UNKNOWN".to_string(), |name| format!("TYPE_{name}"))
}

/// Telemetry for one input issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncIssueRecord {
    pub tag: String,
    pub severity: Severity,
    pub module: ModuleId,
    /// Quick-fix ids offered on the messages that covered this issue.
    pub offered_fixes: Vec<String>,
}

pub trait UsageReporter {
    fn collect(&mut self, record: SyncIssueRecord);

    /// Flush everything collected since the last flush.
    fn report_to_usage_tracker(&mut self, project_id: Option<&str>);
}

/// A flushed batch of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageFlush {
    pub project_id: Option<String>,
    pub records: Vec<SyncIssueRecord>,
}

/// Keeps flushed batches in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingUsageReporter {
    pending: Vec<SyncIssueRecord>,
    pub flushes: Vec<UsageFlush>,
}

impl RecordingUsageReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records of the most recent flush.
    #[must_use]
    pub fn last_records(&self) -> &[SyncIssueRecord] {
        self.flushes
            .last()
            .map(|flush| flush.records.as_slice())
            .unwrap_or_default()
    }
}

impl UsageReporter for RecordingUsageReporter {
    fn collect(&mut self, record: SyncIssueRecord) {
        self.pending.push(record);
    }

    fn report_to_usage_tracker(&mut self, project_id: Option<&str>) {
        debug!(records = self.pending.len(), "flushing sync issue usage");
        self.flushes.push(UsageFlush {
            project_id: project_id.map(ToString::to_string),
            records: std::mem::take(&mut self.pending),
        });
    }
}

/// Drops all telemetry.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopUsageReporter;

impl UsageReporter for NoopUsageReporter {
    fn collect(&mut self, _record: SyncIssueRecord) {}

    fn report_to_usage_tracker(&mut self, _project_id: Option<&str>) {}
}
