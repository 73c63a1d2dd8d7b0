//! The default strategy for issue kinds without a dedicated reporter.
//!
//! Invoked once per report call with every unhandled issue, errors first.
//! Produces a single message whose severity is `Error` when any batched
//! issue is an error.

use std::fmt::Write as _;

use anyhow::Result;
use depsync_core::model::{IssueKind, Severity};

use crate::message::SyncMessage;
use crate::strategy::{IssueBatch, IssueReport, IssueReportingStrategy};

const GROUP: &str = "Sync issues";

#[derive(Debug, Default, Clone, Copy)]
pub struct UnhandledIssuesReporter;

impl IssueReportingStrategy for UnhandledIssuesReporter {
    fn name(&self) -> &'static str {
        "unhandled"
    }

    fn kinds(&self) -> &[IssueKind] {
        &[]
    }

    fn report(&self, batch: &IssueBatch<'_>) -> Result<Vec<IssueReport>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let mut severity = Severity::Warning;
        let mut text = String::new();
        let mut message = SyncMessage::new(GROUP, Severity::Warning, "");

        for (idx, issue, module) in batch.iter() {
            severity = severity.most_severe(issue.severity);
            message.add_module(module);

            if idx > 0 {
                text.push('\n');
            }
            let _ = write!(text, "{module}: {}", issue.message);
            if let Some(data) = issue.data.as_deref() {
                let _ = write!(text, " ({data})");
            }
            for line in &issue.detail {
                let _ = write!(text, "\n    {line}");
            }
        }

        message.severity = severity;
        message.text = text;
        Ok(vec![IssueReport::new(message, (0..batch.len()).collect())])
    }
}
