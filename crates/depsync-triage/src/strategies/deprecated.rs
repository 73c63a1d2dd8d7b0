//! Deprecated configurations and DSL.
//!
//! The same deprecation usually fires in many modules with identical text;
//! those issues merge into one message that lists the modules.

use anyhow::Result;
use depsync_core::model::{IssueKind, ModuleId};
use indexmap::IndexMap;

use crate::message::SyncMessage;
use crate::strategy::{IssueBatch, IssueReport, IssueReportingStrategy};

const GROUP: &str = "Deprecated configurations";

#[derive(Debug, Default, Clone, Copy)]
pub struct DeprecatedConfigurationsReporter;

impl IssueReportingStrategy for DeprecatedConfigurationsReporter {
    fn name(&self) -> &'static str {
        "deprecated-configurations"
    }

    fn kinds(&self) -> &[IssueKind] {
        &[IssueKind::DeprecatedConfiguration, IssueKind::DeprecatedDsl]
    }

    fn report(&self, batch: &IssueBatch<'_>) -> Result<Vec<IssueReport>> {
        let mut by_text: IndexMap<&str, (SyncMessage, Vec<usize>)> = IndexMap::new();

        for (idx, issue, module) in batch.iter() {
            let (message, covered) = by_text
                .entry(issue.message.as_str())
                .or_insert_with(|| (SyncMessage::new(GROUP, issue.severity, ""), Vec::new()));
            message.severity = message.severity.most_severe(issue.severity);
            message.add_module(module);
            covered.push(idx);
        }

        Ok(by_text
            .into_iter()
            .map(|(text, (mut message, covered))| {
                let modules: Vec<&str> = message.modules.iter().map(ModuleId::as_str).collect();
                message.text = format!("{text}\nAffected modules: {}", modules.join(", "));
                IssueReport::new(message, covered)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::test_support::Fixture;
    use depsync_core::model::{Severity, SyncIssue};

    #[test]
    fn identical_text_merges_and_lists_modules() {
        let text = "Configuration 'compile' is obsolete and has been replaced with 'implementation'.";
        let fx = Fixture::new(vec![
            (":app", SyncIssue::warning(IssueKind::DeprecatedConfiguration, text)),
            (":lib", SyncIssue::warning(IssueKind::DeprecatedConfiguration, text)),
            (":lib", SyncIssue::warning(IssueKind::DeprecatedDsl, "android.dexOptions is obsolete")),
        ]);
        let entries = fx.entries();
        let batch = IssueBatch::new(&entries, &fx.build_files);

        let reports = DeprecatedConfigurationsReporter.report(&batch).expect("report");
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].issues, vec![0, 1]);
        assert!(reports[0].message.text.ends_with("Affected modules: :app, :lib"));
        assert_eq!(reports[0].message.severity, Severity::Warning);
        assert_eq!(reports[1].issues, vec![2]);
    }

    #[test]
    fn error_level_deprecation_keeps_error() {
        let fx = Fixture::new(vec![
            (":app", SyncIssue::warning(IssueKind::DeprecatedDsl, "x")),
            (":lib", SyncIssue::error(IssueKind::DeprecatedDsl, "x")),
        ]);
        let entries = fx.entries();
        let batch = IssueBatch::new(&entries, &fx.build_files);

        let reports = DeprecatedConfigurationsReporter.report(&batch).expect("report");
        assert_eq!(reports[0].message.severity, Severity::Error);
    }
}
