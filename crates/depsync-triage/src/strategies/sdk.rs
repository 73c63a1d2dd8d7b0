//! Missing SDK packages, one message each with an install link.

use anyhow::Result;
use depsync_core::model::IssueKind;

use crate::message::{Hyperlink, SyncMessage};
use crate::strategy::{IssueBatch, IssueReport, IssueReportingStrategy};

const GROUP: &str = "Missing SDK packages";
const INSTALL_ID: &str = "INSTALL_SDK_PACKAGE";

#[derive(Debug, Default, Clone, Copy)]
pub struct MissingSdkPackageReporter;

impl IssueReportingStrategy for MissingSdkPackageReporter {
    fn name(&self) -> &'static str {
        "missing-sdk-package"
    }

    fn kinds(&self) -> &[IssueKind] {
        &[IssueKind::MissingSdkPackage]
    }

    fn report(&self, batch: &IssueBatch<'_>) -> Result<Vec<IssueReport>> {
        Ok(batch
            .iter()
            .map(|(idx, issue, module)| {
                let mut message =
                    SyncMessage::new(GROUP, issue.severity, issue.message.clone()).with_modules([module]);
                if let Some(package) = issue.data.as_deref() {
                    message = message.with_link(Hyperlink::new(
                        INSTALL_ID,
                        "Install missing SDK package",
                        format!("installSdk:{package}"),
                    ));
                }
                IssueReport::new(message, vec![idx])
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::test_support::Fixture;
    use depsync_core::model::SyncIssue;

    #[test]
    fn one_message_per_issue_with_install_link() {
        let fx = Fixture::new(vec![
            (
                ":app",
                SyncIssue::error(IssueKind::MissingSdkPackage, "Failed to find platform android-34")
                    .with_data("platforms;android-34"),
            ),
            (":app", SyncIssue::error(IssueKind::MissingSdkPackage, "No package id")),
        ]);
        let entries = fx.entries();
        let batch = IssueBatch::new(&entries, &fx.build_files);

        let reports = MissingSdkPackageReporter.report(&batch).expect("report");
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].message.links[0].url, "installSdk:platforms;android-34");
        assert!(reports[1].message.links.is_empty());
    }
}
