//! Unresolved dependency coordinates.
//!
//! Issues naming the same coordinate collapse into one message across
//! modules, so a library missing from five modules is reported once.

use anyhow::Result;
use depsync_core::model::IssueKind;
use indexmap::IndexMap;
use tracing::debug;

use crate::message::{Hyperlink, SyncMessage};
use crate::strategy::{IssueBatch, IssueReport, IssueReportingStrategy};

const GROUP: &str = "Unresolved dependencies";
const SEARCH_ID: &str = "SEARCH_IN_BUILD_FILES";

#[derive(Debug, Default, Clone, Copy)]
pub struct UnresolvedDependenciesReporter;

impl IssueReportingStrategy for UnresolvedDependenciesReporter {
    fn name(&self) -> &'static str {
        "unresolved-dependencies"
    }

    fn kinds(&self) -> &[IssueKind] {
        &[IssueKind::UnresolvedDependency]
    }

    fn report(&self, batch: &IssueBatch<'_>) -> Result<Vec<IssueReport>> {
        // coordinate -> (message, covered indices)
        let mut by_coordinate: IndexMap<&str, (SyncMessage, Vec<usize>)> = IndexMap::new();

        for (idx, issue, module) in batch.iter() {
            let coordinate = issue.data.as_deref().unwrap_or(&issue.message);
            let (message, covered) = by_coordinate.entry(coordinate).or_insert_with(|| {
                (
                    SyncMessage::new(GROUP, issue.severity, format!("Failed to resolve: {coordinate}")),
                    Vec::new(),
                )
            });
            message.severity = message.severity.most_severe(issue.severity);
            message.add_module(module);
            covered.push(idx);
        }

        debug!(
            issues = batch.len(),
            coordinates = by_coordinate.len(),
            "merged unresolved dependencies"
        );

        Ok(by_coordinate
            .into_iter()
            .map(|(coordinate, (mut message, covered))| {
                let links: Vec<Hyperlink> = message
                    .modules
                    .iter()
                    .filter_map(|module| {
                        batch.build_file(module).map(|path| {
                            Hyperlink::new(
                                SEARCH_ID,
                                format!("Search in {}", path.display()),
                                format!("search:{}?q={coordinate}", path.display()),
                            )
                        })
                    })
                    .collect();
                message.links.extend(links);
                IssueReport::new(message, covered)
            })
            .collect())
    }
}
