//! The sync-issue reporting pipeline.
//!
//! # Flow
//!
//! 1. Flatten `module → issues` into `(issue, module)` pairs, module order
//!    then per-module order.
//! 2. Stable-partition errors before warnings.
//! 3. Within each tier, group by kind in first-appearance order and hand each
//!    group to the strategy registered for that kind. Groups without a
//!    strategy are pooled across both tiers and go to the default strategy
//!    in one invocation after all typed groups.
//! 4. Ask each quick-fix provider for links per message.
//! 5. Deliver messages errors-first, stable within a severity.
//! 6. Collect one telemetry record per input issue, then flush once.
//!
//! A failing strategy aborts the call before anything reaches the sink or
//! the usage reporter.
//!
//! The registry is fixed at construction; `report` takes `&self` and keeps
//! no state between calls, so identical inputs produce identical output.

use std::collections::HashMap;

use depsync_core::model::{BuildFileMap, IssueKind, IssuesByModule, ModuleId, Severity, SyncIssue};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::{RegistryError, ReportError};
use crate::message::SyncMessage;
use crate::quickfix::{QuickFixProvider, QuickFixRequest};
use crate::sink::MessageSink;
use crate::strategies::{self, UnhandledIssuesReporter};
use crate::strategy::{IssueBatch, IssueReportingStrategy};
use crate::usage::{SyncIssueRecord, UsageReporter, usage_tag};

/// Counts describing one report call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub issues: usize,
    pub messages: usize,
    pub errors: usize,
    pub warnings: usize,
    /// Issues routed to the default strategy.
    pub unhandled: usize,
}

type Entry<'a> = (&'a SyncIssue, &'a ModuleId);

/// One strategy invocation: the strategy index (`None` for the default) and
/// the pipeline indices of its issues.
struct Invocation {
    strategy: Option<usize>,
    issues: Vec<usize>,
}

/// Dispatches sync issues to reporting strategies.
pub struct SyncIssuesReporter {
    strategies: Vec<Box<dyn IssueReportingStrategy>>,
    by_kind: HashMap<IssueKind, usize>,
    default: Box<dyn IssueReportingStrategy>,
    quick_fixes: Vec<Box<dyn QuickFixProvider>>,
}

impl std::fmt::Debug for SyncIssuesReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncIssuesReporter")
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("default", &self.default.name())
            .field("quick_fixes", &self.quick_fixes.len())
            .finish()
    }
}

impl SyncIssuesReporter {
    /// Build a registry from typed strategies and the default strategy.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateKind`] if two strategies claim the
    /// same issue kind.
    pub fn new(
        strategies: Vec<Box<dyn IssueReportingStrategy>>,
        default: Box<dyn IssueReportingStrategy>,
    ) -> Result<Self, RegistryError> {
        let mut by_kind: HashMap<IssueKind, usize> = HashMap::new();
        for (idx, strategy) in strategies.iter().enumerate() {
            for &kind in strategy.kinds() {
                if let Some(&first) = by_kind.get(&kind) {
                    return Err(RegistryError::DuplicateKind {
                        kind,
                        first: strategies[first].name(),
                        second: strategy.name(),
                    });
                }
                by_kind.insert(kind, idx);
            }
        }

        debug!(
            strategies = strategies.len(),
            kinds = by_kind.len(),
            default = default.name(),
            "built sync issue registry"
        );

        Ok(Self {
            strategies,
            by_kind,
            default,
            quick_fixes: Vec::new(),
        })
    }

    /// The built-in typed strategies plus [`UnhandledIssuesReporter`].
    ///
    /// # Errors
    ///
    /// Only fails if the built-in strategies overlap, which the test suite
    /// rules out.
    pub fn with_default_strategies() -> Result<Self, RegistryError> {
        Self::new(strategies::builtin(), Box::new(UnhandledIssuesReporter))
    }

    #[must_use]
    pub fn with_quick_fix_provider(mut self, provider: Box<dyn QuickFixProvider>) -> Self {
        self.quick_fixes.push(provider);
        self
    }

    /// Name of the strategy that handles `kind`.
    #[must_use]
    pub fn strategy_for(&self, kind: IssueKind) -> &'static str {
        self.by_kind
            .get(&kind)
            .map_or_else(|| self.default.name(), |&idx| self.strategies[idx].name())
    }

    /// Run the pipeline over `issues`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if a strategy fails or reports an issue index
    /// outside its batch. Nothing is delivered to `sink` or `usage` then.
    #[instrument(skip_all, fields(modules = issues.len()))]
    pub fn report(
        &self,
        issues: &IssuesByModule,
        build_files: &BuildFileMap,
        project_id: Option<&str>,
        sink: &mut dyn MessageSink,
        usage: &mut dyn UsageReporter,
    ) -> Result<ReportSummary, ReportError> {
        let entries = ingest(issues);
        let plan = self.plan(&entries);
        let unhandled = plan
            .iter()
            .filter(|inv| inv.strategy.is_none())
            .map(|inv| inv.issues.len())
            .sum();

        let mut messages: Vec<SyncMessage> = Vec::new();
        // pipeline index -> indices into `messages` covering it
        let mut covered_by: Vec<Vec<usize>> = vec![Vec::new(); entries.len()];

        for invocation in &plan {
            let strategy = match invocation.strategy {
                Some(idx) => self.strategies[idx].as_ref(),
                None => self.default.as_ref(),
            };
            let batch_entries: Vec<Entry<'_>> =
                invocation.issues.iter().map(|&i| entries[i]).collect();
            let batch = IssueBatch::new(&batch_entries, build_files);

            debug!(
                strategy = strategy.name(),
                issues = batch.len(),
                "dispatching issue batch"
            );
            let reports = strategy.report(&batch).map_err(|source| {
                warn!(strategy = strategy.name(), error = %source, "reporting strategy failed");
                ReportError::Strategy {
                    strategy: strategy.name(),
                    source,
                }
            })?;

            for report in reports {
                let message_idx = messages.len();
                for &local in &report.issues {
                    let global = invocation.issues.get(local).copied().ok_or(
                        ReportError::IssueOutOfRange {
                            strategy: strategy.name(),
                            index: local,
                            len: batch.len(),
                        },
                    )?;
                    if !covered_by[global].contains(&message_idx) {
                        covered_by[global].push(message_idx);
                    }
                }
                messages.push(report.message);
            }
        }

        for message in &mut messages {
            self.attach_quick_fixes(message, build_files, project_id);
        }

        let records: Vec<SyncIssueRecord> = entries
            .iter()
            .zip(&covered_by)
            .map(|((issue, module), covering)| SyncIssueRecord {
                tag: usage_tag(issue.kind),
                severity: issue.severity,
                module: (*module).clone(),
                offered_fixes: offered_fixes(&messages, covering),
            })
            .collect();

        // Stable: strategy order is kept within a severity.
        let mut order: Vec<usize> = (0..messages.len()).collect();
        order.sort_by_key(|&i| messages[i].severity);
        let mut slots: Vec<Option<SyncMessage>> = messages.into_iter().map(Some).collect();

        let mut summary = ReportSummary {
            issues: entries.len(),
            unhandled,
            ..ReportSummary::default()
        };
        for idx in order {
            if let Some(message) = slots[idx].take() {
                match message.severity {
                    Severity::Error => summary.errors += 1,
                    Severity::Warning => summary.warnings += 1,
                }
                summary.messages += 1;
                sink.deliver(message);
            }
        }

        for record in records {
            usage.collect(record);
        }
        usage.report_to_usage_tracker(project_id);

        info!(
            issues = summary.issues,
            messages = summary.messages,
            errors = summary.errors,
            warnings = summary.warnings,
            unhandled = summary.unhandled,
            "sync issues reported"
        );
        Ok(summary)
    }

    /// Errors tier then warnings tier; typed groups per tier in first
    /// appearance order; the pooled default batch last.
    fn plan(&self, entries: &[Entry<'_>]) -> Vec<Invocation> {
        let mut plan: Vec<Invocation> = Vec::new();
        let mut unhandled: Vec<usize> = Vec::new();

        for tier in [Severity::Error, Severity::Warning] {
            let mut groups: IndexMap<IssueKind, Vec<usize>> = IndexMap::new();
            for (idx, (issue, _)) in entries.iter().enumerate() {
                if issue.severity == tier {
                    groups.entry(issue.kind).or_default().push(idx);
                }
            }

            for (kind, issues) in groups {
                match self.by_kind.get(&kind) {
                    Some(&strategy) => plan.push(Invocation {
                        strategy: Some(strategy),
                        issues,
                    }),
                    None => unhandled.extend(issues),
                }
            }
        }

        if !unhandled.is_empty() {
            plan.push(Invocation {
                strategy: None,
                issues: unhandled,
            });
        }
        plan
    }

    fn attach_quick_fixes(
        &self,
        message: &mut SyncMessage,
        build_files: &BuildFileMap,
        project_id: Option<&str>,
    ) {
        let mut links = Vec::new();
        for provider in &self.quick_fixes {
            let request = QuickFixRequest {
                message,
                modules: &message.modules,
                build_files,
                project_id,
            };
            links.extend(provider.provide(&request));
        }
        message.links.extend(links);
    }
}

fn ingest(issues: &IssuesByModule) -> Vec<Entry<'_>> {
    issues
        .iter()
        .flat_map(|(module, list)| list.iter().map(move |issue| (issue, module)))
        .collect()
}

fn offered_fixes(messages: &[SyncMessage], covering: &[usize]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for &idx in covering {
        for link in &messages[idx].links {
            if !out.contains(&link.id) {
                out.push(link.id.clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::CollectingSink;
    use crate::strategy::IssueReport;
    use crate::usage::RecordingUsageReporter;

    struct FailingStrategy;

    impl IssueReportingStrategy for FailingStrategy {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn kinds(&self) -> &[IssueKind] {
            &[IssueKind::SdkNotSet]
        }

        fn report(&self, _batch: &IssueBatch<'_>) -> anyhow::Result<Vec<IssueReport>> {
            anyhow::bail!("sdk lookup exploded")
        }
    }

    struct OutOfRangeStrategy;

    impl IssueReportingStrategy for OutOfRangeStrategy {
        fn name(&self) -> &'static str {
            "out-of-range"
        }

        fn kinds(&self) -> &[IssueKind] {
            &[IssueKind::SdkNotSet]
        }

        fn report(&self, batch: &IssueBatch<'_>) -> anyhow::Result<Vec<IssueReport>> {
            Ok(vec![IssueReport::new(
                SyncMessage::new("g", Severity::Error, "x"),
                vec![batch.len()],
            )])
        }
    }

    fn one_issue() -> IssuesByModule {
        let mut issues = IssuesByModule::new();
        issues.insert(
            ModuleId::new(":app"),
            vec![SyncIssue::error(IssueKind::SdkNotSet, "SDK location not found")],
        );
        issues
    }

    #[test]
    fn duplicate_kind_is_rejected() {
        let err = SyncIssuesReporter::new(
            vec![Box::new(FailingStrategy), Box::new(OutOfRangeStrategy)],
            Box::new(UnhandledIssuesReporter),
        )
        .expect_err("duplicate kind must fail");
        assert!(matches!(
            err,
            RegistryError::DuplicateKind {
                kind: IssueKind::SdkNotSet,
                first: "failing",
                second: "out-of-range",
            }
        ));
    }

    #[test]
    fn builtin_strategies_do_not_overlap() {
        let reporter = SyncIssuesReporter::with_default_strategies().expect("registry");
        assert_eq!(
            reporter.strategy_for(IssueKind::UnresolvedDependency),
            "unresolved-dependencies"
        );
        assert_eq!(reporter.strategy_for(IssueKind::DeprecatedDsl), "deprecated-configurations");
        assert_eq!(reporter.strategy_for(IssueKind::Other(12_345)), "unhandled");
    }

    #[test]
    fn failing_strategy_delivers_nothing() {
        let reporter =
            SyncIssuesReporter::new(vec![Box::new(FailingStrategy)], Box::new(UnhandledIssuesReporter))
                .expect("registry");
        let mut sink = CollectingSink::new();
        let mut usage = RecordingUsageReporter::new();

        let err = reporter
            .report(&one_issue(), &BuildFileMap::new(), None, &mut sink, &mut usage)
            .expect_err("strategy failure must propagate");

        assert!(matches!(err, ReportError::Strategy { strategy: "failing", .. }));
        assert!(format!("{:#}", anyhow::Error::from(err)).contains("sdk lookup exploded"));
        assert!(sink.messages.is_empty());
        assert!(usage.flushes.is_empty());
    }

    #[test]
    fn out_of_range_report_is_an_error() {
        let reporter =
            SyncIssuesReporter::new(vec![Box::new(OutOfRangeStrategy)], Box::new(UnhandledIssuesReporter))
                .expect("registry");
        let mut sink = CollectingSink::new();
        let err = reporter
            .report(
                &one_issue(),
                &BuildFileMap::new(),
                None,
                &mut sink,
                &mut crate::usage::NoopUsageReporter,
            )
            .expect_err("bad index must fail");
        assert!(matches!(err, ReportError::IssueOutOfRange { index: 1, len: 1, .. }));
        assert!(sink.messages.is_empty());
    }

    #[test]
    fn empty_input_still_flushes_usage_once() {
        let reporter = SyncIssuesReporter::with_default_strategies().expect("registry");
        let mut sink = CollectingSink::new();
        let mut usage = RecordingUsageReporter::new();

        let summary = reporter
            .report(&IssuesByModule::new(), &BuildFileMap::new(), Some("p"), &mut sink, &mut usage)
            .expect("report");

        assert_eq!(summary, ReportSummary::default());
        assert!(sink.messages.is_empty());
        assert_eq!(usage.flushes.len(), 1);
        assert!(usage.flushes[0].records.is_empty());
    }
}
