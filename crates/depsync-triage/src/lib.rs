#![forbid(unsafe_code)]
//! depsync-triage library.
//!
//! Turns the raw sync issues of a build-system sync into user-facing
//! messages. Issues are partitioned errors-first, grouped by kind, and
//! dispatched to the [`IssueReportingStrategy`] registered for that kind;
//! everything without a dedicated strategy goes to a single default strategy
//! in one batch. Quick-fix providers then decorate the messages with links,
//! and one telemetry record per issue is handed to a [`UsageReporter`].
//!
//! # Conventions
//!
//! - **Errors**: strategies return `anyhow::Result`; the pipeline wraps
//!   failures in the `thiserror` enums in [`error`].
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod error;
pub mod message;
pub mod quickfix;
pub mod reporter;
pub mod sink;
pub mod strategies;
pub mod strategy;
pub mod usage;

pub use error::{RegistryError, ReportError};
pub use message::{Hyperlink, SyncMessage};
pub use quickfix::{OpenBuildFileProvider, QuickFixProvider, QuickFixRequest};
pub use reporter::{ReportSummary, SyncIssuesReporter};
pub use sink::{CollectingSink, MessageSink};
pub use strategy::{IssueBatch, IssueReport, IssueReportingStrategy};
pub use usage::{
    NoopUsageReporter, RecordingUsageReporter, SyncIssueRecord, UsageFlush, UsageReporter, usage_tag,
};
