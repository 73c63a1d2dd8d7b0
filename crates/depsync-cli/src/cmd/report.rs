//! `dsync report`: run sync issues through the reporting pipeline.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use depsync_core::config::ProjectConfig;
use depsync_core::model::ModuleId;
use depsync_triage::{
    CollectingSink, NoopUsageReporter, OpenBuildFileProvider, RecordingUsageReporter,
    ReportSummary, SyncIssueRecord, SyncIssuesReporter, SyncMessage, UsageReporter,
};
use serde::Serialize;

use crate::output::{
    CliError, OutputMode, pretty_kv, pretty_rule, pretty_section, render_error, render_mode,
};

/// Arguments for `dsync report`.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Issue document (JSON).
    pub issues: PathBuf,

    /// Project identity for quick fixes and telemetry. Overrides the config.
    #[arg(long)]
    pub project_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReportOutput {
    summary: ReportSummary,
    messages: Vec<SyncMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    telemetry: Option<Vec<SyncIssueRecord>>,
}

/// Execute `dsync report`.
pub fn run_report(
    args: &ReportArgs,
    config: &ProjectConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let doc = super::load_issues(&args.issues, output)?;
    let project_id = args
        .project_id
        .as_deref()
        .or(config.report.project_id.as_deref());

    let mut reporter = SyncIssuesReporter::with_default_strategies()?;
    if config.report.quick_fixes {
        reporter = reporter.with_quick_fix_provider(Box::new(OpenBuildFileProvider));
    }

    let mut sink = CollectingSink::new();
    let mut recording = RecordingUsageReporter::new();
    let mut noop = NoopUsageReporter;
    let usage: &mut dyn UsageReporter = if config.report.telemetry {
        &mut recording
    } else {
        &mut noop
    };

    let result = reporter.report(&doc.modules, &doc.build_files, project_id, &mut sink, usage);
    let summary = match result {
        Ok(summary) => summary,
        Err(err) => {
            let code = err.error_code();
            let err = anyhow::Error::from(err);
            render_error(output, &CliError::from_code(format!("{err:#}"), code))?;
            return Err(err);
        }
    };

    // Records only appear in machine-readable output.
    let telemetry = (config.report.telemetry && output.is_json())
        .then(|| recording.last_records().to_vec());

    let payload = ReportOutput {
        summary,
        messages: sink.messages,
        telemetry,
    };

    render_mode(output, &payload, render_text, render_pretty)
}

fn render_text(payload: &ReportOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for message in &payload.messages {
        writeln!(w, "{}\t{}\t{}", message.severity, message.group, first_line(&message.text))?;
    }
    Ok(())
}

fn render_pretty(payload: &ReportOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Sync issues")?;
    pretty_kv(w, "issues", payload.summary.issues.to_string())?;
    pretty_kv(w, "errors", payload.summary.errors.to_string())?;
    pretty_kv(w, "warnings", payload.summary.warnings.to_string())?;

    for message in &payload.messages {
        writeln!(w)?;
        writeln!(w, "[{}] {}", message.severity, message.group)?;
        for line in message.rendered().lines() {
            writeln!(w, "  {line}")?;
        }
        if !message.modules.is_empty() {
            let modules: Vec<&str> = message.modules.iter().map(ModuleId::as_str).collect();
            writeln!(w, "  modules: {}", modules.join(", "))?;
        }
    }
    if !payload.messages.is_empty() {
        pretty_rule(w)?;
    }
    Ok(())
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
