//! Subcommand handlers.

pub mod cycles;
pub mod deps;
pub mod rdeps;
pub mod report;

use std::path::Path;

use depsync_core::config::{ProjectConfig, load_project_config};
use depsync_core::error::{ErrorCode, LoadError};
use depsync_core::model::{IssueDocument, TargetDocument};

use crate::output::{CliError, OutputMode, render_error};

/// Load a target document, rendering a structured error on failure.
pub fn load_targets(path: &Path, output: OutputMode) -> anyhow::Result<TargetDocument> {
    TargetDocument::from_path(path).or_else(|err| fail(&err, output))
}

/// Load an issue document, rendering a structured error on failure.
pub fn load_issues(path: &Path, output: OutputMode) -> anyhow::Result<IssueDocument> {
    IssueDocument::from_path(path).or_else(|err| fail(&err, output))
}

/// Load `.depsync/config.toml` under `project_root`.
pub fn load_config(project_root: &Path, output: OutputMode) -> anyhow::Result<ProjectConfig> {
    load_project_config(project_root).or_else(|err| {
        render_error(
            output,
            &CliError::from_code(format!("{err:#}"), ErrorCode::ConfigParseError),
        )?;
        Err(err)
    })
}

fn fail<T>(err: &LoadError, output: OutputMode) -> anyhow::Result<T> {
    render_error(output, &CliError::from_code(err.to_string(), err.error_code()))?;
    anyhow::bail!("{}", err.error_code().message())
}
