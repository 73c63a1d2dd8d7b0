use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Project-level settings from `.depsync/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Fill every transitive closure when the index is built instead of on
    /// first query.
    #[serde(default)]
    pub precompute: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Project identity handed to quick-fix providers and the usage tracker.
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_true")]
    pub quick_fixes: bool,
    #[serde(default = "default_true")]
    pub telemetry: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            quick_fixes: default_true(),
            telemetry: default_true(),
        }
    }
}

/// Load `.depsync/config.toml` under `project_root`.
///
/// A missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".depsync/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_config_uses_defaults() {
        let root = tempfile::tempdir().expect("tempdir");
        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert!(!cfg.graph.precompute);
        assert!(cfg.report.quick_fixes);
        assert!(cfg.report.telemetry);
        assert_eq!(cfg.report.project_id, None);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let root = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(root.path().join(".depsync")).expect("create dir");
        std::fs::write(
            root.path().join(".depsync/config.toml"),
            "[graph]\nprecompute = true\n\n[report]\nproject_id = \"demo\"\n",
        )
        .expect("write config");

        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert!(cfg.graph.precompute);
        assert_eq!(cfg.report.project_id.as_deref(), Some("demo"));
        assert!(cfg.report.quick_fixes);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let root = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(root.path().join(".depsync")).expect("create dir");
        std::fs::write(root.path().join(".depsync/config.toml"), "[graph\n").expect("write");

        let err = load_project_config(root.path()).expect_err("must fail");
        assert!(format!("{err:#}").contains("Failed to parse"), "{err:#}");
    }
}
