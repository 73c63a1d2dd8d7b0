//! Built-in reporting strategies.
//!
//! | Strategy                              | Kinds                                       |
//! |---------------------------------------|---------------------------------------------|
//! | [`UnresolvedDependenciesReporter`]    | `UNRESOLVED_DEPENDENCY`                     |
//! | [`DeprecatedConfigurationsReporter`]  | `DEPRECATED_CONFIGURATION`, `DEPRECATED_DSL` |
//! | [`MissingSdkPackageReporter`]         | `MISSING_SDK_PACKAGE`                       |
//! | [`UnhandledIssuesReporter`]           | everything else (default)                   |

use crate::strategy::IssueReportingStrategy;

pub mod deprecated;
pub mod sdk;
pub mod unhandled;
pub mod unresolved;

pub use deprecated::DeprecatedConfigurationsReporter;
pub use sdk::MissingSdkPackageReporter;
pub use unhandled::UnhandledIssuesReporter;
pub use unresolved::UnresolvedDependenciesReporter;

/// The typed strategies registered by
/// [`SyncIssuesReporter::with_default_strategies`](crate::SyncIssuesReporter::with_default_strategies).
#[must_use]
pub fn builtin() -> Vec<Box<dyn IssueReportingStrategy>> {
    vec![
        Box::new(UnresolvedDependenciesReporter),
        Box::new(DeprecatedConfigurationsReporter),
        Box::new(MissingSdkPackageReporter),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use depsync_core::model::{BuildFileMap, ModuleId, SyncIssue};

    /// Owned fixture for building an [`IssueBatch`](crate::IssueBatch).
    pub struct Fixture {
        pub issues: Vec<(SyncIssue, ModuleId)>,
        pub build_files: BuildFileMap,
    }

    impl Fixture {
        pub fn new(issues: Vec<(&str, SyncIssue)>) -> Self {
            Self {
                issues: issues
                    .into_iter()
                    .map(|(module, issue)| (issue, ModuleId::new(module)))
                    .collect(),
                build_files: BuildFileMap::new(),
            }
        }

        pub fn with_build_file(mut self, module: &str, path: &str) -> Self {
            self.build_files.insert(ModuleId::new(module), path.into());
            self
        }

        pub fn entries(&self) -> Vec<(&SyncIssue, &ModuleId)> {
            self.issues.iter().map(|(issue, module)| (issue, module)).collect()
        }
    }
}
