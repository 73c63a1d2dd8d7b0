use std::fmt;
use std::path::PathBuf;

/// Machine-readable error codes for tooling that consumes CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InputReadFailed,
    TargetDocumentInvalid,
    IssueDocumentInvalid,
    DuplicateStrategy,
    StrategyFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::InputReadFailed => "E1101",
            Self::TargetDocumentInvalid => "E2001",
            Self::IssueDocumentInvalid => "E2002",
            Self::DuplicateStrategy => "E3001",
            Self::StrategyFailed => "E3002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InputReadFailed => "Input file could not be read",
            Self::TargetDocumentInvalid => "Invalid target document",
            Self::IssueDocumentInvalid => "Invalid issue document",
            Self::DuplicateStrategy => "Issue kind registered twice",
            Self::StrategyFailed => "Issue reporting strategy failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .depsync/config.toml and retry."),
            Self::InputReadFailed => Some("Check the path and read permissions."),
            Self::TargetDocumentInvalid => {
                Some("Expected {\"targets\": {\"<label>\": {\"deps\": [...]}}}.")
            }
            Self::IssueDocumentInvalid => {
                Some("Expected {\"modules\": {\"<module>\": [issue, ...]}, \"build_files\": {...}}.")
            }
            Self::DuplicateStrategy => Some("Register at most one strategy per issue kind."),
            Self::StrategyFailed => None,
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Which JSON document a [`LoadError`] concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Targets,
    Issues,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Targets => f.write_str("target document"),
            Self::Issues => f.write_str("issue document"),
        }
    }
}

/// Errors from reading the JSON documents in [`crate::model::document`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {document}: {source}")]
    Parse {
        document: DocumentKind,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } => ErrorCode::InputReadFailed,
            Self::Parse {
                document: DocumentKind::Targets,
                ..
            } => ErrorCode::TargetDocumentInvalid,
            Self::Parse {
                document: DocumentKind::Issues,
                ..
            } => ErrorCode::IssueDocumentInvalid,
        }
    }
}
