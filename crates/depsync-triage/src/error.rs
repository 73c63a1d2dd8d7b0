use depsync_core::error::ErrorCode;
use depsync_core::model::IssueKind;

/// Invalid strategy registration.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("issue kind {kind} is claimed by both `{first}` and `{second}`")]
    DuplicateKind {
        kind: IssueKind,
        first: &'static str,
        second: &'static str,
    },
}

impl RegistryError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::DuplicateKind { .. } => ErrorCode::DuplicateStrategy,
        }
    }
}

/// Failure of one `report` call. No message is delivered when this is
/// returned.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("reporting strategy `{strategy}` failed")]
    Strategy {
        strategy: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("reporting strategy `{strategy}` referenced issue {index} in a batch of {len}")]
    IssueOutOfRange {
        strategy: &'static str,
        index: usize,
        len: usize,
    },
}

impl ReportError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Strategy { .. } => ErrorCode::StrategyFailed,
            Self::IssueOutOfRange { .. } => ErrorCode::InternalUnexpected,
        }
    }
}
