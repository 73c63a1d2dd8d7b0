//! Sync issues reported by the build system.
//!
//! Issues are created once per sync by the integration layer, consumed once
//! by the reporting pipeline, and never mutated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Issue severity. `Error` sorts before `Warning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[serde(alias = "ERROR")]
    Error,
    #[serde(alias = "WARNING")]
    Warning,
}

impl Severity {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }

    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }

    /// The more severe of `self` and `other`.
    ///
    /// Not `Ord::max`: the derived order puts `Error` first.
    #[must_use]
    pub const fn most_severe(self, other: Self) -> Self {
        if self.is_error() || other.is_error() {
            Self::Error
        } else {
            Self::Warning
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue type tag.
///
/// Known kinds carry the stable integer code the build tool emits; codes this
/// crate does not know are preserved as [`IssueKind::Other`] so they still
/// round-trip and reach the default reporting strategy.
///
/// Equality and hashing go through [`IssueKind::code`], so `Other(2)` and
/// `UnresolvedDependency` are the same kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum IssueKind {
    Generic,
    PluginObsolete,
    UnresolvedDependency,
    DependencyIsApk,
    DependencyIsApklib,
    NonJarLocalDep,
    NonJarPackageDep,
    NonJarProvidedDep,
    JarDependOnAar,
    MismatchDep,
    OptionalLibNotFound,
    GradleTooOld,
    BuildToolsTooLow,
    DependencyMavenAndroid,
    DependencyInternalConflict,
    ExternalNativeBuildConfiguration,
    ExternalNativeBuildProcessException,
    MissingSdkPackage,
    StudioTooOld,
    UnnamedFlavorDimension,
    IncompatiblePlugin,
    DeprecatedDsl,
    DeprecatedConfiguration,
    MinSdkVersionInManifest,
    TargetSdkVersionInManifest,
    ManifestParsedDuringConfiguration,
    SdkNotSet,
    CompileSdkVersionNotSet,
    AndroidXPropertyNotEnabled,
    Other(u32),
}

impl IssueKind {
    /// Stable integer code.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Generic => 0,
            Self::PluginObsolete => 1,
            Self::UnresolvedDependency => 2,
            Self::DependencyIsApk => 3,
            Self::DependencyIsApklib => 4,
            Self::NonJarLocalDep => 5,
            Self::NonJarPackageDep => 6,
            Self::NonJarProvidedDep => 7,
            Self::JarDependOnAar => 8,
            Self::MismatchDep => 9,
            Self::OptionalLibNotFound => 10,
            Self::GradleTooOld => 12,
            Self::BuildToolsTooLow => 13,
            Self::DependencyMavenAndroid => 14,
            Self::DependencyInternalConflict => 15,
            Self::ExternalNativeBuildConfiguration => 16,
            Self::ExternalNativeBuildProcessException => 17,
            Self::MissingSdkPackage => 24,
            Self::StudioTooOld => 25,
            Self::UnnamedFlavorDimension => 26,
            Self::IncompatiblePlugin => 27,
            Self::DeprecatedDsl => 28,
            Self::DeprecatedConfiguration => 29,
            Self::MinSdkVersionInManifest => 30,
            Self::TargetSdkVersionInManifest => 31,
            Self::ManifestParsedDuringConfiguration => 33,
            Self::SdkNotSet => 36,
            Self::CompileSdkVersionNotSet => 39,
            Self::AndroidXPropertyNotEnabled => 40,
            Self::Other(code) => code,
        }
    }

    /// Map a raw code back to a kind. Never fails.
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            0 => Self::Generic,
            1 => Self::PluginObsolete,
            2 => Self::UnresolvedDependency,
            3 => Self::DependencyIsApk,
            4 => Self::DependencyIsApklib,
            5 => Self::NonJarLocalDep,
            6 => Self::NonJarPackageDep,
            7 => Self::NonJarProvidedDep,
            8 => Self::JarDependOnAar,
            9 => Self::MismatchDep,
            10 => Self::OptionalLibNotFound,
            12 => Self::GradleTooOld,
            13 => Self::BuildToolsTooLow,
            14 => Self::DependencyMavenAndroid,
            15 => Self::DependencyInternalConflict,
            16 => Self::ExternalNativeBuildConfiguration,
            17 => Self::ExternalNativeBuildProcessException,
            24 => Self::MissingSdkPackage,
            25 => Self::StudioTooOld,
            26 => Self::UnnamedFlavorDimension,
            27 => Self::IncompatiblePlugin,
            28 => Self::DeprecatedDsl,
            29 => Self::DeprecatedConfiguration,
            30 => Self::MinSdkVersionInManifest,
            31 => Self::TargetSdkVersionInManifest,
            33 => Self::ManifestParsedDuringConfiguration,
            36 => Self::SdkNotSet,
            39 => Self::CompileSdkVersionNotSet,
            40 => Self::AndroidXPropertyNotEnabled,
            other => Self::Other(other),
        }
    }

    /// The named variant for this code, if there is one.
    #[must_use]
    pub const fn canonical(self) -> Self {
        Self::from_code(self.code())
    }

    /// Upper-case name used in telemetry tags, `None` for unknown codes.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        let name = match self.canonical() {
            Self::Generic => "GENERIC",
            Self::PluginObsolete => "PLUGIN_OBSOLETE",
            Self::UnresolvedDependency => "UNRESOLVED_DEPENDENCY",
            Self::DependencyIsApk => "DEPENDENCY_IS_APK",
            Self::DependencyIsApklib => "DEPENDENCY_IS_APKLIB",
            Self::NonJarLocalDep => "NON_JAR_LOCAL_DEP",
            Self::NonJarPackageDep => "NON_JAR_PACKAGE_DEP",
            Self::NonJarProvidedDep => "NON_JAR_PROVIDED_DEP",
            Self::JarDependOnAar => "JAR_DEPEND_ON_AAR",
            Self::MismatchDep => "MISMATCH_DEP",
            Self::OptionalLibNotFound => "OPTIONAL_LIB_NOT_FOUND",
            Self::GradleTooOld => "GRADLE_TOO_OLD",
            Self::BuildToolsTooLow => "BUILD_TOOLS_TOO_LOW",
            Self::DependencyMavenAndroid => "DEPENDENCY_MAVEN_ANDROID",
            Self::DependencyInternalConflict => "DEPENDENCY_INTERNAL_CONFLICT",
            Self::ExternalNativeBuildConfiguration => "EXTERNAL_NATIVE_BUILD_CONFIGURATION",
            Self::ExternalNativeBuildProcessException => "EXTERNAL_NATIVE_BUILD_PROCESS_EXCEPTION",
            Self::MissingSdkPackage => "MISSING_SDK_PACKAGE",
            Self::StudioTooOld => "STUDIO_TOO_OLD",
            Self::UnnamedFlavorDimension => "UNNAMED_FLAVOR_DIMENSION",
            Self::IncompatiblePlugin => "INCOMPATIBLE_PLUGIN",
            Self::DeprecatedDsl => "DEPRECATED_DSL",
            Self::DeprecatedConfiguration => "DEPRECATED_CONFIGURATION",
            Self::MinSdkVersionInManifest => "MIN_SDK_VERSION_IN_MANIFEST",
            Self::TargetSdkVersionInManifest => "TARGET_SDK_VERSION_IN_MANIFEST",
            Self::ManifestParsedDuringConfiguration => "MANIFEST_PARSED_DURING_CONFIGURATION",
            Self::SdkNotSet => "SDK_NOT_SET",
            Self::CompileSdkVersionNotSet => "COMPILE_SDK_VERSION_NOT_SET",
            Self::AndroidXPropertyNotEnabled => "ANDROID_X_PROPERTY_NOT_ENABLED",
            Self::Other(_) => return None,
        };
        Some(name)
    }
}

impl PartialEq for IssueKind {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for IssueKind {}

impl Hash for IssueKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code().hash(state);
    }
}

impl From<u32> for IssueKind {
    fn from(code: u32) -> Self {
        Self::from_code(code)
    }
}

impl From<IssueKind> for u32 {
    fn from(kind: IssueKind) -> Self {
        kind.code()
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "UNKNOWN({})", self.code()),
        }
    }
}

/// One diagnostic produced during a build-system sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncIssue {
    pub severity: Severity,
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub message: String,
    /// Structured payload, e.g. the coordinate of an unresolved dependency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Multi-line detail (stack traces, resolution failures).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detail: Vec<String>,
}

impl SyncIssue {
    #[must_use]
    pub fn new(severity: Severity, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind: kind.canonical(),
            message: message.into(),
            data: None,
            detail: Vec::new(),
        }
    }

    #[must_use]
    pub fn error(kind: IssueKind, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, kind, message)
    }

    #[must_use]
    pub fn warning(kind: IssueKind, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, kind, message)
    }

    #[must_use]
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    #[must_use]
    pub fn with_detail<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.detail = lines.into_iter().map(Into::into).collect();
        self
    }
}
