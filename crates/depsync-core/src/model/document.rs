//! JSON documents exported by the build-system integration layer.
//!
//! ```json
//! { "targets": { "//app:lib": { "deps": ["//base"], "kind": "android_library" }, "//base": null } }
//! ```
//!
//! ```json
//! {
//!   "modules": { ":app": [ { "severity": "error", "type": 2, "message": "...", "data": "g:a:1" } ] },
//!   "build_files": { ":app": "app/build.gradle" }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::module::{BuildFileMap, IssuesByModule};
use super::target::TargetMap;
use crate::error::{DocumentKind, LoadError};

/// A target graph snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDocument {
    #[serde(default)]
    pub targets: TargetMap,
}

impl TargetDocument {
    /// Parse a target document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] if the text is not a valid document.
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        serde_json::from_str(text).map_err(|source| LoadError::Parse {
            document: DocumentKind::Targets,
            source,
        })
    }

    /// Read and parse a target document.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Read`] if the file cannot be read, or
    /// [`LoadError::Parse`] if its contents are invalid.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let text = read(path)?;
        let doc = Self::from_json_str(&text)?;
        debug!(
            path = %path.display(),
            targets = doc.targets.len(),
            edges = doc.targets.edge_count(),
            "loaded target document"
        );
        Ok(doc)
    }
}

/// Raw sync issues per module plus the modules' build files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDocument {
    #[serde(default)]
    pub modules: IssuesByModule,
    #[serde(default)]
    pub build_files: BuildFileMap,
}

impl IssueDocument {
    /// Parse an issue document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] if the text is not a valid document.
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        serde_json::from_str(text).map_err(|source| LoadError::Parse {
            document: DocumentKind::Issues,
            source,
        })
    }

    /// Read and parse an issue document.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Read`] if the file cannot be read, or
    /// [`LoadError::Parse`] if its contents are invalid.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let text = read(path)?;
        let doc = Self::from_json_str(&text)?;
        debug!(
            path = %path.display(),
            modules = doc.modules.len(),
            issues = doc.issue_count(),
            "loaded issue document"
        );
        Ok(doc)
    }

    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.modules.values().map(Vec::len).sum()
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}
