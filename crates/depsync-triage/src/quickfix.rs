//! Quick-fix providers decorate finished messages with extra links.

use std::path::Path;

use depsync_core::model::{BuildFileMap, ModuleId};

use crate::message::{Hyperlink, SyncMessage};

/// Everything a provider may look at for one message.
#[derive(Debug, Clone, Copy)]
pub struct QuickFixRequest<'a> {
    pub message: &'a SyncMessage,
    pub modules: &'a [ModuleId],
    pub build_files: &'a BuildFileMap,
    pub project_id: Option<&'a str>,
}

impl<'a> QuickFixRequest<'a> {
    #[must_use]
    pub fn build_file(&self, module: &ModuleId) -> Option<&'a Path> {
        self.build_files.get(module).map(std::path::PathBuf::as_path)
    }
}

pub trait QuickFixProvider: Send + Sync {
    /// Links to append to `request.message`, in display order.
    fn provide(&self, request: &QuickFixRequest<'_>) -> Vec<Hyperlink>;
}

/// Offers "Open File" for the build file of every affected module that has
/// one.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenBuildFileProvider;

impl OpenBuildFileProvider {
    pub const ID: &'static str = "OPEN_FILE";
}

impl QuickFixProvider for OpenBuildFileProvider {
    fn provide(&self, request: &QuickFixRequest<'_>) -> Vec<Hyperlink> {
        request
            .modules
            .iter()
            .filter_map(|module| request.build_file(module))
            .map(|path| {
                Hyperlink::new(
                    Self::ID,
                    format!("Open File: {}", path.display()),
                    format!("openFile:{}", path.display()),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depsync_core::model::Severity;
    use std::path::PathBuf;

    #[test]
    fn links_only_modules_with_build_files() {
        let app = ModuleId::new(":app");
        let lib = ModuleId::new(":lib");
        let mut build_files = BuildFileMap::new();
        build_files.insert(app.clone(), PathBuf::from("app/build.gradle"));

        let message = SyncMessage::new("g", Severity::Error, "x").with_modules([&lib, &app]);
        let request = QuickFixRequest {
            message: &message,
            modules: &message.modules,
            build_files: &build_files,
            project_id: None,
        };

        let links = OpenBuildFileProvider.provide(&request);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].id, "OPEN_FILE");
        assert_eq!(links[0].url, "openFile:app/build.gradle");
    }
}
