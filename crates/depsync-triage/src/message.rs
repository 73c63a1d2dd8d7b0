//! User-facing sync messages.

use std::fmt::Write as _;

use depsync_core::model::{ModuleId, Severity};
use serde::{Deserialize, Serialize};

/// An actionable link attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlink {
    /// Stable quick-fix tag, also reported to telemetry (e.g. `OPEN_FILE`).
    pub id: String,
    pub label: String,
    pub url: String,
}

impl Hyperlink {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            url: url.into(),
        }
    }

    /// `<a href="url">label</a>`
    #[must_use]
    pub fn markup(&self) -> String {
        format!("<a href=\"{}\">{}</a>", self.url, self.label)
    }
}

/// One message produced by a reporting strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMessage {
    /// Title sinks use to bucket related messages.
    pub group: String,
    pub severity: Severity,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Hyperlink>,
    /// Affected modules, first-seen order, no duplicates.
    #[serde(default)]
    pub modules: Vec<ModuleId>,
}

impl SyncMessage {
    #[must_use]
    pub fn new(group: impl Into<String>, severity: Severity, text: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            severity,
            text: text.into(),
            links: Vec::new(),
            modules: Vec::new(),
        }
    }

    /// Record an affected module unless it is already listed.
    pub fn add_module(&mut self, module: &ModuleId) {
        if !self.modules.contains(module) {
            self.modules.push(module.clone());
        }
    }

    #[must_use]
    pub fn with_modules<'a>(mut self, modules: impl IntoIterator<Item = &'a ModuleId>) -> Self {
        for module in modules {
            self.add_module(module);
        }
        self
    }

    #[must_use]
    pub fn with_link(mut self, link: Hyperlink) -> Self {
        self.links.push(link);
        self
    }

    /// Base text followed by one line of markup per link.
    #[must_use]
    pub fn rendered(&self) -> String {
        let mut out = self.text.clone();
        for link in &self.links {
            let _ = write!(out, "\n{}", link.markup());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_appends_link_markup() {
        let msg = SyncMessage::new("Group", Severity::Error, "Failed to resolve: g:a:1")
            .with_link(Hyperlink::new("OPEN_FILE", "Open File", "openFile:app/build.gradle"));
        assert_eq!(
            msg.rendered(),
            "Failed to resolve: g:a:1\n<a href=\"openFile:app/build.gradle\">Open File</a>"
        );
    }

    #[test]
    fn rendered_without_links_is_the_text() {
        let msg = SyncMessage::new("Group", Severity::Warning, "plain");
        assert_eq!(msg.rendered(), "plain");
    }

    #[test]
    fn modules_are_deduplicated_in_first_seen_order() {
        let app = ModuleId::new(":app");
        let lib = ModuleId::new(":lib");
        let msg = SyncMessage::new("Group", Severity::Warning, "x").with_modules([&lib, &app, &lib]);
        assert_eq!(msg.modules, vec![lib, app]);
    }
}
