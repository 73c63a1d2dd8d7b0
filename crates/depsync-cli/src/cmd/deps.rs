//! `dsync deps`: what a target depends on.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use depsync_core::config::ProjectConfig;
use depsync_core::graph::TransitiveDependencyMap;
use depsync_core::model::Label;
use serde::Serialize;
use tracing::{debug, warn};

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `dsync deps`.
#[derive(Args, Debug)]
pub struct DepsArgs {
    /// Target document (JSON).
    pub targets: PathBuf,

    /// Target label to query.
    pub label: String,

    /// Follow dependencies transitively (breadth-first order).
    #[arg(short, long)]
    pub transitive: bool,
}

#[derive(Debug, Serialize)]
struct DepsOutput {
    label: String,
    known: bool,
    transitive: bool,
    deps: Vec<String>,
}

/// Execute `dsync deps`.
pub fn run_deps(args: &DepsArgs, config: &ProjectConfig, output: OutputMode) -> anyhow::Result<()> {
    let doc = super::load_targets(&args.targets, output)?;
    let known = doc.targets.contains(&args.label);
    if !known {
        warn!(label = %args.label, "target not found in target document");
    }

    let deps: Vec<String> = if args.transitive {
        let index = if config.graph.precompute {
            TransitiveDependencyMap::precomputed(doc.targets)
        } else {
            TransitiveDependencyMap::new(doc.targets)
        };
        let closure = index.transitive_dependencies(&args.label);
        debug!(size = closure.len(), "transitive closure computed");
        closure.iter().map(ToString::to_string).collect()
    } else {
        doc.targets.deps(&args.label).iter().map(Label::to_string).collect()
    };

    let payload = DepsOutput {
        label: args.label.clone(),
        known,
        transitive: args.transitive,
        deps,
    };

    render_mode(output, &payload, render_text, render_pretty)
}

fn render_text(payload: &DepsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for dep in &payload.deps {
        writeln!(w, "{dep}")?;
    }
    Ok(())
}

fn render_pretty(payload: &DepsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let heading = if payload.transitive {
        "Transitive dependencies"
    } else {
        "Direct dependencies"
    };
    pretty_section(w, heading)?;
    pretty_kv(w, "target", &payload.label)?;
    if !payload.known {
        writeln!(w, "(target not in document)")?;
    } else if payload.deps.is_empty() {
        writeln!(w, "(none)")?;
    }
    for dep in &payload.deps {
        writeln!(w, "  {dep}")?;
    }
    Ok(())
}

