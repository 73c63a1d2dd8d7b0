//! `dsync rdeps`: who depends on a target.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use depsync_core::graph::ReverseDependencyMap;
use depsync_core::model::Label;
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `dsync rdeps`.
#[derive(Args, Debug)]
pub struct RdepsArgs {
    /// Target document (JSON).
    pub targets: PathBuf,

    /// Target label to query. Labels outside the document are allowed.
    pub label: String,

    /// Include indirect dependents (impact set, breadth-first order).
    #[arg(short, long)]
    pub transitive: bool,
}

#[derive(Debug, Serialize)]
struct RdepsOutput {
    label: String,
    transitive: bool,
    dependents: Vec<String>,
}

/// Execute `dsync rdeps`.
pub fn run_rdeps(args: &RdepsArgs, output: OutputMode) -> anyhow::Result<()> {
    let doc = super::load_targets(&args.targets, output)?;
    let rdeps = ReverseDependencyMap::build(&doc.targets);

    let dependents: Vec<String> = if args.transitive {
        rdeps
            .transitive_rdeps(&args.label)
            .iter()
            .map(Label::to_string)
            .collect()
    } else {
        rdeps.get(&args.label).map(Label::to_string).collect()
    };

    let payload = RdepsOutput {
        label: args.label.clone(),
        transitive: args.transitive,
        dependents,
    };

    render_mode(output, &payload, render_text, render_pretty)
}

fn render_text(payload: &RdepsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for dependent in &payload.dependents {
        writeln!(w, "{dependent}")?;
    }
    Ok(())
}

fn render_pretty(payload: &RdepsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let heading = if payload.transitive {
        "Transitive dependents"
    } else {
        "Direct dependents"
    };
    pretty_section(w, heading)?;
    pretty_kv(w, "target", &payload.label)?;
    if payload.dependents.is_empty() {
        writeln!(w, "(none)")?;
    }
    for dependent in &payload.dependents {
        writeln!(w, "  {dependent}")?;
    }
    Ok(())
}
