//! `dsync cycles`: list dependency cycles (strongly connected components).

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use depsync_core::graph::{cycle_through, find_cycles};
use depsync_core::model::Label;
use serde::Serialize;

use crate::output::{OutputMode, pretty_section, render_mode};

/// Arguments for `dsync cycles`.
#[derive(Args, Debug)]
pub struct CyclesArgs {
    /// Target document (JSON).
    pub targets: PathBuf,
}

#[derive(Debug, Serialize)]
struct CyclesOutput {
    cycles: Vec<CycleEntry>,
}

#[derive(Debug, Serialize)]
struct CycleEntry {
    /// Sorted members of the strongly connected component.
    members: Vec<String>,
    /// One concrete loop through the first member.
    path: Vec<String>,
}

/// Execute `dsync cycles`.
pub fn run_cycles(args: &CyclesArgs, output: OutputMode) -> anyhow::Result<()> {
    let doc = super::load_targets(&args.targets, output)?;

    let cycles = find_cycles(&doc.targets)
        .into_iter()
        .map(|members| {
            let path = members
                .first()
                .and_then(|first| cycle_through(&doc.targets, first.as_str()))
                .unwrap_or_default();
            CycleEntry {
                members: members.iter().map(Label::to_string).collect(),
                path: path.iter().map(Label::to_string).collect(),
            }
        })
        .collect();

    render_mode(output, &CyclesOutput { cycles }, render_text, render_pretty)
}

fn render_text(payload: &CyclesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for cycle in &payload.cycles {
        writeln!(w, "{}", cycle.path.join(" -> "))?;
    }
    Ok(())
}

fn render_pretty(payload: &CyclesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Dependency cycles")?;
    if payload.cycles.is_empty() {
        writeln!(w, "No cycles found.")?;
        return Ok(());
    }
    for (idx, cycle) in payload.cycles.iter().enumerate() {
        writeln!(w, "{:>3}. {}", idx + 1, cycle.members.join(", "))?;
        writeln!(w, "     {}", cycle.path.join(" -> "))?;
    }
    Ok(())
}
