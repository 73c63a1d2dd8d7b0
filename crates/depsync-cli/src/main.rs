#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "depsync: build-target dependency index and sync-issue reporting",
    long_about = None
)]
struct Cli {
    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format. Overrides `--json` and `FORMAT`.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Project root holding `.depsync/config.toml` (default: current directory).
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "List what a target depends on",
        after_help = "EXAMPLES:\n    # Direct dependencies\n    dsync deps targets.json //app:lib\n\n    # Everything //app:lib pulls in, nearest first\n    dsync deps targets.json //app:lib --transitive"
    )]
    Deps(cmd::deps::DepsArgs),

    #[command(
        about = "List targets that depend on a target",
        after_help = "EXAMPLES:\n    # Direct dependents\n    dsync rdeps targets.json //base\n\n    # Impact set of a change to //base\n    dsync rdeps targets.json //base --transitive --json"
    )]
    Rdeps(cmd::rdeps::RdepsArgs),

    #[command(about = "List dependency cycles")]
    Cycles(cmd::cycles::CyclesArgs),

    #[command(
        about = "Report sync issues",
        after_help = "EXAMPLES:\n    # Human-readable messages\n    dsync report issues.json\n\n    # Messages plus telemetry records\n    dsync report issues.json --project-id demo --json"
    )]
    Report(cmd::report::ReportArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DEPSYNC_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "depsync=debug,info"
        } else {
            "depsync=info,warn"
        })
    });

    let format = env::var("DEPSYNC_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let output = cli.output_mode();
    let project_root = match cli.root {
        Some(ref root) => root.clone(),
        None => env::current_dir()?,
    };
    debug!(root = %project_root.display(), ?output, "starting");

    match cli.command {
        Commands::Deps(ref args) => {
            let config = cmd::load_config(&project_root, output)?;
            cmd::deps::run_deps(args, &config, output)
        }
        Commands::Rdeps(ref args) => cmd::rdeps::run_rdeps(args, output),
        Commands::Cycles(ref args) => cmd::cycles::run_cycles(args, output),
        Commands::Report(ref args) => {
            let config = cmd::load_config(&project_root, output)?;
            cmd::report::run_report(args, &config, output)
        }
    }
}
