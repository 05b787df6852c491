//! bddlay CLI: inspect layered BDD descriptions and place their transistor
//! netlists.
//!
//! `bddlay inspect` parses a description, builds its netlist and prints
//! statistics and diagnostics. `bddlay place` additionally runs a layout
//! model through simulated annealing and emits a layout report.

#![warn(missing_docs)]

mod inspect;
mod pipeline;
mod place;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use simplelog::{Config, LevelFilter, TermLogger, TerminalMode};

/// Transistor-level layout for layered BDD descriptions.
#[derive(Parser, Debug)]
#[command(name = "bddlay", version, about = "BDD transistor netlist layout")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `bddlay.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a description and print netlist statistics.
    Inspect(InspectArgs),
    /// Place a netlist and print the layout report.
    Place(PlaceArgs),
}

/// Arguments for `bddlay inspect`.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// The layered description to read.
    pub file: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Also list every transistor.
    #[arg(long)]
    pub transistors: bool,
}

/// Arguments for `bddlay place`.
#[derive(Parser, Debug)]
pub struct PlaceArgs {
    /// The layered description to read.
    pub file: PathBuf,

    /// Layout model.
    #[arg(short, long, value_enum, default_value_t = ModelKind::SingleRow)]
    pub model: ModelKind,

    /// RNG seed; overrides `anneal.seed`.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Iteration budget; overrides `anneal.max_iterations`.
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Single-row wire weight; overrides `single_row.w_wire`.
    #[arg(long)]
    pub w_wire: Option<f64>,

    /// Single-row area weight; overrides `single_row.w_area`.
    #[arg(long)]
    pub w_area: Option<f64>,

    /// Recompute full costs every iteration instead of using incremental
    /// cost updates.
    #[arg(long)]
    pub baseline: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Write the report to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Layout model selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModelKind {
    /// Continuous positions in a rectangle.
    #[value(name = "free2d")]
    Free2d,
    /// A permutation of row slots.
    SingleRow,
    /// Sites on a row grid.
    StandardCell,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable text.
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a config file.
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// Log level selected by `--quiet` / `--verbose`.
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::env::var_os("NO_COLOR").is_none() && std::env::var_os("TERM").is_some(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let log_color = if color {
        simplelog::ColorChoice::Auto
    } else {
        simplelog::ColorChoice::Never
    };
    if let Err(e) = TermLogger::init(
        global.log_level(),
        Config::default(),
        TerminalMode::Stderr,
        log_color,
    ) {
        eprintln!("warning: logging unavailable: {e}");
    }

    let result = match cli.command {
        Command::Inspect(ref args) => inspect::run(args, &global),
        Command::Place(ref args) => place::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
