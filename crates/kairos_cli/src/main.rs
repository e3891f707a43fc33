//! Kairos CLI: static timing analysis of Yosys gate-level netlists.
//!
//! Provides `kairos analyze` for the full setup/hold check, `kairos paths`
//! for listing every enumerated path, and `kairos info` for inspecting a
//! netlist.

#![warn(missing_docs)]

mod analyze;
mod info;
mod paths;
mod pipeline;

use std::io::IsTerminal;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use kairos_config::Endpoints;
use kairos_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticRenderer, TerminalRenderer};
use tracing_subscriber::EnvFilter;

/// Kairos: path-based static timing analysis.
#[derive(Parser, Debug)]
#[command(name = "kairos", version, about = "Static timing analysis for gate-level netlists")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `kairos.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run setup and hold analysis on a netlist.
    Analyze(AnalyzeArgs),
    /// List every enumerated path with its delay.
    Paths(PathsArgs),
    /// Show the cells, ports and nets of a netlist.
    Info(InfoArgs),
}

/// Arguments for the `kairos analyze` subcommand.
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Yosys JSON netlist.
    pub netlist: String,

    /// Number of longest and shortest paths to check.
    #[arg(short = 'n', long)]
    pub paths: Option<usize>,

    /// Override the clock period.
    #[arg(long)]
    pub clock_period: Option<f64>,

    /// Output format for the report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Which nets are capture points.
    #[arg(long, value_enum)]
    pub endpoints: Option<EndpointsArg>,

    /// Enumerate paths on all cores.
    #[arg(long)]
    pub parallel: bool,
}

/// Arguments for the `kairos paths` subcommand.
#[derive(Parser, Debug)]
pub struct PathsArgs {
    /// Yosys JSON netlist.
    pub netlist: String,

    /// Which nets are capture points.
    #[arg(long, value_enum)]
    pub endpoints: Option<EndpointsArg>,
}

/// Arguments for the `kairos info` subcommand.
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Yosys JSON netlist.
    pub netlist: String,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Capture point selection on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EndpointsArg {
    /// Only primary outputs.
    Outputs,
    /// Primary outputs and flip-flop data inputs.
    All,
}

impl From<EndpointsArg> for Endpoints {
    fn from(arg: EndpointsArg) -> Self {
        match arg {
            EndpointsArg::Outputs => Endpoints::PrimaryOutputs,
            EndpointsArg::All => Endpoints::OutputsAndRegisters,
        }
    }
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from the terminal.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    init_logging(cli.quiet, cli.verbose);

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Analyze(ref args) => analyze::run(args, &global),
        Command::Paths(ref args) => paths::run(args, &global),
        Command::Info(ref args) => info::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            let diag = Diagnostic::error(DiagnosticCode::COMMAND_FAILED, e.to_string());
            eprint!("{}", TerminalRenderer::new(global.color).render(&diag));
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over the flags.
fn init_logging(quiet: bool, verbose: bool) {
    let default = default_log_level(quiet, verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn default_log_level(quiet: bool, verbose: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    }
}
