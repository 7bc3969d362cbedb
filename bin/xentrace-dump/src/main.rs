//! Xentrace Dump CLI
//!
//! Decodes Xen hypervisor binary traces into readable event listings,
//! JSON exports and summary statistics.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::convert::Infallible;
use std::path::PathBuf;
use std::process::ExitCode;

use xentrace_decode::clock::parse_flag;
use xentrace_decode::commands::{
    check_file, display_version, execute_dump, execute_export, execute_stats, list_events,
    DumpArgs, ExportArgs, SourceArgs, StatsArgs,
};
use xentrace_decode::utils::config::{ENV_ABSOLUTE_TS, ENV_CPU_HZ};
use xentrace_decode::WireFormat;

/// Xentrace Dump - decoder for Xen binary traces
#[derive(Parser, Debug)]
#[command(name = "xentrace-dump")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Cycle counter frequency, e.g. 2400000000 or 2.4G
    #[arg(long, global = true, env = ENV_CPU_HZ)]
    cpu_hz: Option<String>,

    /// Report timestamps from counter zero instead of the first record
    ///
    /// `--absolute=false` turns off an absolute mode set elsewhere.
    #[arg(
        long,
        global = true,
        env = ENV_ABSOLUTE_TS,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = parse_absolute
    )]
    absolute: Option<bool>,

    /// Record framing of the input
    #[arg(long, value_enum, global = true)]
    format: Option<WireFormat>,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print one line per record
    Dump {
        /// Trace file
        input: PathBuf,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum number of records to print
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Export decoded records as JSON
    Export {
        /// Trace file
        input: PathBuf,

        /// Output path for the JSON export (placed in artifacts/ by default)
        #[arg(short, long, default_value = "artifacts/trace.json")]
        output: PathBuf,
    },

    /// Summarize event counts per class, CPU and event
    Stats {
        /// Trace file
        input: PathBuf,

        /// Number of most frequent events to list
        #[arg(long, default_value = "10")]
        top: usize,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Check whether a file is a xentrace binary trace
    Check {
        /// File to probe
        input: PathBuf,
    },

    /// List the event catalogue
    Events {
        /// Only list one class (gen, sched, dom0, hvm, mem, pv, shadow, hw)
        #[arg(long)]
        class: Option<String>,
    },

    /// Display version information
    Version,
}

fn parse_absolute(raw: &str) -> Result<bool, Infallible> {
    Ok(parse_flag(raw))
}

fn main() -> Result<ExitCode> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let source = |input: PathBuf| SourceArgs {
        input,
        config: cli.config.clone(),
        cpu_hz: cli.cpu_hz.clone(),
        absolute: cli.absolute,
        format: cli.format,
    };

    // Execute command
    match cli.command {
        Commands::Dump {
            ref input,
            ref output,
            limit,
        } => {
            execute_dump(DumpArgs {
                source: source(input.clone()),
                output: output.clone(),
                limit,
            })?;
        }

        Commands::Export {
            ref input,
            ref output,
        } => {
            execute_export(ExportArgs {
                source: source(input.clone()),
                output: output.clone(),
            })?;
            println!("✓ Export written to {}", output.display());
        }

        Commands::Stats {
            ref input,
            top,
            json,
        } => {
            execute_stats(StatsArgs {
                source: source(input.clone()),
                top,
                json,
            })?;
        }

        Commands::Check { ref input } => {
            if !check_file(input)? {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Events { ref class } => {
            list_events(class.as_deref())?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(ExitCode::SUCCESS)
}
