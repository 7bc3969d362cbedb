//! Decoding commands: dump, export and stats.
//!
//! Each command:
//! 1. Resolves clock and framing options
//! 2. Opens and indexes the trace
//! 3. Renders the decoded records

use anyhow::{Context, Result};
use log::info;
use std::io::{self, Write};
use std::time::Instant;

use super::models::{DumpArgs, ExportArgs, StatsArgs};
use super::utils::open_session;
use crate::output::{build_export, write_dump, write_dump_file, write_export};
use crate::stats::{compute_stats, render_stats};

/// Execute the dump command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// Number of lines written
///
/// # Errors
/// * Settings or trace decoding failures
/// * Output write errors
pub fn execute_dump(args: DumpArgs) -> Result<usize> {
    let start_time = Instant::now();
    let session = open_session(&args.source)?;

    let lines = match &args.output {
        Some(path) => write_dump_file(&session, args.limit, path)
            .with_context(|| format!("Failed to write dump to {}", path.display()))?,
        None => {
            let stdout = io::stdout();
            write_dump(&session, args.limit, stdout.lock()).context("Failed to write dump")?
        }
    };

    info!(
        "Dumped {} of {} records in {:.2?}",
        lines,
        session.len(),
        start_time.elapsed()
    );
    Ok(lines)
}

/// Execute the export command
///
/// **Public** - main entry point called from main.rs
pub fn execute_export(args: ExportArgs) -> Result<()> {
    let start_time = Instant::now();
    let session = open_session(&args.source)?;

    let export = build_export(&session);
    write_export(&export, &args.output)
        .with_context(|| format!("Failed to write export to {}", args.output.display()))?;

    info!(
        "Exported {} records in {:.2?}",
        export.record_count,
        start_time.elapsed()
    );
    Ok(())
}

/// Execute the stats command
///
/// **Public** - main entry point called from main.rs
pub fn execute_stats(args: StatsArgs) -> Result<()> {
    let session = open_session(&args.source)?;
    let stats = compute_stats(&session, args.top);

    let mut stdout = io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut stdout, &stats).context("Failed to serialize stats")?;
        writeln!(stdout)?;
    } else {
        write!(stdout, "{}", render_stats(&stats))?;
    }
    Ok(())
}
