use anyhow::{Context, Result};
use colored::*;
use log::{debug, warn};
use std::path::Path;

use super::models::SourceArgs;
use crate::clock::parse_cpu_hz;
use crate::events::{catalogue, catalogue_for, EventClass};
use crate::parser::check_format;
use crate::session::{SessionOptions, TraceSession};
use crate::settings::{load_settings, DecoderSettings};
use crate::utils::config::{FORMAT_NAME, SCHEMA_VERSION};

/// Resolve session options from file, environment and flags
///
/// Later sources win: settings file, then flags. The binary binds
/// `XEN_CPUHZ`/`XEN_ABSTS` to the matching flags, so the environment
/// sits between the two.
pub fn resolve_options(args: &SourceArgs) -> Result<SessionOptions> {
    let settings = match &args.config {
        Some(path) => load_settings(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => DecoderSettings::default(),
    };

    let mut options = settings
        .to_options()
        .context("Invalid settings file")?;

    if let Some(raw) = &args.cpu_hz {
        match parse_cpu_hz(raw) {
            Some(hz) => options.clock.cpu_hz = hz,
            None => warn!("Ignoring invalid --cpu-hz {:?}", raw),
        }
    }
    if let Some(absolute) = args.absolute {
        options.clock.absolute = absolute;
    }
    if let Some(format) = args.format {
        options.format = format;
    }

    debug!("Session options: {:?}", options);
    Ok(options)
}

/// Open the trace named by the source arguments
pub fn open_session(args: &SourceArgs) -> Result<TraceSession> {
    let options = resolve_options(args)?;
    TraceSession::open(&args.input, &options)
        .with_context(|| format!("Failed to decode {}", args.input.display()))
}

/// Check whether a file carries the xentrace signature
///
/// # Returns
/// `true` when the file matches
pub fn check_file(path: &Path) -> Result<bool> {
    let matches = check_format(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if matches {
        println!("{} {} ({})", "✓".green(), path.display(), FORMAT_NAME);
    } else {
        println!("{} {} is not a xentrace binary trace", "✗".red(), path.display());
    }
    Ok(matches)
}

/// Print the event catalogue, optionally for one class
pub fn list_events(class: Option<&str>) -> Result<()> {
    let defs: Vec<_> = match class {
        Some(label) => {
            let class = EventClass::from_label(label)
                .with_context(|| format!("Unknown event class: {}", label))?;
            catalogue_for(class).collect()
        }
        None => catalogue().collect(),
    };

    println!("{:<12} {:<8} {:<40} {:>5}", "ID", "CLASS", "NAME", "WORDS");
    println!("{}", "=".repeat(68));
    for def in &defs {
        let name = format!("{:<40}", def.name);
        let name = if def.info.is_some() {
            name.normal()
        } else {
            name.dimmed()
        };
        println!(
            "0x{:08x}   {:<8} {} {:>5}",
            def.id,
            def.class().label(),
            name,
            def.words
        );
    }
    println!("{}", "=".repeat(68));
    println!("{} events", defs.len());
    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("xentrace-decode v{}", env!("CARGO_PKG_VERSION"));
    println!("Export Schema: v{}", SCHEMA_VERSION);
    println!("Data Format: {}", FORMAT_NAME);
    println!();
    println!("A decoder for Xen hypervisor binary trace records.");
}
