//! JSON export writer.
//!
//! Serializes every decoded record together with the session metadata.

use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::prepare_output_path;
use crate::session::TraceSession;
use crate::utils::config::{FORMAT_NAME, SCHEMA_VERSION};
use crate::utils::error::OutputError;

/// Decoded trace ready for serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceExport {
    /// Export schema version
    pub version: String,

    /// Data format name
    pub format: String,

    /// ISO 8601 creation time
    pub generated_at: String,

    pub cpu_hz: u64,
    pub absolute: bool,
    pub cpu_count: usize,
    pub record_count: usize,

    pub records: Vec<ExportRecord>,
}

/// One decoded record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub index: usize,
    pub cpu: u16,
    pub ts_ns: i64,
    pub task: String,
    pub pid: i32,
    /// Event id as `0x` hex
    pub event_id: String,
    pub name: String,
    /// Absent for unrecognized events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

/// Build the export structure for a session
///
/// **Public** - used by the export command and tests
pub fn build_export(session: &TraceSession) -> TraceExport {
    let records = session
        .load_entries()
        .into_iter()
        .map(|entry| ExportRecord {
            index: entry.offset,
            cpu: entry.cpu,
            ts_ns: entry.ts,
            task: session.get_task(entry.offset).unwrap_or_default(),
            pid: entry.pid,
            event_id: format!("0x{:08x}", entry.event_id),
            name: session.get_event_name(entry.offset).unwrap_or_default(),
            info: session.get_info(entry.offset),
        })
        .collect::<Vec<_>>();

    let clock = session.clock();
    TraceExport {
        version: SCHEMA_VERSION.to_string(),
        format: FORMAT_NAME.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        cpu_hz: clock.cpu_hz,
        absolute: clock.absolute,
        cpu_count: session.cpu_count(),
        record_count: records.len(),
        records,
    }
}

/// Write an export to a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_export(export: &TraceExport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing export to: {}", output_path.display());
    prepare_output_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, export).map_err(OutputError::SerializationFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "Export written successfully ({} bytes)",
        std::fs::metadata(output_path).map(|m| m.len()).unwrap_or(0)
    );
    Ok(())
}

/// Read an export back from a JSON file
pub fn read_export(input_path: impl AsRef<Path>) -> Result<TraceExport, OutputError> {
    let input_path = input_path.as_ref();
    debug!("Reading export from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let export: TraceExport =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Export loaded: version {}, {} records",
        export.version, export.record_count
    );
    Ok(export)
}
