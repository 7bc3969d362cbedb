//! Plain-text dump writer.

use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::prepare_output_path;
use crate::session::TraceSession;
use crate::utils::error::OutputError;

/// Write dump lines for the first `limit` records (all when `None`)
///
/// # Returns
/// Number of lines written
pub fn write_dump<W: Write>(
    session: &TraceSession,
    limit: Option<usize>,
    mut writer: W,
) -> Result<usize, OutputError> {
    let count = limit.map_or(session.len(), |limit| limit.min(session.len()));
    for index in 0..count {
        writeln!(writer, "{}", session.dump_entry(index))?;
    }
    writer.flush()?;
    Ok(count)
}

/// Write the dump to a file, creating parent directories as needed
pub fn write_dump_file(
    session: &TraceSession,
    limit: Option<usize>,
    output_path: impl AsRef<Path>,
) -> Result<usize, OutputError> {
    let output_path = output_path.as_ref();
    info!("Writing dump to: {}", output_path.display());

    prepare_output_path(output_path)?;
    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let lines = write_dump(session, limit, BufWriter::new(file))?;

    info!("Dump written successfully ({} lines)", lines);
    Ok(lines)
}
