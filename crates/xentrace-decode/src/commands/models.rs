use crate::parser::WireFormat;
use std::path::PathBuf;

/// Trace input and decoding options shared by every command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, Default)]
pub struct SourceArgs {
    /// Trace file to decode
    pub input: PathBuf,

    /// Optional TOML settings file
    pub config: Option<PathBuf>,

    /// Clock frequency override (accepts K/M/G suffixes)
    pub cpu_hz: Option<String>,

    /// Absolute timestamps on or off, `None` keeps the settings file value
    pub absolute: Option<bool>,

    /// Wire framing override
    pub format: Option<WireFormat>,
}

/// Arguments for the dump command
#[derive(Debug, Clone, Default)]
pub struct DumpArgs {
    pub source: SourceArgs,

    /// Write lines to this file instead of stdout
    pub output: Option<PathBuf>,

    /// Stop after this many records
    pub limit: Option<usize>,
}

/// Arguments for the export command
#[derive(Debug, Clone)]
pub struct ExportArgs {
    pub source: SourceArgs,

    /// Output path for the JSON export
    pub output: PathBuf,
}

/// Arguments for the stats command
#[derive(Debug, Clone)]
pub struct StatsArgs {
    pub source: SourceArgs,

    /// Number of most frequent events to list
    pub top: usize,

    /// Print statistics as JSON instead of text
    pub json: bool,
}

impl Default for StatsArgs {
    fn default() -> Self {
        Self {
            source: SourceArgs::default(),
            top: 10,
            json: false,
        }
    }
}
