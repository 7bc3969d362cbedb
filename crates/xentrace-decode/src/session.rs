//! Trace session: the query surface handed to the visualization host.
//!
//! A session owns the fully indexed record list and the clock settings of
//! one open trace. Every query is a pure read keyed by record index, and
//! presentation strings are derived on demand.

use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::clock::{ClockConfig, TimestampNormalizer};
use crate::events::{event_info, name_or_unknown, EventInfo};
use crate::parser::{check_signature, reader_for, TraceRecord, WireFormat};
use crate::utils::config::{DEFAULT_STREAM_ID, ENTRY_VISIBLE, NS_PER_SEC};
use crate::utils::error::ParseError;

/// Settings applied when a trace is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub clock: ClockConfig,
    pub format: WireFormat,
    pub stream_id: i16,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            clock: ClockConfig::default(),
            format: WireFormat::default(),
            stream_id: DEFAULT_STREAM_ID,
        }
    }
}

/// Indexing metadata of one record, as loaded by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub stream_id: i16,
    /// Record index, used to query the session back
    pub offset: usize,
    pub event_id: u32,
    pub cpu: u16,
    /// Normalized timestamp in nanoseconds
    pub ts: i64,
    pub pid: i32,
    pub visible: u8,
}

/// One open trace
#[derive(Debug, Clone)]
pub struct TraceSession {
    records: Vec<TraceRecord>,
    normalizer: TimestampNormalizer,
    options: SessionOptions,
    cpu_count: usize,
}

impl TraceSession {
    /// Open and index a trace file
    ///
    /// **Public** - main entry point for decoding a file
    ///
    /// # Errors
    /// * `ParseError::Io` - file cannot be read
    /// * `ParseError::BadSignature` - not a xentrace stream
    /// * `ParseError::Truncated` - stream ends inside a record
    /// * `ParseError::NoEvents` - no records besides CPU changes
    pub fn open(path: impl AsRef<Path>, options: &SessionOptions) -> Result<Self, ParseError> {
        let path = path.as_ref();
        info!("Opening trace: {}", path.display());
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes, options)
    }

    /// Index a trace held in memory
    pub fn from_bytes(bytes: &[u8], options: &SessionOptions) -> Result<Self, ParseError> {
        check_signature(bytes)?;

        let records = reader_for(options.format, bytes).read_records()?;
        let first = records.first().ok_or(ParseError::NoEvents)?;
        let normalizer = TimestampNormalizer::new(options.clock, first.tsc);

        let cpu_count = records
            .iter()
            .map(|record| record.cpu)
            .collect::<BTreeSet<_>>()
            .len();

        debug!(
            "Indexed {} records on {} CPUs ({:?} framing)",
            records.len(),
            cpu_count,
            options.format
        );

        Ok(Self {
            records,
            normalizer,
            options: *options,
            cpu_count,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&TraceRecord> {
        self.records.get(index)
    }

    /// Number of distinct physical CPUs
    pub fn cpu_count(&self) -> usize {
        self.cpu_count
    }

    /// Distinct non-idle task ids, sorted
    pub fn tasks(&self) -> Vec<i32> {
        self.records
            .iter()
            .filter(|record| !record.is_idle())
            .map(TraceRecord::pid)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn first_tsc(&self) -> u64 {
        self.records.first().map(|record| record.tsc).unwrap_or(0)
    }

    pub fn clock(&self) -> ClockConfig {
        self.options.clock
    }

    pub fn normalizer(&self) -> &TimestampNormalizer {
        &self.normalizer
    }

    pub fn stream_id(&self) -> i16 {
        self.options.stream_id
    }

    pub fn format(&self) -> WireFormat {
        self.options.format
    }

    /// Task label of a record
    pub fn get_task(&self, index: usize) -> Option<String> {
        self.record(index).map(TraceRecord::task_label)
    }

    /// Event name, with the `unknown (0x...)` fallback for unknown ids
    pub fn get_event_name(&self, index: usize) -> Option<String> {
        self.record(index)
            .map(|record| name_or_unknown(record.event_id))
    }

    /// Info string; `None` when the record or its event is not recognized
    pub fn get_info(&self, index: usize) -> Option<String> {
        self.event_info(index).into_option()
    }

    /// Info outcome distinguishing silent events from unknown ones
    pub fn event_info(&self, index: usize) -> EventInfo {
        match self.record(index) {
            Some(record) => event_info(record.event_id, &record.extra),
            None => EventInfo::Unrecognized,
        }
    }

    pub fn get_pid(&self, index: usize) -> Option<i32> {
        self.record(index).map(TraceRecord::pid)
    }

    pub fn get_event_id(&self, index: usize) -> Option<u32> {
        self.record(index).map(|record| record.event_id)
    }

    /// Normalized timestamp in nanoseconds
    pub fn timestamp(&self, index: usize) -> Option<i64> {
        self.record(index)
            .map(|record| self.normalizer.to_nanoseconds(record.tsc))
    }

    /// Indexing metadata for every record, in file order
    pub fn load_entries(&self) -> Vec<Entry> {
        self.records
            .iter()
            .enumerate()
            .map(|(offset, record)| Entry {
                stream_id: self.options.stream_id,
                offset,
                event_id: record.event_id,
                cpu: record.cpu,
                ts: self.normalizer.to_nanoseconds(record.tsc),
                pid: record.pid(),
                visible: ENTRY_VISIBLE,
            })
            .collect()
    }

    /// Plain-text line: `seconds - task - name [ info ]`
    ///
    /// Missing pieces render as empty fields.
    pub fn dump_entry(&self, index: usize) -> String {
        let ts = self
            .timestamp(index)
            .map(|ns| format!("{:.6}", ns as f64 / NS_PER_SEC as f64))
            .unwrap_or_default();

        format!(
            "{} - {} - {} [ {} ]",
            ts,
            self.get_task(index).unwrap_or_default(),
            self.get_event_name(index).unwrap_or_default(),
            self.get_info(index).unwrap_or_default()
        )
    }
}
