//! Binary record readers.
//!
//! Two framings exist for the same event catalogue:
//! - `TRec` (canonical): the upstream xentrace `t_rec` layout, where each
//!   header word carries the extra-word count and a "cycles included" bit
//! - `FixedHeader` (historical): event id, packed dom/vcpu and a 64-bit
//!   cycle counter, with the extra-word count taken from the catalogue
//!
//! Both readers fold the "current CPU" cursor into every record they emit,
//! so the resulting list supports pure random access.

use byteorder::{LittleEndian, ReadBytesExt};
use clap::ValueEnum;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use super::record::TraceRecord;
use crate::events::extra_words;
use crate::events::ids::{
    RUNSTATE_CHANGE_MASK, RUNSTATE_RUNNING, TRC_ID_MASK, TRC_SCHED_CONTINUE_RUNNING,
    TRC_SCHED_RUNSTATE_CHANGE, TRC_SCHED_SWITCH_INFNEXT, TRC_TRACE_CPU_CHANGE,
};
use crate::utils::config::DOM_IDLE;
use crate::utils::error::ParseError;

const WORD: usize = 4;

/// Wire framing of a trace stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WireFormat {
    /// Upstream xentrace `t_rec` records
    #[default]
    #[value(name = "trec")]
    #[serde(rename = "trec")]
    TRec,

    /// Fixed header with catalogue-driven payload length
    FixedHeader,
}

/// Sequential parser turning a byte stream into trace records
pub trait RecordReader {
    /// Parse every record in file order
    ///
    /// # Errors
    /// * `ParseError::Truncated` - the stream ends inside a record
    fn read_records(&mut self) -> Result<Vec<TraceRecord>, ParseError>;
}

/// Build the reader for a wire format
pub fn reader_for<'a>(format: WireFormat, bytes: &'a [u8]) -> Box<dyn RecordReader + 'a> {
    match format {
        WireFormat::TRec => Box::new(TRecReader::new(bytes)),
        WireFormat::FixedHeader => Box::new(FixedHeaderReader::new(bytes)),
    }
}

/// Check that a stream starts with the CPU change sentinel
///
/// # Errors
/// * `ParseError::Empty` - no bytes at all
/// * `ParseError::Truncated` - fewer bytes than one word
/// * `ParseError::BadSignature` - first word is not a CPU change record
pub fn check_signature(bytes: &[u8]) -> Result<(), ParseError> {
    if bytes.is_empty() {
        return Err(ParseError::Empty);
    }
    let mut cursor = Cursor::new(bytes);
    let first = cursor
        .read_u32::<LittleEndian>()
        .map_err(|_| ParseError::Truncated {
            offset: 0,
            needed: WORD - bytes.len(),
        })?;

    if first & TRC_ID_MASK != TRC_TRACE_CPU_CHANGE {
        return Err(ParseError::BadSignature(first));
    }
    Ok(())
}

/// Whether the bytes look like a xentrace binary stream
pub fn is_xentrace(bytes: &[u8]) -> bool {
    check_signature(bytes).is_ok()
}

/// Sniff the first word of a file
///
/// **Public** - used by the `check` command and by the host's format probe
pub fn check_format(path: impl AsRef<Path>) -> Result<bool, ParseError> {
    let path = path.as_ref();
    let mut head = Vec::with_capacity(WORD);
    File::open(path)?.take(WORD as u64).read_to_end(&mut head)?;

    let matches = is_xentrace(&head);
    debug!("Format check for {}: {}", path.display(), matches);
    Ok(matches)
}

/// Byte cursor with truncation-aware word reads
struct WordCursor<'a> {
    cursor: Cursor<&'a [u8]>,
    len: u64,
}

impl<'a> WordCursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(bytes),
            len: bytes.len() as u64,
        }
    }

    fn position(&self) -> u64 {
        self.cursor.position()
    }

    fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.position())
    }

    fn at_end(&self) -> bool {
        self.remaining() == 0
    }

    /// Ensure `bytes` more bytes follow the cursor, blaming the record at `start`
    fn require(&self, start: u64, bytes: usize) -> Result<(), ParseError> {
        let remaining = self.remaining();
        if remaining < bytes as u64 {
            return Err(ParseError::Truncated {
                offset: start,
                needed: bytes - remaining as usize,
            });
        }
        Ok(())
    }

    fn word(&mut self) -> Result<u32, ParseError> {
        Ok(self.cursor.read_u32::<LittleEndian>()?)
    }

    fn wide(&mut self) -> Result<u64, ParseError> {
        let lo = self.word()?;
        let hi = self.word()?;
        Ok((u64::from(hi) << 32) | u64::from(lo))
    }

    fn words(&mut self, count: usize) -> Result<Vec<u32>, ParseError> {
        (0..count).map(|_| self.word()).collect()
    }
}

/// CPU cursor shared by both framings
#[derive(Debug, Default)]
struct CpuState {
    current: u16,
}

impl CpuState {
    /// Apply a CPU change record, returning true when `event_id` was one
    fn apply_cpu_change(&mut self, event_id: u32, extra: &[u32]) -> bool {
        if event_id != TRC_TRACE_CPU_CHANGE {
            return false;
        }
        let cpu = extra.first().copied().unwrap_or(0) & 0xffff;
        trace!("CPU change: {} -> {}", self.current, cpu);
        self.current = cpu as u16;
        true
    }
}

/// Reader for upstream `t_rec` framing
pub struct TRecReader<'a> {
    input: WordCursor<'a>,
    cpu: CpuState,
    last_tsc: HashMap<u16, u64>,
    latest_tsc: Option<u64>,
    context: HashMap<u16, (u16, u16)>,
}

impl<'a> TRecReader<'a> {
    const EXTRA_SHIFT: u32 = 28;
    const EXTRA_MASK: u32 = 0x7;
    const CYCLES_FLAG: u32 = 1 << 31;

    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            input: WordCursor::new(bytes),
            cpu: CpuState::default(),
            last_tsc: HashMap::new(),
            latest_tsc: None,
            context: HashMap::new(),
        }
    }

    /// Guest context last scheduled on a CPU
    fn context_of(&self, cpu: u16) -> (u16, u16) {
        self.context.get(&cpu).copied().unwrap_or((DOM_IDLE, cpu))
    }

    /// Track which guest runs on the current CPU after a scheduler event
    fn update_context(&mut self, cpu: u16, event_id: u32, extra: &[u32]) {
        let first = extra.first().copied().unwrap_or(0);
        let to_running = event_id & RUNSTATE_CHANGE_MASK == TRC_SCHED_RUNSTATE_CHANGE
            && (event_id >> 4) & 0xf == RUNSTATE_RUNNING;

        let next = if to_running || event_id == TRC_SCHED_CONTINUE_RUNNING {
            Some(((first >> 16) as u16, (first & 0xffff) as u16))
        } else if event_id == TRC_SCHED_SWITCH_INFNEXT {
            let vcpu = extra.get(1).copied().unwrap_or(0);
            Some((first as u16, vcpu as u16))
        } else {
            None
        };

        if let Some(context) = next {
            self.context.insert(cpu, context);
        }
    }
}

impl RecordReader for TRecReader<'_> {
    fn read_records(&mut self) -> Result<Vec<TraceRecord>, ParseError> {
        let mut records: Vec<TraceRecord> = Vec::new();
        // Records seen before any cycle counter, stamped by the first one
        let mut unstamped: Vec<usize> = Vec::new();

        while !self.input.at_end() {
            let start = self.input.position();
            self.input.require(start, WORD)?;
            let header = self.input.word()?;

            let event_id = header & TRC_ID_MASK;
            let count = ((header >> Self::EXTRA_SHIFT) & Self::EXTRA_MASK) as usize;
            let has_cycles = header & Self::CYCLES_FLAG != 0;

            let body = count * WORD + if has_cycles { 2 * WORD } else { 0 };
            self.input.require(start, body)?;

            let tsc = if has_cycles {
                Some(self.input.wide()?)
            } else {
                None
            };
            let extra = self.input.words(count)?;

            if self.cpu.apply_cpu_change(event_id, &extra) {
                continue;
            }

            if let Some(expected) = extra_words(event_id) {
                if expected != count {
                    debug!(
                        "Event 0x{:08x} at offset {} carries {} words (catalogue: {})",
                        event_id, start, count, expected
                    );
                }
            }

            let cpu = self.cpu.current;
            let tsc = match tsc {
                Some(tsc) => {
                    self.last_tsc.insert(cpu, tsc);
                    self.latest_tsc = Some(tsc);
                    if !unstamped.is_empty() {
                        debug!("Stamping {} leading records with tsc {}", unstamped.len(), tsc);
                    }
                    for index in unstamped.drain(..) {
                        records[index].tsc = tsc;
                    }
                    tsc
                }
                // Inherit from this CPU, else from the most recent CPU
                None => match self.last_tsc.get(&cpu).copied().or(self.latest_tsc) {
                    Some(tsc) => tsc,
                    None => {
                        unstamped.push(records.len());
                        0
                    }
                },
            };
            let (dom, vcpu) = self.context_of(cpu);

            self.update_context(cpu, event_id, &extra);

            records.push(TraceRecord {
                event_id,
                cpu,
                tsc,
                dom,
                vcpu,
                extra,
                offset: start,
            });
        }

        debug!("Parsed {} t_rec records", records.len());
        Ok(records)
    }
}

/// Reader for the fixed-header framing
pub struct FixedHeaderReader<'a> {
    input: WordCursor<'a>,
    cpu: CpuState,
}

impl<'a> FixedHeaderReader<'a> {
    /// Event id, packed dom/vcpu and two cycle words
    const HEADER_BYTES: usize = 4 * WORD;

    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            input: WordCursor::new(bytes),
            cpu: CpuState::default(),
        }
    }
}

impl RecordReader for FixedHeaderReader<'_> {
    fn read_records(&mut self) -> Result<Vec<TraceRecord>, ParseError> {
        let mut records = Vec::new();

        while !self.input.at_end() {
            let start = self.input.position();
            self.input.require(start, Self::HEADER_BYTES)?;

            let event_id = self.input.word()? & TRC_ID_MASK;
            let packed = self.input.word()?;
            let tsc = self.input.wide()?;

            let count = extra_words(event_id).unwrap_or(0);
            self.input.require(start, count * WORD)?;
            let extra = self.input.words(count)?;

            if self.cpu.apply_cpu_change(event_id, &extra) {
                continue;
            }

            records.push(TraceRecord {
                event_id,
                cpu: self.cpu.current,
                tsc,
                dom: (packed >> 16) as u16,
                vcpu: (packed & 0xffff) as u16,
                extra,
                offset: start,
            });
        }

        debug!("Parsed {} fixed-header records", records.len());
        Ok(records)
    }
}
