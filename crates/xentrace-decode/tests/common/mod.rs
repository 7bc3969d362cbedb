//! Synthetic trace builders shared by the integration tests.

#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

pub const CPU_CHANGE: u32 = 0x0001_f003;

/// Builds little-endian `t_rec` streams
#[derive(Debug, Default)]
pub struct TraceBuilder {
    words: Vec<u32>,
}

impl TraceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch subsequent records to `cpu`
    pub fn cpu(mut self, cpu: u32) -> Self {
        self.words.push(CPU_CHANGE | (2 << 28));
        self.words.extend_from_slice(&[cpu, 0]);
        self
    }

    /// Record with a cycle counter
    pub fn event(mut self, id: u32, tsc: u64, extra: &[u32]) -> Self {
        self.words
            .push(id | ((extra.len() as u32) << 28) | (1 << 31));
        self.words.extend_from_slice(&[tsc as u32, (tsc >> 32) as u32]);
        self.words.extend_from_slice(extra);
        self
    }

    /// Record inheriting the previous cycle counter of its CPU
    pub fn event_no_tsc(mut self, id: u32, extra: &[u32]) -> Self {
        self.words.push(id | ((extra.len() as u32) << 28));
        self.words.extend_from_slice(extra);
        self
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    pub fn write_temp(&self) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&self.bytes()).unwrap();
        file.flush().unwrap();
        file
    }
}

/// CPU change to 2, domain_wake for d5/v1, 64-bit VMEXIT
pub fn three_record_trace() -> TraceBuilder {
    TraceBuilder::new()
        .cpu(2)
        .event(0x0002_8004, 1_000_000, &[0x0005_0001])
        .event(0x0008_1102, 1_000_000 + 24_570, &[0x0000_001e, 0x8000_1234, 0xffff_ffff])
}
