//! Binary trace parsing.
//!
//! This module handles:
//! - Sniffing the stream signature
//! - Framing records under either wire format
//! - Folding CPU and guest context into each record

pub mod reader;
pub mod record;

// Re-export main types
pub use reader::{
    check_format, check_signature, is_xentrace, reader_for, FixedHeaderReader, RecordReader,
    TRecReader, WireFormat,
};
pub use record::TraceRecord;
