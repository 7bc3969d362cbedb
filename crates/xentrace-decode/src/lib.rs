//! Xentrace Decode
//!
//! Decoder for binary trace records produced by the Xen hypervisor's
//! `xentrace` tool, usable as a data source for trace visualizers such as
//! KernelShark.
//!
//! The crate provides:
//! - record readers for the `t_rec` stream format (and the older
//!   fixed-header framing)
//! - the event catalogue mapping ids and payload words to names and info
//! - cycle counter to nanosecond conversion
//! - a [`session::TraceSession`] exposing per-record queries
//!
//! ## Getting Started
//!
//! ```bash
//! cargo install xentrace-dump
//! xentrace-dump dump trace.bin
//! ```

pub mod clock;
pub mod commands;
pub mod events;
pub mod output;
pub mod parser;
pub mod session;
pub mod settings;
pub mod stats;
pub mod utils;

pub use clock::{ClockConfig, TimestampNormalizer};
pub use events::{event_info, event_name, name_or_unknown, EventClass, EventInfo};
pub use parser::{TraceRecord, WireFormat};
pub use session::{Entry, SessionOptions, TraceSession};
pub use utils::config::FORMAT_NAME;
pub use utils::error::{ConfigError, OutputError, ParseError};
