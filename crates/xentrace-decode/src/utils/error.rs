//! Error types for the entire library.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in commands and main.rs.

use thiserror::Error;

/// Errors that abort opening a trace stream
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("I/O error while reading trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a xentrace binary stream (first word 0x{0:08x})")]
    BadSignature(u32),

    #[error("Trace is empty")]
    Empty,

    #[error("Truncated record at byte offset {offset} (needed {needed} more bytes)")]
    Truncated { offset: u64, needed: usize },

    #[error("Trace contains no events")]
    NoEvents,
}

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid clock frequency: {0}")]
    InvalidFrequency(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
