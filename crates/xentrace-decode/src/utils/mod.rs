//! Utility modules for configuration and error handling.

pub mod config;
pub mod error;

pub use error::{ConfigError, OutputError, ParseError};
