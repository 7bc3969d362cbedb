//! Decoder settings loaded from TOML.
//!
//! Resolution order: built-in defaults, then the config file, then the
//! `XEN_CPUHZ`/`XEN_ABSTS` environment, then explicit command-line flags.
//! The environment reaches the decoder through the flags it backs.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::clock::{parse_cpu_hz, ClockConfig};
use crate::parser::WireFormat;
use crate::session::SessionOptions;
use crate::utils::config::DEFAULT_STREAM_ID;
use crate::utils::error::ConfigError;

/// Frequency given either as a number or as text with a unit suffix
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Frequency {
    Hz(u64),
    Text(String),
}

impl Frequency {
    pub fn resolve(&self) -> Result<u64, ConfigError> {
        match self {
            Frequency::Hz(0) => Err(ConfigError::InvalidFrequency("0".to_string())),
            Frequency::Hz(hz) => Ok(*hz),
            Frequency::Text(text) => {
                parse_cpu_hz(text).ok_or_else(|| ConfigError::InvalidFrequency(text.clone()))
            }
        }
    }
}

/// `[clock]` table
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClockSection {
    /// Cycle counter frequency
    pub cpu_hz: Option<Frequency>,

    /// Absolute timestamps
    pub absolute: Option<bool>,
}

/// Complete settings file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DecoderSettings {
    #[serde(default)]
    pub clock: ClockSection,

    /// Wire framing of input traces
    #[serde(default)]
    pub format: Option<WireFormat>,

    /// Stream id reported with loaded entries
    #[serde(default)]
    pub stream_id: Option<i16>,
}

impl DecoderSettings {
    /// Merge onto defaults, producing session options
    ///
    /// # Errors
    /// * `ConfigError::InvalidFrequency` - `cpu_hz` cannot be parsed
    pub fn to_options(&self) -> Result<SessionOptions, ConfigError> {
        let mut clock = ClockConfig::default();
        if let Some(freq) = &self.clock.cpu_hz {
            clock.cpu_hz = freq.resolve()?;
        }
        if let Some(absolute) = self.clock.absolute {
            clock.absolute = absolute;
        }

        Ok(SessionOptions {
            clock,
            format: self.format.unwrap_or_default(),
            stream_id: self.stream_id.unwrap_or(DEFAULT_STREAM_ID),
        })
    }
}

/// Load settings from a TOML file
///
/// # Arguments
/// * `path` - Path to the TOML configuration file
///
/// # Errors
/// * `ConfigError::Io` - If file cannot be read
/// * `ConfigError::Toml` - If TOML is invalid
///
/// # Example
/// ```ignore
/// let settings = load_settings("xentrace.toml")?;
/// ```
pub fn load_settings(path: impl AsRef<Path>) -> Result<DecoderSettings, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_settings(&contents)
}

/// Parse settings from TOML text
pub fn parse_settings(contents: &str) -> Result<DecoderSettings, ConfigError> {
    Ok(toml::from_str(contents)?)
}
