//! Clock configuration and cycle-to-nanosecond conversion.
//!
//! Conversion uses the fixed-point scheme of the xentrace tools:
//! `qhz = (cpu_hz << 10) / 1e9` is computed once, then every timestamp is
//! `(cycles << 10) / qhz`. This keeps floating point out of the per-record
//! path. The shift is done in 128 bits, so counters above 2^54 scale
//! correctly instead of wrapping the way a 64-bit shift would; below that
//! the results match the xentrace tools bit for bit.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::utils::config::{DEFAULT_CPU_HZ, ENV_ABSOLUTE_TS, ENV_CPU_HZ, NS_PER_SEC, QHZ_SHIFT};

/// Clock settings resolved once when a trace is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Cycle counter frequency in Hz
    pub cpu_hz: u64,

    /// Use the raw counter as epoch instead of the first record
    pub absolute: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            cpu_hz: DEFAULT_CPU_HZ,
            absolute: false,
        }
    }
}

impl ClockConfig {
    pub fn new(cpu_hz: u64, absolute: bool) -> Self {
        Self { cpu_hz, absolute }
    }

    /// Defaults overridden by `XEN_CPUHZ` and `XEN_ABSTS`
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key/value source
    ///
    /// Unparseable frequencies keep the current value and log a warning.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_CPU_HZ) {
            match parse_cpu_hz(&raw) {
                Some(hz) => self.cpu_hz = hz,
                None => warn!(
                    "Ignoring invalid {}={:?}, keeping {} Hz",
                    ENV_CPU_HZ, raw, self.cpu_hz
                ),
            }
        }
        if let Some(raw) = lookup(ENV_ABSOLUTE_TS) {
            self.absolute = parse_flag(&raw);
        }
        self
    }

    /// Set the frequency from user text, falling back to the default
    pub fn set_cpu_hz_str(&mut self, raw: &str) {
        self.cpu_hz = parse_cpu_hz(raw).unwrap_or_else(|| {
            warn!("Invalid CPU frequency {:?}, using {} Hz", raw, DEFAULT_CPU_HZ);
            DEFAULT_CPU_HZ
        });
    }
}

/// Parse a frequency such as `2400000000`, `2.4G`, `800M` or `3GHz`
///
/// Returns `None` for unparseable input and for zero.
pub fn parse_cpu_hz(raw: &str) -> Option<u64> {
    let mut text = raw.trim();
    if let Some(stem) = text.len().checked_sub(2).and_then(|cut| {
        text.get(cut..)
            .filter(|unit| unit.eq_ignore_ascii_case("hz"))
            .and_then(|_| text.get(..cut))
    }) {
        text = stem;
    }

    let (number, multiplier) = match text.chars().last()? {
        'k' | 'K' => (&text[..text.len() - 1], 1_000),
        'm' | 'M' => (&text[..text.len() - 1], 1_000_000),
        'g' | 'G' => (&text[..text.len() - 1], 1_000_000_000),
        _ => (text, 1),
    };

    let hz = scale_decimal(number.trim(), multiplier)?;
    (hz > 0).then_some(hz)
}

/// Exact `number * multiplier` for a plain decimal string
fn scale_decimal(number: &str, multiplier: u64) -> Option<u64> {
    let (int, frac) = number.split_once('.').unwrap_or((number, ""));
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int.is_empty() && frac.is_empty()) || !is_digits(int) || !is_digits(frac) {
        return None;
    }

    let digits: u128 = format!("{}{}", int, frac).parse().ok()?;
    let divisor = 10u128.checked_pow(u32::try_from(frac.len()).ok()?)?;
    let hz = digits.checked_mul(u128::from(multiplier))? / divisor;
    u64::try_from(hz).ok()
}

/// Boolean-like configuration value: true when it starts with 1, y or t
pub fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().chars().next(), Some('1' | 'y' | 'Y' | 't' | 'T'))
}

/// Fixed-point frequency constant for a clock rate
pub fn qhz_from_hz(cpu_hz: u64) -> u64 {
    ((u128::from(cpu_hz) << QHZ_SHIFT) / u128::from(NS_PER_SEC)) as u64
}

/// Converts raw cycle counts to nanoseconds for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampNormalizer {
    qhz: u64,
    epoch: u64,
    config: ClockConfig,
}

impl TimestampNormalizer {
    /// Build a normalizer for a trace whose first record has `first_tsc`
    pub fn new(config: ClockConfig, first_tsc: u64) -> Self {
        let mut qhz = qhz_from_hz(config.cpu_hz);
        if qhz == 0 {
            warn!(
                "CPU frequency {} Hz is too low to convert, using {} Hz",
                config.cpu_hz, DEFAULT_CPU_HZ
            );
            qhz = qhz_from_hz(DEFAULT_CPU_HZ);
        }
        let epoch = if config.absolute { 0 } else { first_tsc };

        debug!(
            "Clock: {} Hz (qhz {}), epoch {}",
            config.cpu_hz, qhz, epoch
        );

        Self { qhz, epoch, config }
    }

    pub fn config(&self) -> ClockConfig {
        self.config
    }

    pub fn qhz(&self) -> u64 {
        self.qhz
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Nanoseconds relative to the configured epoch
    ///
    /// Counters earlier than the epoch yield negative values.
    pub fn to_nanoseconds(&self, tsc: u64) -> i64 {
        self.since(self.epoch, tsc)
    }

    /// Nanoseconds since counter zero, whatever the epoch policy
    pub fn to_nanoseconds_absolute(&self, tsc: u64) -> i64 {
        self.since(0, tsc)
    }

    fn since(&self, epoch: u64, tsc: u64) -> i64 {
        if tsc >= epoch {
            self.scale(tsc - epoch)
        } else {
            -self.scale(epoch - tsc)
        }
    }

    fn scale(&self, cycles: u64) -> i64 {
        let ns = (u128::from(cycles) << QHZ_SHIFT) / u128::from(self.qhz);
        i64::try_from(ns).unwrap_or(i64::MAX)
    }
}
