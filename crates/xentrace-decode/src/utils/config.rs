//! Configuration and constants for the decoder.

/// Current JSON export schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Format name reported to the visualization host
pub const FORMAT_NAME: &str = "xentrace_binary";

// Clock defaults
pub const DEFAULT_CPU_HZ: u64 = 2_400_000_000;
pub const NS_PER_SEC: u64 = 1_000_000_000;
/// Fixed-point shift used by the cycle-to-nanosecond conversion
pub const QHZ_SHIFT: u32 = 10;

// Environment inputs read at open time
pub const ENV_CPU_HZ: &str = "XEN_CPUHZ";
pub const ENV_ABSOLUTE_TS: &str = "XEN_ABSTS";

/// Reserved domain id for the idle domain
pub const DOM_IDLE: u16 = 0x7fff;

/// Stream id used when the caller does not assign one
pub const DEFAULT_STREAM_ID: i16 = 0;

/// Visibility mask handed to the host for every loaded entry
pub const ENTRY_VISIBLE: u8 = 0xff;
