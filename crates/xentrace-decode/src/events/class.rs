//! Event classification.
//!
//! Splits a 28-bit event id into its class and subclass. Every id maps to
//! some class; ids outside the known classes land in `EventClass::Unknown`.

use serde::Serialize;
use std::fmt;

use super::ids::{TRC_CLS_SHIFT, TRC_SUBCLS_SHIFT};

/// Major event class of the xentrace id space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventClass {
    Gen,
    Sched,
    Dom0,
    Hvm,
    Mem,
    Pv,
    Shadow,
    Hw,
    Unknown,
}

impl EventClass {
    /// Every class that carries a catalogue
    pub const KNOWN: [EventClass; 8] = [
        EventClass::Gen,
        EventClass::Sched,
        EventClass::Dom0,
        EventClass::Hvm,
        EventClass::Mem,
        EventClass::Pv,
        EventClass::Shadow,
        EventClass::Hw,
    ];

    /// Short lowercase label used in listings and statistics
    pub fn label(self) -> &'static str {
        match self {
            EventClass::Gen => "gen",
            EventClass::Sched => "sched",
            EventClass::Dom0 => "dom0",
            EventClass::Hvm => "hvm",
            EventClass::Mem => "mem",
            EventClass::Pv => "pv",
            EventClass::Shadow => "shadow",
            EventClass::Hw => "hw",
            EventClass::Unknown => "unknown",
        }
    }

    /// Parse a class label (case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        Self::KNOWN
            .into_iter()
            .find(|class| class.label().eq_ignore_ascii_case(label))
    }
}

impl From<u32> for EventClass {
    /// Map the 12-bit class field to a class
    fn from(bits: u32) -> Self {
        match bits {
            0x001 => EventClass::Gen,
            0x002 => EventClass::Sched,
            0x004 => EventClass::Dom0,
            0x008 => EventClass::Hvm,
            0x010 => EventClass::Mem,
            0x020 => EventClass::Pv,
            0x040 => EventClass::Shadow,
            0x080 => EventClass::Hw,
            _ => EventClass::Unknown,
        }
    }
}

impl fmt::Display for EventClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Class field of an event id
pub fn class_bits(event_id: u32) -> u32 {
    (event_id >> TRC_CLS_SHIFT) & 0xfff
}

/// Subclass field of an event id
pub fn subclass(event_id: u32) -> u32 {
    (event_id >> TRC_SUBCLS_SHIFT) & 0xf
}

/// Split an event id into (class, subclass)
///
/// **Public** - pure, never fails
pub fn classify(event_id: u32) -> (EventClass, u32) {
    (EventClass::from(class_bits(event_id)), subclass(event_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_classes() {
        assert_eq!(classify(0x0001_f003), (EventClass::Gen, 0xf));
        assert_eq!(classify(0x0002_8004), (EventClass::Sched, 0x8));
        assert_eq!(classify(0x0008_1102), (EventClass::Hvm, 0x1));
        assert_eq!(classify(0x0040_f006), (EventClass::Shadow, 0xf));
        assert_eq!(classify(0x0080_2008), (EventClass::Hw, 0x2));
    }

    #[test]
    fn test_classify_unknown_class() {
        assert_eq!(classify(0x0003_1001).0, EventClass::Unknown);
        assert_eq!(classify(0x0fff_ffff).0, EventClass::Unknown);
        assert_eq!(classify(0).0, EventClass::Unknown);
    }

    #[test]
    fn test_label_round_trip() {
        for class in EventClass::KNOWN {
            assert_eq!(EventClass::from_label(class.label()), Some(class));
        }
        assert_eq!(EventClass::from_label("SCHED"), Some(EventClass::Sched));
        assert_eq!(EventClass::from_label("bogus"), None);
    }
}
