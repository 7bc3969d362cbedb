//! Event catalogue and per-class formatters.
//!
//! Each class module holds static tables of [`EventDef`] entries. An entry
//! names one event id, the number of extra words it carries and an
//! optional info formatter. Dispatch goes class -> subclass table -> exact
//! id, so ids that no table lists fall through to a single default.

use std::fmt;
use std::ops::Index;

/// Build an [`EventDef`], optionally with an info formatter body
///
/// `event!(id, name, words)` declares a recognized event without info.
/// `event!(id, name, words, |w| body)` declares one whose info is `body`.
macro_rules! event {
    ($id:expr, $name:expr, $words:expr) => {
        $crate::events::EventDef {
            id: $id,
            name: $name,
            words: $words,
            info: None,
        }
    };
    ($id:expr, $name:expr, $words:expr, |$w:ident| $body:expr) => {{
        fn info($w: &$crate::events::Words<'_>) -> String {
            $body
        }
        $crate::events::EventDef {
            id: $id,
            name: $name,
            words: $words,
            info: Some(info),
        }
    }};
}

pub mod base;
pub mod class;
pub mod dom0;
pub mod hvm;
pub mod ids;
pub mod mem;
pub mod pv;
pub mod sched;
pub mod shadow;
pub mod hw;

pub use class::{classify, EventClass};

use ids::TRC_ID_MASK;

/// Info formatter of a catalogue entry
pub type InfoFn = fn(&Words<'_>) -> String;

/// One catalogue entry
#[derive(Clone, Copy)]
pub struct EventDef {
    /// Full 28-bit event id
    pub id: u32,

    /// Event name shown by the host
    pub name: &'static str,

    /// Number of extra words the event carries
    pub words: usize,

    /// Info formatter, `None` for events with nothing to show
    pub info: Option<InfoFn>,
}

impl fmt::Debug for EventDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDef")
            .field("id", &format_args!("0x{:08x}", self.id))
            .field("name", &self.name)
            .field("words", &self.words)
            .field("info", &self.info.is_some())
            .finish()
    }
}

impl EventDef {
    /// Render the info string for a payload
    pub fn format_info(&self, extra: &[u32]) -> EventInfo {
        match self.info {
            Some(info) => EventInfo::Text(info(&Words::new(extra))),
            None => EventInfo::Empty,
        }
    }

    pub fn class(&self) -> EventClass {
        classify(self.id).0
    }
}

/// Outcome of formatting the info string of an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventInfo {
    /// The id is not in the catalogue
    Unrecognized,

    /// Recognized event without printable info
    Empty,

    /// Formatted info string
    Text(String),
}

impl EventInfo {
    /// Info string, `None` when the event is not recognized
    pub fn into_option(self) -> Option<String> {
        match self {
            EventInfo::Unrecognized => None,
            EventInfo::Empty => Some(String::new()),
            EventInfo::Text(text) => Some(text),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, EventInfo::Unrecognized)
    }
}

static ZERO: u32 = 0;

/// Read-only view over the extra words of a record
///
/// Indexing past the recorded words yields 0, so formatters never read
/// beyond what the record holds.
#[derive(Debug, Clone, Copy)]
pub struct Words<'a>(&'a [u32]);

impl<'a> Words<'a> {
    pub fn new(words: &'a [u32]) -> Self {
        Self(words)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Word reinterpreted as a signed value
    pub fn int(&self, i: usize) -> i32 {
        self[i] as i32
    }

    /// 64-bit value stored as two words, `hi` and `lo`
    pub fn wide(&self, hi: usize, lo: usize) -> u64 {
        (u64::from(self[hi]) << 32) | u64::from(self[lo])
    }

    /// Hex rendering of a 64-bit value stored as two words
    pub fn hex64(&self, hi: usize, lo: usize) -> String {
        format!("0x{:016x}", self.wide(hi, lo))
    }

    /// `dom:vcpu` pair starting at word `i`
    ///
    /// Two words hold domain and vcpu separately. When `i` is the last
    /// recorded word it holds both, packed as `dom << 16 | vcpu`.
    pub fn dom_vcpu(&self, i: usize) -> String {
        let (dom, vcpu) = if self.len() == i + 1 {
            (self[i] >> 16, self[i] & 0xffff)
        } else {
            (self[i], self[i + 1])
        };
        format!("0x{:04x}{:04x}", dom, vcpu)
    }
}

impl Index<usize> for Words<'_> {
    type Output = u32;

    fn index(&self, i: usize) -> &u32 {
        self.0.get(i).unwrap_or(&ZERO)
    }
}

/// Catalogue tables for one class, selected by the event id
fn tables_for(event_id: u32) -> &'static [EventDef] {
    let (class, _) = classify(event_id);
    match class {
        EventClass::Gen => base::table(event_id),
        EventClass::Sched => sched::table(event_id),
        EventClass::Dom0 => dom0::table(event_id),
        EventClass::Hvm => hvm::table(event_id),
        EventClass::Mem => mem::table(event_id),
        EventClass::Pv => pv::table(event_id),
        EventClass::Shadow => shadow::table(event_id),
        EventClass::Hw => hw::table(event_id),
        EventClass::Unknown => &[],
    }
}

/// Find the catalogue entry for an event id
///
/// **Public** - main entry point for name and info lookups
pub fn lookup(event_id: u32) -> Option<&'static EventDef> {
    let event_id = event_id & TRC_ID_MASK;
    tables_for(event_id).iter().find(|def| def.id == event_id)
}

/// Event name, `None` when the id is not recognized
pub fn event_name(event_id: u32) -> Option<&'static str> {
    lookup(event_id).map(|def| def.name)
}

/// Fallback label for ids the catalogue does not know
pub fn unknown_name(event_id: u32) -> String {
    format!("unknown (0x{:08x})", event_id)
}

/// Event name with the `unknown (0x...)` fallback applied
pub fn name_or_unknown(event_id: u32) -> String {
    event_name(event_id)
        .map(str::to_string)
        .unwrap_or_else(|| unknown_name(event_id))
}

/// Format the info string of an event
///
/// # Arguments
/// * `event_id` - Event id (upper flag bits are ignored)
/// * `extra` - Extra words of the record
///
/// # Returns
/// `EventInfo::Unrecognized` for unknown ids, `EventInfo::Empty` for
/// recognized events without info, otherwise the formatted text
pub fn event_info(event_id: u32, extra: &[u32]) -> EventInfo {
    match lookup(event_id) {
        Some(def) => def.format_info(extra),
        None => EventInfo::Unrecognized,
    }
}

/// Number of extra words an event carries, `None` for unknown ids
pub fn extra_words(event_id: u32) -> Option<usize> {
    lookup(event_id).map(|def| def.words)
}

/// Every catalogue entry, grouped by class
pub fn catalogue() -> impl Iterator<Item = &'static EventDef> {
    base::TABLES
        .iter()
        .chain(sched::TABLES)
        .chain(dom0::TABLES)
        .chain(hvm::TABLES)
        .chain(mem::TABLES)
        .chain(pv::TABLES)
        .chain(shadow::TABLES)
        .chain(hw::TABLES)
        .flat_map(|table| table.iter())
}

/// Catalogue entries of one class
pub fn catalogue_for(class: EventClass) -> impl Iterator<Item = &'static EventDef> {
    catalogue().filter(move |def| def.class() == class)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn test_words_missing_index_reads_zero() {
        let words = Words::new(&[7]);
        assert_eq!(words[0], 7);
        assert_eq!(words[5], 0);
        assert_eq!(words.wide(1, 0), 7);
    }

    #[test]
    fn test_words_dom_vcpu_packed_and_split() {
        assert_eq!(Words::new(&[0x0005_0001]).dom_vcpu(0), "0x00050001");
        assert_eq!(Words::new(&[5, 1]).dom_vcpu(0), "0x00050001");
        assert_eq!(Words::new(&[1, 2, 3, 4]).dom_vcpu(2), "0x00030004");
    }

    #[test]
    fn test_catalogue_ids_are_unique() {
        let mut seen = HashSet::new();
        for def in catalogue() {
            assert!(seen.insert(def.id), "duplicate id 0x{:08x}", def.id);
        }
    }

    #[test]
    fn test_catalogue_entries_resolve_to_themselves() {
        for def in catalogue() {
            let found = lookup(def.id).map(|d| d.name);
            assert_eq!(found, Some(def.name), "id 0x{:08x}", def.id);
            assert!(!def.name.is_empty());
            assert!(def.words <= 7);
        }
    }

    #[test]
    fn test_silent_events_have_no_words() {
        for def in catalogue().filter(|def| def.info.is_none()) {
            assert_eq!(def.words, 0, "{} (0x{:08x})", def.name, def.id);
        }
    }

    #[test]
    fn test_unknown_ids() {
        assert_eq!(event_name(0x0003_1001), None);
        assert_eq!(name_or_unknown(0x0003_1001), "unknown (0x00031001)");
        assert_eq!(event_info(0x0003_1001, &[1, 2]), EventInfo::Unrecognized);
        assert_eq!(extra_words(0x0002_8fff), None);
    }

    #[test]
    fn test_flag_bits_above_id_are_ignored() {
        assert_eq!(event_name(0xf002_8004), Some("domain_wake"));
    }

    #[test]
    fn test_info_short_payload_does_not_panic() {
        for def in catalogue() {
            let _ = def.format_info(&[]);
        }
    }
}
