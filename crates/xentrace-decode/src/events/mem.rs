//! Memory events (grant table operations).

use super::ids::TRC_MEM;
use super::EventDef;

pub static MEM: [EventDef; 3] = [
    event!(TRC_MEM | 0x001, "page_grant_map", 1, |w| format!("domid = {}", w.int(0))),
    event!(TRC_MEM | 0x002, "page_grant_unmap", 1, |w| format!("domid = {}", w.int(0))),
    event!(TRC_MEM | 0x003, "page_grant_transfer", 1, |w| format!("domid = {}", w.int(0))),
];

pub static TABLES: &[&[EventDef]] = &[&MEM];

pub(crate) fn table(_event_id: u32) -> &'static [EventDef] {
    &MEM
}
