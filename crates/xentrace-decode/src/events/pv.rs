//! Paravirtualized guest events.
//!
//! The entry subclass covers hypercalls, traps, faults and emulation paths.
//! Variants with the 0x100 flag report 64-bit rIP/addresses as word pairs
//! stored low word first.

use super::ids::{TRC_PV_ENTRY, TRC_PV_SUBCALL};
use super::EventDef;

pub static ENTRY: [EventDef; 23] = [
    event!(TRC_PV_ENTRY | 0x001, "hypercall", 2, |w| format!(
        "eip = 0x{:08x}, eax = 0x{:08x}",
        w[0],
        w[1]
    )),
    event!(TRC_PV_ENTRY | 0x101, "hypercall", 3, |w| format!(
        "rip = {}, eax = 0x{:08x}",
        w.hex64(1, 0),
        w[2]
    )),
    event!(TRC_PV_ENTRY | 0x003, "trap", 2, |w| format!(
        "eip = 0x{:08x}, trapnr:error = 0x{:08x}",
        w[0],
        w[1]
    )),
    event!(TRC_PV_ENTRY | 0x103, "trap", 3, |w| format!(
        "rip = {}, trapnr:error = 0x{:08x}",
        w.hex64(1, 0),
        w[2]
    )),
    event!(TRC_PV_ENTRY | 0x004, "page_fault", 3, |w| format!(
        "eip = 0x{:08x}, addr = 0x{:08x}, error = 0x{:08x}",
        w[0],
        w[1],
        w[2]
    )),
    event!(TRC_PV_ENTRY | 0x104, "page_fault", 5, |w| format!(
        "rip = {}, addr = {}, error = 0x{:08x}",
        w.hex64(1, 0),
        w.hex64(3, 2),
        w[4]
    )),
    event!(TRC_PV_ENTRY | 0x005, "forced_invalid_op", 1, |w| format!("eip = 0x{:08x}", w[0])),
    event!(TRC_PV_ENTRY | 0x105, "forced_invalid_op", 2, |w| format!("rip = {}", w.hex64(1, 0))),
    event!(TRC_PV_ENTRY | 0x006, "emulate_privop", 1, |w| format!("eip = 0x{:08x}", w[0])),
    event!(TRC_PV_ENTRY | 0x106, "emulate_privop", 2, |w| format!("rip = {}", w.hex64(1, 0))),
    event!(TRC_PV_ENTRY | 0x007, "emulate_4G", 1, |w| format!("eip = 0x{:08x}", w[0])),
    event!(TRC_PV_ENTRY | 0x107, "emulate_4G", 2, |w| format!("rip = {}", w.hex64(1, 0))),
    event!(TRC_PV_ENTRY | 0x008, "math_state_restore", 0),
    event!(TRC_PV_ENTRY | 0x108, "math_state_restore", 0),
    event!(TRC_PV_ENTRY | 0x009, "paging_fixup", 2, |w| format!(
        "eip = 0x{:08x}, addr = 0x{:08x}",
        w[0],
        w[1]
    )),
    event!(TRC_PV_ENTRY | 0x109, "paging_fixup", 4, |w| format!(
        "rip = {}, addr = {}",
        w.hex64(1, 0),
        w.hex64(3, 2)
    )),
    event!(TRC_PV_ENTRY | 0x00a, "gdt_ldt_mapping_fault", 2, |w| format!(
        "eip = 0x{:08x}, offset = 0x{:08x}",
        w[0],
        w[1]
    )),
    event!(TRC_PV_ENTRY | 0x10a, "gdt_ldt_mapping_fault", 4, |w| format!(
        "rip = {}, offset = {}",
        w.hex64(1, 0),
        w.hex64(3, 2)
    )),
    event!(TRC_PV_ENTRY | 0x00b, "ptwr_emulation", 4, |w| format!(
        "addr = 0x{:08x}, eip = 0x{:08x}, npte = {}",
        w[2],
        w[3],
        w.hex64(1, 0)
    )),
    event!(TRC_PV_ENTRY | 0x10b, "ptwr_emulation", 6, |w| format!(
        "addr = {}, rip = {}, npte = {}",
        w.hex64(3, 2),
        w.hex64(5, 4),
        w.hex64(1, 0)
    )),
    event!(TRC_PV_ENTRY | 0x00c, "ptwr_emulation_pae", 4, |w| format!(
        "addr = 0x{:08x}, eip = 0x{:08x}, npte = {}",
        w[2],
        w[3],
        w.hex64(1, 0)
    )),
    event!(TRC_PV_ENTRY | 0x10c, "ptwr_emulation_pae", 6, |w| format!(
        "addr = {}, rip = {}, npte = {}",
        w.hex64(3, 2),
        w.hex64(5, 4),
        w.hex64(1, 0)
    )),
    event!(TRC_PV_ENTRY | 0x00d, "hypercall", 1, |w| format!("op = 0x{:08x}", w[0])),
];

pub static SUBCALL: [EventDef; 1] = [event!(TRC_PV_SUBCALL | 0x00e, "hypercall", 1, |w| format!(
    "op = 0x{:08x}",
    w[0]
))];

pub static TABLES: &[&[EventDef]] = &[&ENTRY, &SUBCALL];

pub(crate) fn table(event_id: u32) -> &'static [EventDef] {
    match event_id & 0x0fff_f000 {
        TRC_PV_ENTRY => &ENTRY,
        TRC_PV_SUBCALL => &SUBCALL,
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use crate::events::{event_info, event_name, EventInfo};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hypercall_variants() {
        assert_eq!(
            event_info(0x0020_1001, &[0xc010_0000, 0x1d]),
            EventInfo::Text("eip = 0xc0100000, eax = 0x0000001d".to_string())
        );
        assert_eq!(
            event_info(0x0020_1101, &[0x8000_0000, 0xffff_ffff, 0x1d]),
            EventInfo::Text("rip = 0xffffffff80000000, eax = 0x0000001d".to_string())
        );
    }

    #[test]
    fn test_subcall_only_in_its_subclass() {
        assert_eq!(event_name(0x0020_200e), Some("hypercall"));
        assert_eq!(event_name(0x0020_100e), None);
        assert_eq!(event_name(0x0020_200d), None);
    }

    #[test]
    fn test_ptwr_emulation_word_order() {
        assert_eq!(
            event_info(0x0020_100b, &[0x67, 0x1, 0xb000, 0xc000]),
            EventInfo::Text(
                "addr = 0x0000b000, eip = 0x0000c000, npte = 0x0000000100000067".to_string()
            )
        );
    }
}
