//! Hardware events: power management and IRQ vector lifecycle.

use super::ids::{TRC_HW_IRQ, TRC_HW_PM};
use super::EventDef;

pub static PM: [EventDef; 3] = [
    event!(TRC_HW_PM | 0x001, "cpu_freq_change", 2, |w| format!(
        "{}MHz -> {}MHz",
        w.int(0),
        w.int(1)
    )),
    event!(TRC_HW_PM | 0x002, "cpu_idle_entry", 4, |w| format!(
        "C0 -> C{}, acpi_pm_tick = {}, expected = {}us, predicted = {}us",
        w.int(0),
        w.int(1),
        w.int(2),
        w.int(3)
    )),
    event!(TRC_HW_PM | 0x003, "cpu_idle_exit", 6, |w| format!(
        "C{} -> C0, acpi_pm_tick = {}, irq = {} {} {} {}",
        w.int(0),
        w.int(1),
        w.int(2),
        w.int(3),
        w.int(4),
        w.int(5)
    )),
];

pub static IRQ: [EventDef; 8] = [
    event!(TRC_HW_IRQ | 0x001, "cleanup_move_delayed", 3, |w| format!(
        "irq = {}, vector 0x{:x} on CPU{}",
        w.int(0),
        w[1],
        w.int(2)
    )),
    event!(TRC_HW_IRQ | 0x002, "cleanup_move", 3, |w| format!(
        "irq = {}, vector 0x{:x} on CPU{}",
        w.int(0),
        w[1],
        w.int(2)
    )),
    event!(TRC_HW_IRQ | 0x003, "bind_vector", 3, |w| format!(
        "irq = {} = vector 0x{:x}, CPU mask: 0x{:08x}",
        w.int(0),
        w[1],
        w[2]
    )),
    event!(TRC_HW_IRQ | 0x004, "clear_vector", 3, |w| format!(
        "irq = {} = vector 0x{:x}, CPU mask: 0x{:08x}",
        w.int(0),
        w[1],
        w[2]
    )),
    event!(TRC_HW_IRQ | 0x005, "move_vector", 3, |w| format!(
        "irq = {} had vector 0x{:x} on CPU{}",
        w.int(0),
        w[1],
        w.int(2)
    )),
    event!(TRC_HW_IRQ | 0x006, "assign_vector", 3, |w| format!(
        "irq = {} = vector 0x{:x}, CPU mask: 0x{:08x}",
        w.int(0),
        w[1],
        w[2]
    )),
    event!(TRC_HW_IRQ | 0x007, "bogus_vector", 1, |w| format!("0x{:x}", w[0])),
    event!(TRC_HW_IRQ | 0x008, "do_irq", 3, |w| format!(
        "irq = {}, began = {}us, ended = {}us",
        w.int(0),
        w.int(1),
        w.int(2)
    )),
];

pub static TABLES: &[&[EventDef]] = &[&PM, &IRQ];

pub(crate) fn table(event_id: u32) -> &'static [EventDef] {
    match event_id & 0x0fff_f000 {
        TRC_HW_PM => &PM,
        TRC_HW_IRQ => &IRQ,
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use crate::events::{event_info, EventInfo};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cpu_freq_change() {
        assert_eq!(
            event_info(0x0080_1001, &[1200, 2400]),
            EventInfo::Text("1200MHz -> 2400MHz".to_string())
        );
    }

    #[test]
    fn test_irq_vector_lifecycle() {
        assert_eq!(
            event_info(0x0080_2003, &[9, 0x31, 0xf]),
            EventInfo::Text("irq = 9 = vector 0x31, CPU mask: 0x0000000f".to_string())
        );
        assert_eq!(
            event_info(0x0080_2007, &[0xef]),
            EventInfo::Text("0xef".to_string())
        );
    }
}
