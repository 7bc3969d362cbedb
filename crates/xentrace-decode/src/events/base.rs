//! Generic trace events (buffer management and CPU changes).

use super::ids::TRC_GEN;
use super::EventDef;

pub static GEN: [EventDef; 4] = [
    event!(TRC_GEN | 0x001, "lost_records", 1, |w| format!("0x{:08x}", w[0])),
    event!(TRC_GEN | 0x002, "wrap_buffer", 1, |w| format!("0x{:08x}", w[0])),
    event!(TRC_GEN | 0x003, "cpu_change", 2, |w| format!("0x{:08x}", w[0])),
    event!(TRC_GEN | 0x004, "trace_irq", 4, |w| format!(
        "vector = {}, count = {}, tot_cycles = 0x{:08x}, max_cycles = 0x{:08x}",
        w.int(0),
        w.int(1),
        w[2],
        w[3]
    )),
];

pub static TABLES: &[&[EventDef]] = &[&GEN];

pub(crate) fn table(_event_id: u32) -> &'static [EventDef] {
    &GEN
}

#[cfg(test)]
mod tests {
    use crate::events::{event_info, event_name, EventInfo};

    #[test]
    fn test_cpu_change() {
        assert_eq!(event_name(0x0001_f003), Some("cpu_change"));
        assert_eq!(
            event_info(0x0001_f003, &[2, 64]),
            EventInfo::Text("0x00000002".to_string())
        );
    }

    #[test]
    fn test_trace_irq_signed_fields() {
        assert_eq!(
            event_info(0x0001_f004, &[0xffff_ffff, 3, 0x10, 0x20]),
            EventInfo::Text(
                "vector = -1, count = 3, tot_cycles = 0x00000010, max_cycles = 0x00000020"
                    .to_string()
            )
        );
    }
}
