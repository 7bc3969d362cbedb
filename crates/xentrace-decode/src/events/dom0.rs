//! Domain management events issued by the control domain.

use super::ids::TRC_DOM0_DOMOPS;
use super::EventDef;

pub static DOMOPS: [EventDef; 2] = [
    event!(TRC_DOM0_DOMOPS | 0x001, "domain_create", 1, |w| format!("dom = 0x{:08x}", w[0])),
    event!(TRC_DOM0_DOMOPS | 0x002, "domain_destroy", 1, |w| format!("dom = 0x{:08x}", w[0])),
];

pub static TABLES: &[&[EventDef]] = &[&DOMOPS];

pub(crate) fn table(event_id: u32) -> &'static [EventDef] {
    match super::class::subclass(event_id) {
        0x1 => &DOMOPS,
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use crate::events::{event_info, event_name, EventInfo};

    #[test]
    fn test_domain_create() {
        assert_eq!(event_name(0x0004_1001), Some("domain_create"));
        assert_eq!(
            event_info(0x0004_1002, &[3]),
            EventInfo::Text("dom = 0x00000003".to_string())
        );
    }
}
