//! Shadow paging events.

use super::ids::TRC_SHADOW;
use super::EventDef;

macro_rules! va_event {
    ($sub:expr, $name:expr) => {
        [
            event!(TRC_SHADOW | $sub, $name, 1, |w| format!("va = 0x{:08x}", w[0])),
            event!(TRC_SHADOW | 0x100 | $sub, $name, 2, |w| format!("va = {}", w.hex64(1, 0))),
        ]
    };
}

macro_rules! unshadow_event {
    ($sub:expr, $name:expr) => {
        [
            event!(TRC_SHADOW | $sub, $name, 2, |w| format!(
                "va = 0x{:08x}, gfn = 0x{:08x}",
                w[0],
                w[1]
            )),
            event!(TRC_SHADOW | 0x100 | $sub, $name, 4, |w| format!(
                "va = {}, gfn = {}",
                w.hex64(1, 0),
                w.hex64(3, 2)
            )),
        ]
    };
}

macro_rules! gfn_event {
    ($sub:expr, $name:expr) => {
        [
            event!(TRC_SHADOW | $sub, $name, 1, |w| format!("gfn = 0x{:08x}", w[0])),
            event!(TRC_SHADOW | 0x100 | $sub, $name, 2, |w| format!("gfn = {}", w.hex64(1, 0))),
        ]
    };
}

pub static NOT_SHADOW: [EventDef; 2] = [
    event!(TRC_SHADOW | 0x001, "shadow_not_shadow", 4, |w| format!(
        "gl1e = {}, va = 0x{:08x}, flags = 0x{:08x}",
        w.hex64(1, 0),
        w[2],
        w[3]
    )),
    event!(TRC_SHADOW | 0x101, "shadow_not_shadow", 5, |w| format!(
        "gl1e = {}, va = {}, flags = 0x{:08x}",
        w.hex64(1, 0),
        w.hex64(3, 2),
        w[4]
    )),
];

pub static FAST_PROPAGATE: [EventDef; 2] = va_event!(0x002, "shadow_fast_propagate");
pub static FAST_MMIO: [EventDef; 2] = va_event!(0x003, "shadow_fast_mmio");
pub static FALSE_FAST_PATH: [EventDef; 2] = va_event!(0x004, "shadow_false_fast_path");
pub static MMIO: [EventDef; 2] = va_event!(0x005, "shadow_mmio");

pub static FIXUP: [EventDef; 2] = [
    event!(TRC_SHADOW | 0x006, "shadow_fixup", 3, |w| format!(
        "gl1e = 0x{:08x}, va = 0x{:08x}, flags = 0x{:08x}",
        w[0],
        w[1],
        w[2]
    )),
    event!(TRC_SHADOW | 0x106, "shadow_fixup", 5, |w| format!(
        "gl1e = {}, va = {}, flags = 0x{:08x}",
        w.hex64(1, 0),
        w.hex64(3, 2),
        w[4]
    )),
];

pub static DOMF_DYING: [EventDef; 2] = va_event!(0x007, "shadow_domf_dying");

pub static EMULATE: [EventDef; 2] = [
    event!(TRC_SHADOW | 0x008, "shadow_emulate", 4, |w| format!(
        "gl1e = 0x{:08x}, write_val = 0x{:08x}, va = 0x{:08x}, flags = 0x{:08x}",
        w[0],
        w[1],
        w[2],
        w[3]
    )),
    event!(TRC_SHADOW | 0x108, "shadow_emulate", 7, |w| format!(
        "gl1e = {}, write_val = {}, va = {}, flags = 0x{:08x}",
        w.hex64(1, 0),
        w.hex64(3, 2),
        w.hex64(5, 4),
        w[6]
    )),
];

pub static UNSHADOW_USER: [EventDef; 2] =
    unshadow_event!(0x009, "shadow_emulate_unshadow_user");
pub static UNSHADOW_EVTINJ: [EventDef; 2] =
    unshadow_event!(0x00a, "shadow_emulate_unshadow_evtinj");
pub static UNSHADOW_UNHANDLED: [EventDef; 2] =
    unshadow_event!(0x00b, "shadow_emulate_unshadow_unhandled");

pub static WRMAP_BF: [EventDef; 2] = gfn_event!(0x00c, "shadow_emulate_wrmap_bf");
pub static PREALLOC_UNPIN: [EventDef; 2] = gfn_event!(0x00d, "shadow_emulate_prealloc_unpin");
pub static RESYNC_FULL: [EventDef; 2] = gfn_event!(0x00e, "shadow_emulate_resync_full");
pub static RESYNC_ONLY: [EventDef; 2] = gfn_event!(0x00f, "shadow_emulate_resync_only");

pub static TABLES: &[&[EventDef]] = &[
    &NOT_SHADOW,
    &FAST_PROPAGATE,
    &FAST_MMIO,
    &FALSE_FAST_PATH,
    &MMIO,
    &FIXUP,
    &DOMF_DYING,
    &EMULATE,
    &UNSHADOW_USER,
    &UNSHADOW_EVTINJ,
    &UNSHADOW_UNHANDLED,
    &WRMAP_BF,
    &PREALLOC_UNPIN,
    &RESYNC_FULL,
    &RESYNC_ONLY,
];

/// Shadow ids pair up as (32-bit, 64-bit) per low event number
pub(crate) fn table(event_id: u32) -> &'static [EventDef] {
    let index = (event_id & 0xff) as usize;
    index
        .checked_sub(1)
        .and_then(|i| TABLES.get(i))
        .copied()
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use crate::events::{event_info, event_name, EventInfo};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fixup_flags_word() {
        assert_eq!(
            event_info(0x0040_f106, &[0x63, 0x1, 0x4000, 0x7f, 0x9]),
            EventInfo::Text(
                "gl1e = 0x0000000100000063, va = 0x0000007f00004000, flags = 0x00000009"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_variant_names_match() {
        for sub in 0x001..=0x00f {
            let narrow = event_name(0x0040_f000 | sub);
            let wide = event_name(0x0040_f100 | sub);
            assert!(narrow.is_some());
            assert_eq!(narrow, wide);
        }
        assert_eq!(event_name(0x0040_f010), None);
        assert_eq!(event_name(0x0040_f000), None);
    }

    #[test]
    fn test_resync_gfn() {
        assert_eq!(
            event_info(0x0040_f10e, &[0x1234, 0x0]),
            EventInfo::Text("gfn = 0x0000000000001234".to_string())
        );
    }
}
