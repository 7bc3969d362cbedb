//! Scheduler events.
//!
//! Three tiers share the class: minimal runstate changes, verbose core
//! scheduler events, and per-algorithm events. The algorithm is encoded in
//! bits 9-11 of scheduler-class ids.

use super::ids::{
    TRC_SCHED_CLASS, TRC_SCHED_CSCHED, TRC_SCHED_CSCHED2, TRC_SCHED_ID_MASK, TRC_SCHED_ID_SHIFT,
    TRC_SCHED_MIN, TRC_SCHED_RTDS, TRC_SCHED_SNULL, TRC_SCHED_VERBOSE,
};
use super::EventDef;

macro_rules! runstate {
    ($sub:expr, $name:expr) => {
        event!(TRC_SCHED_MIN | $sub, $name, 1, |w| format!("dom:vcpu = 0x{:08x}", w[0]))
    };
}

pub static MIN: [EventDef; 13] = [
    runstate!(0x002, "continue_running"),
    runstate!(0x011, "running_to_runnable"),
    runstate!(0x021, "running_to_blocked"),
    runstate!(0x031, "running_to_offline"),
    runstate!(0x101, "runnable_to_running"),
    runstate!(0x121, "runnable_to_blocked"),
    runstate!(0x131, "runnable_to_offline"),
    runstate!(0x201, "blocked_to_running"),
    runstate!(0x211, "blocked_to_runnable"),
    runstate!(0x231, "blocked_to_offline"),
    runstate!(0x301, "offline_to_running"),
    runstate!(0x311, "offline_to_runnable"),
    runstate!(0x321, "offline_to_blocked"),
];

pub static VERBOSE: [EventDef; 17] = [
    event!(TRC_SCHED_VERBOSE | 0x001, "sched_add_domain", 1, |w| format!(
        "domid = 0x{:08x}",
        w[0]
    )),
    event!(TRC_SCHED_VERBOSE | 0x002, "sched_rem_domain", 1, |w| format!(
        "domid = 0x{:08x}",
        w[0]
    )),
    event!(TRC_SCHED_VERBOSE | 0x003, "domain_sleep", 2, |w| format!(
        "dom:vcpu = {}",
        w.dom_vcpu(0)
    )),
    event!(TRC_SCHED_VERBOSE | 0x004, "domain_wake", 2, |w| format!(
        "dom:vcpu = {}",
        w.dom_vcpu(0)
    )),
    event!(TRC_SCHED_VERBOSE | 0x005, "do_yield", 2, |w| format!(
        "dom:vcpu = {}",
        w.dom_vcpu(0)
    )),
    event!(TRC_SCHED_VERBOSE | 0x006, "do_block", 2, |w| format!(
        "dom:vcpu = {}",
        w.dom_vcpu(0)
    )),
    event!(TRC_SCHED_VERBOSE | 0x007, "domain_shutdown", 3, |w| format!(
        "dom:vcpu = {}, reason = 0x{:08x}",
        w.dom_vcpu(0),
        w[2]
    )),
    event!(TRC_SCHED_VERBOSE | 0x008, "sched_ctl", 0),
    event!(TRC_SCHED_VERBOSE | 0x009, "sched_adjdom", 1, |w| format!(
        "domid = 0x{:08x}",
        w[0]
    )),
    event!(TRC_SCHED_VERBOSE | 0x00a, "__enter_scheduler", 4, |w| format!(
        "prev<dom:vcpu> = {}, next<dom:vcpu> = {}",
        w.dom_vcpu(0),
        w.dom_vcpu(2)
    )),
    event!(TRC_SCHED_VERBOSE | 0x00b, "s_timer_fn", 0),
    event!(TRC_SCHED_VERBOSE | 0x00c, "t_timer_fn", 0),
    event!(TRC_SCHED_VERBOSE | 0x00d, "dom_timer_fn", 0),
    event!(TRC_SCHED_VERBOSE | 0x00e, "switch_infprev", 3, |w| format!(
        "dom:vcpu = {}, runtime = {}",
        w.dom_vcpu(0),
        w.int(2)
    )),
    event!(TRC_SCHED_VERBOSE | 0x00f, "switch_infnext", 4, |w| format!(
        "new_dom:vcpu = {}, time = {}, r_time = {}",
        w.dom_vcpu(0),
        w.int(2),
        w.int(3)
    )),
    event!(TRC_SCHED_VERBOSE | 0x010, "domain_shutdown_code", 3, |w| format!(
        "dom:vcpu = {}, reason = 0x{:08x}",
        w.dom_vcpu(0),
        w[2]
    )),
    event!(TRC_SCHED_VERBOSE | 0x011, "switch_infcont", 4, |w| format!(
        "dom:vcpu = {}, runtime = {}, r_time = {}",
        w.dom_vcpu(0),
        w.int(2),
        w.int(3)
    )),
];

pub static CREDIT: [EventDef; 11] = [
    event!(TRC_SCHED_CLASS | 0x001, "csched:sched_tasklet", 0),
    event!(TRC_SCHED_CLASS | 0x002, "csched:account_start", 3, |w| format!(
        "dom:vcpu = {}, active = {}",
        w.dom_vcpu(0),
        w.int(2)
    )),
    event!(TRC_SCHED_CLASS | 0x003, "csched:account_stop", 3, |w| format!(
        "dom:vcpu = {}, active = {}",
        w.dom_vcpu(0),
        w.int(2)
    )),
    event!(TRC_SCHED_CLASS | 0x004, "csched:stolen_vcpu", 3, |w| format!(
        "dom:vcpu = {}, from = {}",
        w.dom_vcpu(1),
        w.int(0)
    )),
    event!(TRC_SCHED_CLASS | 0x005, "csched:picked_cpu", 3, |w| format!(
        "dom:vcpu = {}, cpu = {}",
        w.dom_vcpu(0),
        w.int(2)
    )),
    event!(TRC_SCHED_CLASS | 0x006, "csched:tickle", 1, |w| format!("cpu = {}", w.int(0))),
    event!(TRC_SCHED_CLASS | 0x007, "csched:boost", 2, |w| format!(
        "dom:vcpu = {}",
        w.dom_vcpu(0)
    )),
    event!(TRC_SCHED_CLASS | 0x008, "csched:unboost", 2, |w| format!(
        "dom:vcpu = {}",
        w.dom_vcpu(0)
    )),
    event!(TRC_SCHED_CLASS | 0x009, "csched:schedule", 1, |w| format!(
        "cpu[16]:tasklet[8]:idle[8] = {:08x}",
        w[0]
    )),
    event!(TRC_SCHED_CLASS | 0x00a, "csched:ratelimit", 2, |w| format!(
        "dom:vcpu = 0x{:08x}, runtime = {}",
        w[0],
        w.int(1)
    )),
    event!(TRC_SCHED_CLASS | 0x00b, "csched:steal_check", 2, |w| format!(
        "peer_cpu = {}, checked = {}",
        w.int(0),
        w.int(1)
    )),
];

pub static CREDIT2: [EventDef; 22] = [
    event!(TRC_SCHED_CLASS | 0x201, "csched2:tick", 0),
    event!(TRC_SCHED_CLASS | 0x202, "csched2:runq_pos", 2, |w| format!(
        "[ dom:vcpu = 0x{:08x}, pos = {}]",
        w[0],
        w.int(1)
    )),
    event!(TRC_SCHED_CLASS | 0x203, "csched2:credit_burn", 4, |w| format!(
        "burn [ dom:vcpu = 0x{:08x}, credit = {}, budget = {}, delta = {} ]",
        w[0],
        w.int(1),
        w.int(2),
        w.int(3)
    )),
    event!(TRC_SCHED_CLASS | 0x204, "csched2:credit_add", 0),
    event!(TRC_SCHED_CLASS | 0x205, "csched2:tickle_check", 3, |w| format!(
        "dom:vcpu = 0x{:08x}, credit = {}, score = {}",
        w[0],
        w.int(1),
        w.int(2)
    )),
    event!(TRC_SCHED_CLASS | 0x206, "csched2:tickle", 1, |w| format!("cpu = {}", w.int(0))),
    event!(TRC_SCHED_CLASS | 0x207, "csched2:credit_reset", 3, |w| format!(
        "dom:vcpu = 0x{:08x}, cr_start = {}, cr_end = {}",
        w[0],
        w.int(1),
        w.int(2)
    )),
    event!(TRC_SCHED_CLASS | 0x208, "csched2:sched_tasklet", 0),
    event!(TRC_SCHED_CLASS | 0x209, "csched2:update_load", 0),
    event!(TRC_SCHED_CLASS | 0x20a, "csched2:runq_assign", 2, |w| format!(
        "dom:vcpu = 0x{:08x}, rq_id = {}",
        w[0],
        w.int(1)
    )),
    event!(TRC_SCHED_CLASS | 0x20b, "csched2:updt_vcpu_load", 4, |w| format!(
        "dom:vcpu = 0x{:08x}, vcpuload = {}, wshift = {}",
        w[2],
        w.hex64(1, 0),
        w.int(3)
    )),
    event!(TRC_SCHED_CLASS | 0x20c, "csched2:updt_runq_load", 5, |w| format!(
        "rq_load[16]:rq_id[8]:wshift[8] = 0x{:08x}, rq_avgload = {}, b_avgload = {}",
        w[4],
        w.hex64(1, 0),
        w.hex64(3, 2)
    )),
    event!(TRC_SCHED_CLASS | 0x20d, "csched2:tickle_new", 3, |w| format!(
        "dom:vcpu = 0x{:08x}, processor = {} credit = {}",
        w[0],
        w.int(1),
        w.int(2)
    )),
    event!(TRC_SCHED_CLASS | 0x20e, "csched2:runq_max_weight", 1, |w| format!(
        "rq_id[16]:max_weight[16] = 0x{:08x}",
        w[0]
    )),
    event!(TRC_SCHED_CLASS | 0x20f, "csched2:migrrate", 2, |w| format!(
        "dom:vcpu = 0x{:08x}, rq_id[16]:trq_id[16] = 0x{:08x}",
        w[0],
        w[1]
    )),
    event!(TRC_SCHED_CLASS | 0x210, "csched2:load_check", 2, |w| format!(
        "lrq_id[16]:orq_id[16] = 0x{:08x}, delta = {}",
        w[0],
        w.int(1)
    )),
    event!(TRC_SCHED_CLASS | 0x211, "csched2:load_balance", 5, |w| format!(
        "l_bavgload = {}, o_bavgload = {}, lrq_id[16]:orq_id[16] = 0x{:08x}",
        w.hex64(1, 0),
        w.hex64(3, 2),
        w[4]
    )),
    event!(TRC_SCHED_CLASS | 0x212, "csched2:pick_cpu", 4, |w| format!(
        "b_avgload = {}, dom:vcpu = 0x{:08x}, rq_id[16]:new_cpu[16] = {}",
        w.hex64(1, 0),
        w[2],
        w.int(3)
    )),
    event!(TRC_SCHED_CLASS | 0x213, "csched2:runq_candidate", 3, |w| format!(
        "dom:vcpu = 0x{:08x}, credit = {}, tickled_cpu = {}",
        w[0],
        w.int(2),
        w.int(1)
    )),
    event!(TRC_SCHED_CLASS | 0x214, "csched2:schedule", 2, |w| format!(
        "rq:cpu = 0x{:08x}, tasklet[8]:idle[8]:smt_idle[8]:tickled[8] = {:08x}",
        w[0],
        w[1]
    )),
    event!(TRC_SCHED_CLASS | 0x215, "csched2:ratelimit", 2, |w| format!(
        "dom:vcpu = 0x{:08x}, runtime = {}",
        w[0],
        w.int(1)
    )),
    event!(TRC_SCHED_CLASS | 0x216, "csched2:runq_cand_chk", 1, |w| format!(
        "dom:vcpu = 0x{:08x}",
        w[0]
    )),
];

pub static RTDS: [EventDef; 6] = [
    event!(TRC_SCHED_CLASS | 0x801, "rtds:tickle", 1, |w| format!("cpu = {}", w.int(0))),
    event!(TRC_SCHED_CLASS | 0x802, "rtds:runq_pick", 5, |w| format!(
        "dom:vcpu = 0x{:08x}, cur_deadline = {}, cur_budget = {}",
        w[0],
        w.hex64(2, 1),
        w.hex64(4, 3)
    )),
    event!(TRC_SCHED_CLASS | 0x803, "rtds:burn_budget", 4, |w| format!(
        "dom:vcpu = 0x{:08x}, cur_budget = {}, delta = {}",
        w[0],
        w.hex64(2, 1),
        w.int(3)
    )),
    event!(TRC_SCHED_CLASS | 0x804, "rtds:repl_budget", 5, |w| format!(
        "dom:vcpu = 0x{:08x}, cur_deadline = {}, cur_budget = {}",
        w[0],
        w.hex64(2, 1),
        w.hex64(4, 3)
    )),
    event!(TRC_SCHED_CLASS | 0x805, "rtds:sched_tasklet", 0),
    event!(TRC_SCHED_CLASS | 0x806, "rtds:schedule", 1, |w| format!(
        "cpu[16]:tasklet[8]:idle[4]:tickled[4] = {:08x}",
        w[0]
    )),
];

pub static NULL: [EventDef; 6] = [
    event!(TRC_SCHED_CLASS | 0xa01, "null:pick_cpu", 2, |w| format!(
        "dom:vcpu = 0x{:08x}, new_cpu = {}",
        w[0],
        w.int(1)
    )),
    event!(TRC_SCHED_CLASS | 0xa02, "null:assign", 2, |w| format!(
        "dom:vcpu = 0x{:08x}, cpu = {}",
        w[0],
        w.int(1)
    )),
    event!(TRC_SCHED_CLASS | 0xa03, "null:deassign", 2, |w| format!(
        "dom:vcpu = 0x{:08x}, cpu = {}",
        w[0],
        w.int(1)
    )),
    event!(TRC_SCHED_CLASS | 0xa04, "null:migrate", 2, |w| format!(
        "dom:vcpu = 0x{:08x}, new_cpu:cpu = 0x{:08x}",
        w[0],
        w[1]
    )),
    event!(TRC_SCHED_CLASS | 0xa05, "null:schedule", 2, |w| format!(
        "cpu[16]:tasklet[16] = {:08x}, dom:vcpu = 0x{:08x}",
        w[0],
        w[1]
    )),
    event!(TRC_SCHED_CLASS | 0xa06, "null:sched_tasklet", 0),
];

pub static TABLES: &[&[EventDef]] = &[&MIN, &VERBOSE, &CREDIT, &CREDIT2, &RTDS, &NULL];

/// Scheduling algorithm encoded in a scheduler-class id
pub fn algorithm(event_id: u32) -> u32 {
    (event_id >> TRC_SCHED_ID_SHIFT) & TRC_SCHED_ID_MASK
}

pub(crate) fn table(event_id: u32) -> &'static [EventDef] {
    match event_id & 0x0fff_f000 {
        TRC_SCHED_MIN => &MIN,
        TRC_SCHED_VERBOSE => &VERBOSE,
        TRC_SCHED_CLASS => match algorithm(event_id) {
            TRC_SCHED_CSCHED => &CREDIT,
            TRC_SCHED_CSCHED2 => &CREDIT2,
            TRC_SCHED_RTDS => &RTDS,
            TRC_SCHED_SNULL => &NULL,
            _ => &[],
        },
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{event_info, event_name, EventInfo};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_algorithm_bits() {
        assert_eq!(algorithm(0x0002_2001), TRC_SCHED_CSCHED);
        assert_eq!(algorithm(0x0002_2203), TRC_SCHED_CSCHED2);
        assert_eq!(algorithm(0x0002_2801), TRC_SCHED_RTDS);
        assert_eq!(algorithm(0x0002_2a05), TRC_SCHED_SNULL);
    }

    #[test]
    fn test_runstate_names() {
        assert_eq!(event_name(0x0002_1011), Some("running_to_runnable"));
        assert_eq!(event_name(0x0002_1101), Some("runnable_to_running"));
        assert_eq!(event_name(0x0002_1001), None);
        assert_eq!(
            event_info(0x0002_1201, &[0x0003_0002]),
            EventInfo::Text("dom:vcpu = 0x00030002".to_string())
        );
    }

    #[test]
    fn test_domain_wake_packed_and_split() {
        let expected = EventInfo::Text("dom:vcpu = 0x00050001".to_string());
        assert_eq!(event_info(0x0002_8004, &[0x0005_0001]), expected);
        assert_eq!(event_info(0x0002_8004, &[5, 1]), expected);
    }

    #[test]
    fn test_enter_scheduler() {
        assert_eq!(
            event_info(0x0002_800a, &[0, 1, 0x7fff, 3]),
            EventInfo::Text(
                "prev<dom:vcpu> = 0x00000001, next<dom:vcpu> = 0x7fff0003".to_string()
            )
        );
    }

    #[test]
    fn test_per_algorithm_dispatch() {
        assert_eq!(event_name(0x0002_2006), Some("csched:tickle"));
        assert_eq!(event_name(0x0002_2206), Some("csched2:tickle"));
        assert_eq!(event_name(0x0002_2801), Some("rtds:tickle"));
        assert_eq!(event_name(0x0002_2a02), Some("null:assign"));
        // arinc653 (algorithm 3) has no catalogue
        assert_eq!(event_name(0x0002_2601), None);
    }

    #[test]
    fn test_credit2_wide_load() {
        assert_eq!(
            event_info(0x0002_220b, &[0x10, 0x1, 0x0002_0003, 18]),
            EventInfo::Text(
                "dom:vcpu = 0x00020003, vcpuload = 0x0000000100000010, wshift = 18".to_string()
            )
        );
    }

    #[test]
    fn test_rtds_burn_budget() {
        assert_eq!(
            event_info(0x0002_2803, &[0x0001_0000, 0x500, 0x0, 0xfffffff6]),
            EventInfo::Text(
                "dom:vcpu = 0x00010000, cur_budget = 0x0000000000000500, delta = -10".to_string()
            )
        );
    }

    #[test]
    fn test_silent_scheduler_events() {
        assert_eq!(event_info(0x0002_8008, &[1, 2]), EventInfo::Empty);
        assert_eq!(event_info(0x0002_2201, &[]), EventInfo::Empty);
    }
}
