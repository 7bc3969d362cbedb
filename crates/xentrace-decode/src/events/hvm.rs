//! HVM guest events: VM entry/exit, exit handlers and device emulation.
//!
//! Handler events with the 0x100 flag carry 64-bit guest addresses split
//! across two words, printed high word first.

use super::ids::{TRC_HVM_EMUL, TRC_HVM_ENTRYEXIT, TRC_HVM_HANDLER};
use super::EventDef;

pub static ENTRYEXIT: [EventDef; 6] = [
    event!(TRC_HVM_ENTRYEXIT | 0x001, "VMENTRY", 0),
    event!(TRC_HVM_ENTRYEXIT | 0x002, "VMEXIT", 2, |w| format!(
        "exitcode = 0x{:08x}, rIP  = 0x{:08x}",
        w[0],
        w[1]
    )),
    event!(TRC_HVM_ENTRYEXIT | 0x102, "VMEXIT", 3, |w| format!(
        "exitcode = 0x{:08x}, rIP  = {}",
        w[0],
        w.hex64(2, 1)
    )),
    event!(TRC_HVM_ENTRYEXIT | 0x401, "nVMENTRY", 0),
    event!(TRC_HVM_ENTRYEXIT | 0x402, "nVMEXIT", 2, |w| format!(
        "exitcode = 0x{:08x}, rIP  = 0x{:08x}",
        w[0],
        w[1]
    )),
    event!(TRC_HVM_ENTRYEXIT | 0x502, "nVMEXIT", 3, |w| format!(
        "exitcode = 0x{:08x}, rIP  = {}",
        w[0],
        w.hex64(2, 1)
    )),
];

pub static HANDLER: [EventDef; 37] = [
    event!(TRC_HVM_HANDLER | 0x001, "PF_XEN", 2, |w| format!(
        "errorcode = 0x{:02x}, virt = 0x{:08x}",
        w[1],
        w[0]
    )),
    event!(TRC_HVM_HANDLER | 0x101, "PF_XEN", 3, |w| format!(
        "errorcode = 0x{:02x}, virt = {}",
        w[2],
        w.hex64(1, 0)
    )),
    event!(TRC_HVM_HANDLER | 0x002, "PF_INJECT", 2, |w| format!(
        "errorcode = 0x{:02x}, virt = 0x{:08x}",
        w[0],
        w[1]
    )),
    event!(TRC_HVM_HANDLER | 0x102, "PF_INJECT", 3, |w| format!(
        "errorcode = 0x{:02x}, virt = {}",
        w[0],
        w.hex64(2, 1)
    )),
    event!(TRC_HVM_HANDLER | 0x003, "INJ_EXC", 2, |w| format!(
        "vector = 0x{:02x}, errorcode = 0x{:04x}",
        w[0],
        w[1]
    )),
    event!(TRC_HVM_HANDLER | 0x004, "INJ_VIRQ", 2, |w| format!(
        "vector = 0x{:02x}, fake = {}",
        w[0],
        w.int(1)
    )),
    event!(TRC_HVM_HANDLER | 0x005, "REINJ_VIRQ", 1, |w| format!("vector = 0x{:02x}", w[0])),
    event!(TRC_HVM_HANDLER | 0x006, "IO_READ", 2, |w| format!(
        "port = 0x{:04x}, size = {}",
        w[0],
        w.int(1)
    )),
    event!(TRC_HVM_HANDLER | 0x007, "IO_WRITE", 2, |w| format!(
        "port = 0x{:04x}, size = {}",
        w[0],
        w.int(1)
    )),
    event!(TRC_HVM_HANDLER | 0x008, "CR_READ", 2, |w| format!(
        "CR# = {}, value = 0x{:08x}",
        w.int(0),
        w[1]
    )),
    event!(TRC_HVM_HANDLER | 0x108, "CR_READ", 3, |w| format!(
        "CR# = {}, value = {}",
        w.int(0),
        w.hex64(2, 1)
    )),
    event!(TRC_HVM_HANDLER | 0x009, "CR_WRITE", 2, |w| format!(
        "CR# = {}, value = 0x{:08x}",
        w.int(0),
        w[1]
    )),
    event!(TRC_HVM_HANDLER | 0x109, "CR_WRITE", 3, |w| format!(
        "CR# = {}, value = {}",
        w.int(0),
        w.hex64(2, 1)
    )),
    event!(TRC_HVM_HANDLER | 0x00a, "DR_READ", 0),
    event!(TRC_HVM_HANDLER | 0x00b, "DR_WRITE", 0),
    event!(TRC_HVM_HANDLER | 0x00c, "MSR_READ", 3, |w| format!(
        "MSR# = 0x{:08x}, value = {}",
        w[0],
        w.hex64(2, 1)
    )),
    event!(TRC_HVM_HANDLER | 0x00d, "MSR_WRITE", 3, |w| format!(
        "MSR# = 0x{:08x}, value = {}",
        w[0],
        w.hex64(2, 1)
    )),
    event!(TRC_HVM_HANDLER | 0x00e, "CPUID", 5, |w| format!(
        "func = 0x{:08x}, eax = 0x{:08x}, ebx = 0x{:08x}, ecx=0x{:08x}, edx = 0x{:08x}",
        w[0],
        w[1],
        w[2],
        w[3],
        w[4]
    )),
    event!(TRC_HVM_HANDLER | 0x00f, "INTR", 1, |w| format!("vector = 0x{:02x}", w[0])),
    event!(TRC_HVM_HANDLER | 0x010, "NMI", 0),
    event!(TRC_HVM_HANDLER | 0x011, "SMI", 0),
    event!(TRC_HVM_HANDLER | 0x012, "VMMCALL", 1, |w| format!("func = 0x{:08x}", w[0])),
    event!(TRC_HVM_HANDLER | 0x013, "HLT", 1, |w| format!("intpending = {}", w.int(0))),
    event!(TRC_HVM_HANDLER | 0x014, "INVLPG", 2, |w| format!(
        "is invlpga? = {}, virt = 0x{:08x}",
        w.int(0),
        w[1]
    )),
    event!(TRC_HVM_HANDLER | 0x114, "INVLPG", 3, |w| format!(
        "is invlpga? = {}, virt = {}",
        w.int(0),
        w.hex64(2, 1)
    )),
    event!(TRC_HVM_HANDLER | 0x015, "MCE", 0),
    event!(TRC_HVM_HANDLER | 0x016, "IOPORT_READ", 2, |w| format!(
        "port = 0x{:04x}, data = 0x{:08x}",
        w[0],
        w[1]
    )),
    event!(TRC_HVM_HANDLER | 0x216, "IOPORT_WRITE", 2, |w| format!(
        "port = 0x{:04x}, data = 0x{:08x}",
        w[0],
        w[1]
    )),
    event!(TRC_HVM_HANDLER | 0x017, "MMIO_READ", 2, |w| format!(
        "port = 0x{:08x}, data = 0x{:08x}",
        w[0],
        w[1]
    )),
    event!(TRC_HVM_HANDLER | 0x217, "MMIO_WRITE", 2, |w| format!(
        "port = 0x{:08x}, data = 0x{:08x}",
        w[0],
        w[1]
    )),
    event!(TRC_HVM_HANDLER | 0x018, "CLTS", 0),
    event!(TRC_HVM_HANDLER | 0x019, "LMSW", 1, |w| format!("value = 0x{:08x}", w[0])),
    event!(TRC_HVM_HANDLER | 0x119, "LMSW", 2, |w| format!("value = {}", w.hex64(1, 0))),
    event!(TRC_HVM_HANDLER | 0x01a, "RDTSC", 2, |w| format!("value = {}", w.hex64(1, 0))),
    event!(TRC_HVM_HANDLER | 0x020, "INTR_WINDOW", 1, |w| format!("value = 0x{:08x}", w[0])),
    event!(TRC_HVM_HANDLER | 0x021, "NPF", 6, |w| format!(
        "gpa = {} mfn = {} qual = 0x{:04x} p2mt = 0x{:04x}",
        w.hex64(1, 0),
        w.hex64(3, 2),
        w[4],
        w[5]
    )),
    event!(TRC_HVM_HANDLER | 0x023, "TRAP", 1, |w| format!("vector = 0x{:02x}", w[0])),
];

pub static EMUL: [EventDef; 17] = [
    event!(TRC_HVM_EMUL | 0x001, "hpet", 6, |w| format!(
        "create [ tn = {}, irq = {}, delta = {}, period = {} ]",
        w.int(0),
        w.int(1),
        w.hex64(3, 2),
        w.hex64(5, 4)
    )),
    event!(TRC_HVM_EMUL | 0x002, "pit", 2, |w| format!(
        "create [ delta = 0x{:016x}, period = 0x{:016x} ]",
        w[0],
        w[1]
    )),
    event!(TRC_HVM_EMUL | 0x003, "rtc", 2, |w| format!(
        "create [ delta = 0x{:016x}, period = 0x{:016x} ]",
        w[0],
        w[1]
    )),
    event!(TRC_HVM_EMUL | 0x004, "vlapic", 5, |w| format!(
        "create [ delta = {}, period = {}, irq = {} ]",
        w.hex64(1, 0),
        w.hex64(3, 2),
        w.int(4)
    )),
    event!(TRC_HVM_EMUL | 0x005, "hpet", 1, |w| format!("destroy [ tn = {} ]", w.int(0))),
    event!(TRC_HVM_EMUL | 0x006, "pit", 0, |_w| "destroy [ ]".to_string()),
    event!(TRC_HVM_EMUL | 0x007, "rtc", 0, |_w| "destroy [ ]".to_string()),
    event!(TRC_HVM_EMUL | 0x008, "vlapic", 0, |_w| "destroy [ ]".to_string()),
    event!(TRC_HVM_EMUL | 0x009, "pit", 0, |_w| "callback [ ]".to_string()),
    event!(TRC_HVM_EMUL | 0x00a, "vlapic", 0, |_w| "callback [ ]".to_string()),
    event!(TRC_HVM_EMUL | 0x00b, "vpic_update_int_output", 3, |w| format!(
        "int_output = {}, is_master = {}, irq = {}",
        w.int(0),
        w.int(1),
        w.int(2)
    )),
    event!(TRC_HVM_EMUL | 0x00c, "vpic", 1, |w| format!("vcpu_kick [ irq = {} ]", w.int(0))),
    event!(TRC_HVM_EMUL | 0x00d, "__vpic_intack", 2, |w| format!(
        "is_master = {}, irq = {}",
        w.int(0),
        w.int(1)
    )),
    event!(TRC_HVM_EMUL | 0x00e, "vpic_irq_positive_edge", 1, |w| format!(
        "irq = {}",
        w.int(0)
    )),
    event!(TRC_HVM_EMUL | 0x00f, "vpic_irq_negative_edge", 1, |w| format!(
        "irq = {}",
        w.int(0)
    )),
    event!(TRC_HVM_EMUL | 0x010, "vpic_ack_pending_irq", 2, |w| format!(
        "accept_pic_intr = {}, int_output = {}",
        w.int(0),
        w.int(1)
    )),
    event!(TRC_HVM_EMUL | 0x011, "vlapic_accept_pic_intr", 2, |w| format!(
        "i8259_target = {}, accept_pic_int = {}",
        w.int(0),
        w.int(1)
    )),
];

pub static TABLES: &[&[EventDef]] = &[&ENTRYEXIT, &HANDLER, &EMUL];

pub(crate) fn table(event_id: u32) -> &'static [EventDef] {
    match event_id & 0x0fff_f000 {
        TRC_HVM_ENTRYEXIT => &ENTRYEXIT,
        TRC_HVM_HANDLER => &HANDLER,
        TRC_HVM_EMUL => &EMUL,
        _ => &[],
    }
}
