//! Event id layout and class constants of the xentrace id space.
//!
//! An id is 28 bits wide: bits 16-27 select the class, bits 12-15 the
//! subclass and the low 12 bits the specific event plus variant flags.

pub const TRC_CLS_SHIFT: u32 = 16;
pub const TRC_SUBCLS_SHIFT: u32 = 12;
pub const TRC_ID_MASK: u32 = 0x0fff_ffff;

/// Variant flag marking events whose address operands are 64 bits wide
pub const TRC_64_FLAG: u32 = 0x100;

// Classes (with their subclass fields filled in where a subclass is fixed)
pub const TRC_GEN: u32 = 0x0001_f000;
pub const TRC_SCHED: u32 = 0x0002_f000;
pub const TRC_DOM0OP: u32 = 0x0004_f000;
pub const TRC_HVM: u32 = 0x0008_f000;
pub const TRC_MEM: u32 = 0x0010_f000;
pub const TRC_PV: u32 = 0x0020_f000;
pub const TRC_SHADOW: u32 = 0x0040_f000;
pub const TRC_HW: u32 = 0x0080_f000;

// Scheduler subclasses
pub const TRC_SCHED_MIN: u32 = 0x0002_1000;
pub const TRC_SCHED_CLASS: u32 = 0x0002_2000;
pub const TRC_SCHED_VERBOSE: u32 = 0x0002_8000;

/// Bits of a scheduler-class id that select the scheduling algorithm
pub const TRC_SCHED_ID_SHIFT: u32 = 9;
pub const TRC_SCHED_ID_MASK: u32 = 0x7;

pub const TRC_SCHED_CSCHED: u32 = 0;
pub const TRC_SCHED_CSCHED2: u32 = 1;
pub const TRC_SCHED_RTDS: u32 = 4;
pub const TRC_SCHED_SNULL: u32 = 5;

pub const TRC_DOM0_DOMOPS: u32 = 0x0004_1000;

pub const TRC_HVM_ENTRYEXIT: u32 = 0x0008_1000;
pub const TRC_HVM_HANDLER: u32 = 0x0008_2000;
pub const TRC_HVM_EMUL: u32 = 0x0008_4000;

pub const TRC_PV_ENTRY: u32 = 0x0020_1000;
pub const TRC_PV_SUBCALL: u32 = 0x0020_2000;

pub const TRC_HW_PM: u32 = 0x0080_1000;
pub const TRC_HW_IRQ: u32 = 0x0080_2000;

// Events the reader itself interprets
pub const TRC_TRACE_CPU_CHANGE: u32 = TRC_GEN | 0x003;
pub const TRC_SCHED_CONTINUE_RUNNING: u32 = TRC_SCHED_MIN | 0x002;
pub const TRC_SCHED_SWITCH_INFNEXT: u32 = TRC_SCHED_VERBOSE | 0x00f;

/// Runstate change events share this pattern once the two state nibbles are masked
pub const TRC_SCHED_RUNSTATE_CHANGE: u32 = TRC_SCHED_MIN | 0x001;
pub const RUNSTATE_CHANGE_MASK: u32 = 0x0fff_f00f;
/// Value of the new-state nibble meaning "running"
pub const RUNSTATE_RUNNING: u32 = 0;
