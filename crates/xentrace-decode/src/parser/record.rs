//! Decoded trace record.

use serde::Serialize;

use crate::events::{classify, EventClass};
use crate::utils::config::DOM_IDLE;

/// One traced occurrence, with the CPU and guest context folded in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceRecord {
    /// 28-bit event id
    pub event_id: u32,

    /// Physical CPU the event was recorded on
    pub cpu: u16,

    /// Raw cycle counter
    pub tsc: u64,

    /// Domain the event ran in (`DOM_IDLE` for the idle domain)
    pub dom: u16,

    /// Virtual CPU within the domain
    pub vcpu: u16,

    /// Trailing payload words
    pub extra: Vec<u32>,

    /// Byte offset of the record in the stream
    pub offset: u64,
}

impl TraceRecord {
    pub fn is_idle(&self) -> bool {
        self.dom == DOM_IDLE
    }

    pub fn class(&self) -> EventClass {
        classify(self.event_id).0
    }

    /// Task label shown by the host: `idle/vN` or `dD/vN`
    pub fn task_label(&self) -> String {
        if self.is_idle() {
            format!("idle/v{}", self.vcpu)
        } else {
            format!("d{}/v{}", self.dom, self.vcpu)
        }
    }

    /// Task id handed to the host, 0 for the idle domain
    pub fn pid(&self) -> i32 {
        if self.is_idle() {
            0
        } else {
            ((i32::from(self.dom) << 16) | i32::from(self.vcpu)) + 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(dom: u16, vcpu: u16) -> TraceRecord {
        TraceRecord {
            event_id: 0x0002_8004,
            cpu: 0,
            tsc: 0,
            dom,
            vcpu,
            extra: vec![],
            offset: 0,
        }
    }

    #[test]
    fn test_task_label() {
        assert_eq!(record(DOM_IDLE, 3).task_label(), "idle/v3");
        assert_eq!(record(5, 1).task_label(), "d5/v1");
    }

    #[test]
    fn test_pid() {
        assert_eq!(record(DOM_IDLE, 3).pid(), 0);
        assert_eq!(record(0, 0).pid(), 1);
        assert_eq!(record(5, 1).pid(), 0x0005_0002);
    }
}
