use serde::{Deserialize, Serialize};

use crate::measure::{Priority, Time};

/// One record per dispatch cycle: the clock reading the dispatch advanced
/// to, the dispatched event's identity (its scheduling sequence number),
/// and its priority.  The driver retains these in dispatch order; any
/// external sink, buffering, or wire format is the embedding caller's
/// concern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceRecord {
    clock: Time,
    sequence: u64,
    priority: Priority,
}

impl TraceRecord {
    pub(crate) fn new(clock: Time, sequence: u64, priority: Priority) -> Self {
        Self {
            clock,
            sequence,
            priority,
        }
    }

    pub fn clock(&self) -> Time {
        self.clock
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }
}
