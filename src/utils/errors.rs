use thiserror::Error;

use crate::measure::Time;
use crate::simulator::TraceRecord;

/// `SimulationError` enumerates all possible errors returned by shopfloor.
///
/// Structural errors (`EmptyHeap`, `EmptyQueue`) signal engine or embedding
/// bugs: the driver checks for pending events before selecting one, so
/// neither should surface from a run.  Semantic errors carry enough context
/// to diagnose the offending schedule, and are never retried - retry has no
/// defined meaning for a deterministic clock-driven process.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Represents a delete-min operation on an empty heap
    #[error("A minimum element was requested from an empty heap")]
    EmptyHeap,

    /// Represents a next-event request on an empty event queue
    #[error("A next event was requested from an empty event queue")]
    EmptyQueue,

    /// Represents a dispatched event due before the current clock; the run
    /// cannot safely continue once time ordering is broken
    #[error("An event due at {due} was dispatched after the clock reached {clock}")]
    CausalityViolation {
        /// Due time of the offending event
        due: Time,
        /// Clock reading at the point of failure
        clock: Time,
        /// Events still pending when the violation was detected
        pending_events: usize,
        /// The dispatch trace up to the point of failure
        trace: Vec<TraceRecord>,
    },

    /// Represents an event with a negative or non-finite delay, rejected at
    /// schedule time
    #[error("An event with delay {delay} cannot be scheduled at clock {clock}")]
    UnschedulableEvent {
        /// The rejected relative delay
        delay: f64,
        /// Clock reading at schedule time
        clock: Time,
    },

    /// Represents a negative or non-finite simulation clock value
    #[error("{value} is not a valid simulation time")]
    InvalidTimeValue { value: f64 },

    /// Transparent serde_json errors
    #[error(transparent)]
    JSONError(#[from] serde_json::error::Error),
}
