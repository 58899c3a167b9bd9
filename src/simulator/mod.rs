//! The simulator module provides the dispatch loop that orchestrates a
//! discrete event simulation run.  The driver repeatedly selects the most
//! imminent event, advances the simulation clock to that event's due time,
//! invokes the event's action against the model state, and folds any newly
//! scheduled events back into the queue.
//!
//! Everything the driver touches is an owned value - model state, clock,
//! and queue are threaded through each step and replaced wholesale, never
//! shared or mutated in place.  Independent runs therefore share nothing
//! and may execute concurrently without synchronization.
//!
//! Queue exhaustion is normal completion, not an error: a run with no
//! pending events terminates with `Termination::EventsExhausted`.  Callers
//! that want other stopping rules compose a stop predicate over the model
//! state, evaluated once per dispatch cycle.

use serde::{Deserialize, Serialize};

use crate::measure::Time;
use crate::queue::{Event, EventQueue};
use crate::utils::errors::SimulationError;

pub mod trace;

pub use self::trace::TraceRecord;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Termination {
    /// The stop predicate held before a dispatch cycle.
    Requested,
    /// The event queue ran dry - the normal end of a simulation run.
    EventsExhausted,
}

/// The driver's state machine: `Ready` before the first dispatch, `Running`
/// between dispatches, `Terminated` once a run has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunState {
    Ready,
    Running,
    Terminated(Termination),
}

/// The `Simulation` struct is the core of shopfloor, and includes
/// everything needed to execute a run - the caller's model state, the
/// simulation clock, the pending-event queue, the run state machine, and
/// the dispatch trace.
///
/// The model state is exclusively owned by the driver for the duration of
/// the run and replaced wholesale at each dispatch; no state is aliased
/// between the queue and the model.
#[derive(Debug)]
pub struct Simulation<S> {
    model: S,
    clock: Time,
    queue: EventQueue<S>,
    run_state: RunState,
    trace: Vec<TraceRecord>,
}

impl<S> Simulation<S> {
    /// This constructor method creates a simulation from a supplied model
    /// state and the events that seed the run, all scheduled relative to
    /// clock zero.
    pub fn post(model: S, initial_events: Vec<Event<S>>) -> Result<Self, SimulationError> {
        let mut queue = EventQueue::new();
        for event in initial_events {
            queue = queue.schedule(Time::ZERO, event)?;
        }
        Ok(Self::resume(model, queue, Time::ZERO))
    }

    /// Build a simulation around an existing queue and clock reading, for
    /// embedding callers that assemble queues directly or continue from a
    /// checkpointed pair of values.
    pub fn resume(model: S, queue: EventQueue<S>, clock: Time) -> Self {
        Self {
            model,
            clock,
            queue,
            run_state: RunState::Ready,
            trace: Vec::new(),
        }
    }

    /// An accessor method for the simulation clock.
    pub fn get_clock(&self) -> Time {
        self.clock
    }

    /// An accessor method for the run state machine.
    pub fn get_run_state(&self) -> RunState {
        self.run_state
    }

    /// A reference to the model state at the current point of the run.
    pub fn model(&self) -> &S {
        &self.model
    }

    /// Consume the simulation and return the final model state.
    pub fn into_model(self) -> S {
        self.model
    }

    /// The number of pending events.
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// The dispatch trace so far, one record per dispatched event, in
    /// dispatch order.  Trace history is retained for the whole run, so
    /// embedding callers can forward records to whatever sink they use.
    pub fn get_trace(&self) -> &[TraceRecord] {
        &self.trace
    }

    /// The dispatch trace serialized as JSON, for export to external
    /// tooling.
    pub fn get_trace_json(&self) -> Result<String, SimulationError> {
        Ok(serde_json::to_string(&self.trace)?)
    }

    /// Event injection schedules an event during simulation execution,
    /// relative to the current clock, without going through an action.
    /// This enables live disruption and manipulation of a run through the
    /// standard scheduling rules.
    pub fn schedule(self, event: Event<S>) -> Result<Self, SimulationError> {
        let Self {
            model,
            clock,
            queue,
            run_state,
            trace,
        } = self;
        let queue = queue.schedule(clock, event)?;
        Ok(Self {
            model,
            clock,
            queue,
            run_state,
            trace,
        })
    }

    /// Execute a single dispatch cycle: pop the most imminent event,
    /// advance the clock to its due time, invoke its action against the
    /// model state, and fold the resulting events back into the queue.
    ///
    /// An empty queue transitions the run to `Terminated(EventsExhausted)`
    /// - queue exhaustion is deliberate, normal completion here, where a
    /// legacy design signaled an out-of-events exception.  A terminated
    /// simulation steps to itself unchanged.
    ///
    /// A popped event due before the current clock is a fatal
    /// `CausalityViolation`: time ordering is broken and the run cannot
    /// safely continue.  The error carries the offending due time, the
    /// clock at failure, the pending-event count, and the partial dispatch
    /// trace.
    pub fn step(self) -> Result<Self, SimulationError> {
        if let RunState::Terminated(_) = self.run_state {
            return Ok(self);
        }
        let Self {
            model,
            clock,
            queue,
            mut trace,
            ..
        } = self;
        if queue.is_empty() {
            return Ok(Self {
                model,
                clock,
                queue,
                run_state: RunState::Terminated(Termination::EventsExhausted),
                trace,
            });
        }
        let (event, mut queue) = queue.next()?;
        if event.due() < clock {
            return Err(SimulationError::CausalityViolation {
                due: event.due(),
                clock,
                pending_events: queue.len(),
                trace,
            });
        }
        let clock = event.due();
        trace.push(TraceRecord::new(clock, event.sequence(), event.priority()));
        let (model, new_events) = event.invoke(model);
        for new_event in new_events {
            queue = queue.schedule(clock, new_event)?;
        }
        Ok(Self {
            model,
            clock,
            queue,
            run_state: RunState::Running,
            trace,
        })
    }

    /// Run until the event queue is exhausted.
    pub fn run(self) -> Result<Self, SimulationError> {
        self.run_until(|_| false)
    }

    /// Run until the stop predicate holds, the event queue is exhausted, or
    /// the run was already terminated.  The predicate is evaluated once per
    /// dispatch cycle, before the next event is selected; there is no
    /// preemption mid-action.
    pub fn run_until<F>(mut self, mut stop: F) -> Result<Self, SimulationError>
    where
        F: FnMut(&S) -> bool,
    {
        loop {
            if let RunState::Terminated(_) = self.run_state {
                return Ok(self);
            }
            if stop(&self.model) {
                self.run_state = RunState::Terminated(Termination::Requested);
                return Ok(self);
            }
            self = self.step()?;
        }
    }
}
