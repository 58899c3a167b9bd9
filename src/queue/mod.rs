//! The queue module provides the event queue that drives a simulation run -
//! events carrying relative delays and pure state-transition actions, the
//! composite ordering key that makes dispatch order fully deterministic,
//! and the `EventQueue` facade over the binomial heap.

use std::cmp::Ordering;
use std::fmt;

use crate::measure::{Priority, Time};
use crate::utils::errors::SimulationError;

pub mod binomial_heap;

pub use self::binomial_heap::BinomialHeap;

/// The output of an action: the successor model state, plus any events the
/// action schedules relative to the clock at dispatch.
pub type Transition<S> = (S, Vec<Event<S>>);

/// A pure state transition, invoked exactly once when its event is
/// dispatched.  Actions must not perform I/O or touch shared mutable state;
/// everything an action needs arrives in the model state, and everything it
/// produces leaves in the transition.
pub type Action<S> = Box<dyn FnOnce(S) -> Transition<S>>;

/// An event as created by an action or an embedding caller: a delay
/// relative to the clock at schedule time, a dispatch priority, and the
/// action to invoke.  The delay is validated when the event is scheduled,
/// not when it is created.
pub struct Event<S> {
    delay: f64,
    priority: Priority,
    action: Action<S>,
}

impl<S> Event<S> {
    /// Create an event due `delay` time units after the clock reading at
    /// which it is scheduled.
    pub fn new<F>(delay: f64, priority: Priority, action: F) -> Self
    where
        F: FnOnce(S) -> Transition<S> + 'static,
    {
        Self {
            delay,
            priority,
            action: Box::new(action),
        }
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }
}

impl<S> fmt::Debug for Event<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("delay", &self.delay)
            .field("priority", &self.priority)
            .finish()
    }
}

/// An event that has been accepted into a queue: the absolute due time, the
/// priority, and the sequence number the queue stamped at schedule time.
///
/// The ordering key is due time ascending, then priority descending (higher
/// priority dispatches earlier among same-time events), then sequence
/// ascending.  The sequence number is unique per queue, so the order is
/// total and two events never compare equal.
pub struct ScheduledEvent<S> {
    due: Time,
    priority: Priority,
    sequence: u64,
    action: Action<S>,
}

impl<S> ScheduledEvent<S> {
    /// The absolute simulation-clock time at which this event is due.
    pub fn due(&self) -> Time {
        self.due
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// The scheduling sequence number, which doubles as the event's
    /// identity in dispatch traces.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Consume the event and invoke its action against the model state.
    pub(crate) fn invoke(self, state: S) -> Transition<S> {
        (self.action)(state)
    }
}

impl<S> fmt::Debug for ScheduledEvent<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledEvent")
            .field("due", &self.due)
            .field("priority", &self.priority)
            .field("sequence", &self.sequence)
            .finish()
    }
}

impl<S> Ord for ScheduledEvent<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| other.priority.cmp(&self.priority))
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

impl<S> PartialOrd for ScheduledEvent<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> PartialEq for ScheduledEvent<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S> Eq for ScheduledEvent<S> {}

/// The pending-event queue for one simulation run.  A thin specialization
/// of `BinomialHeap` over the scheduled-event ordering key; no other heap
/// internals are exposed.
#[derive(Debug)]
pub struct EventQueue<S> {
    heap: BinomialHeap<ScheduledEvent<S>>,
    next_sequence: u64,
}

impl<S> EventQueue<S> {
    /// An empty queue.
    pub fn new() -> Self {
        Self {
            heap: BinomialHeap::new(),
            next_sequence: 0,
        }
    }

    /// Accept an event into the queue.  The event's delay is validated here
    /// - a negative or non-finite delay is an `UnschedulableEvent` error -
    /// and its absolute due time is fixed as `clock + delay`.  The returned
    /// queue contains the event stamped with the next sequence number.
    pub fn schedule(self, clock: Time, event: Event<S>) -> Result<Self, SimulationError> {
        let Self {
            heap,
            mut next_sequence,
        } = self;
        let Event {
            delay,
            priority,
            action,
        } = event;
        let delay = Time::new(delay)
            .map_err(|_| SimulationError::UnschedulableEvent { delay, clock })?;
        let scheduled = ScheduledEvent {
            due: clock + delay,
            priority,
            sequence: next_sequence,
            action,
        };
        next_sequence += 1;
        Ok(Self {
            heap: heap.insert(scheduled),
            next_sequence,
        })
    }

    /// Remove and return the most imminent event along with the successor
    /// queue.  `EmptyQueue` when there are no pending events.
    pub fn next(self) -> Result<(ScheduledEvent<S>, Self), SimulationError> {
        let Self {
            heap,
            next_sequence,
        } = self;
        let (event, heap) = heap
            .delete_min()
            .map_err(|_| SimulationError::EmptyQueue)?;
        Ok((
            event,
            Self {
                heap,
                next_sequence,
            },
        ))
    }

    /// The due time of the most imminent pending event, if any.
    pub fn peek_due(&self) -> Option<Time> {
        self.heap.find_min().map(ScheduledEvent::due)
    }

    /// The number of pending events.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<S> Default for EventQueue<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inert(delay: f64, priority: Priority) -> Event<()> {
        Event::new(delay, priority, |state: ()| (state, Vec::new()))
    }

    fn drain(mut queue: EventQueue<()>) -> Vec<(f64, Priority, u64)> {
        let mut dispatched = Vec::new();
        while !queue.is_empty() {
            let (event, remainder) = queue.next().unwrap();
            dispatched.push((event.due().value(), event.priority(), event.sequence()));
            queue = remainder;
        }
        dispatched
    }

    #[test]
    fn priority_breaks_same_time_ties_higher_first() {
        let queue = EventQueue::new()
            .schedule(Time::ZERO, inert(5.0, 0))
            .unwrap()
            .schedule(Time::ZERO, inert(5.0, 1))
            .unwrap()
            .schedule(Time::ZERO, inert(3.0, 0))
            .unwrap();
        let dispatched = drain(queue);
        assert_eq!(
            dispatched,
            vec![(3.0, 0, 2), (5.0, 1, 1), (5.0, 0, 0)]
        );
    }

    #[test]
    fn sequence_breaks_full_ties_first_come_first_served() {
        let mut queue = EventQueue::new();
        for _ in 0..5 {
            queue = queue.schedule(Time::ZERO, inert(2.0, 7)).unwrap();
        }
        let sequences: Vec<u64> = drain(queue)
            .into_iter()
            .map(|(_, _, sequence)| sequence)
            .collect();
        assert_eq!(sequences, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn due_time_is_relative_to_the_schedule_clock() {
        let clock = Time::new(10.0).unwrap();
        let queue = EventQueue::new()
            .schedule(clock, inert(2.5, 0))
            .unwrap();
        assert_eq!(queue.peek_due(), Some(Time::new(12.5).unwrap()));
    }

    #[test]
    fn rejects_negative_and_non_finite_delays() {
        for delay in [-1.0, f64::NAN, f64::INFINITY] {
            let result = EventQueue::<()>::new().schedule(Time::ZERO, inert(delay, 0));
            assert!(matches!(
                result,
                Err(SimulationError::UnschedulableEvent { .. })
            ));
        }
    }

    #[test]
    fn next_on_an_empty_queue_is_an_error() {
        let queue: EventQueue<()> = EventQueue::new();
        assert!(matches!(queue.next(), Err(SimulationError::EmptyQueue)));
    }
}
