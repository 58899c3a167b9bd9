//! # Overview
//! Shopfloor provides a discrete event simulation kernel for industrial and
//! manufacturing process models.
//!
//! This repository contains:
//!
//! * A mergeable binomial-heap priority queue, used as the event queue, with
//! value semantics throughout - every operation returns the successor heap.
//! * An event queue specialization with a fully deterministic dispatch
//! order: due time, then priority, then scheduling sequence.
//! * A simulation driver, which advances the simulation clock, dispatches
//! events against a caller-supplied model state, and folds newly scheduled
//! events back into the queue while enforcing causal ordering.
//!
//! The kernel is generic over the model state. Actions are pure state
//! transitions, so independent simulation runs share nothing and may execute
//! concurrently without synchronization.
pub mod measure;
pub mod queue;
pub mod simulator;
pub mod utils;
