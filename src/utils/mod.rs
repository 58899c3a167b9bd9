//! The utilities module provides general capabilities that span the
//! measure, queue, and simulator modules.  The utilities are centered
//! around the error taxonomy shared across the kernel.

pub mod errors;
