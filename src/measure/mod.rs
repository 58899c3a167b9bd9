//! The measure module provides the validated value types that the rest of
//! the kernel is built on - simulation clock readings and event priorities.
//! Clock readings are non-negative, finite, and totally ordered, so they
//! can serve as heap keys directly.

use std::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::utils::errors::SimulationError;

/// The relative dispatch priority of an event.  Among events sharing a due
/// time, a higher priority dispatches earlier.
pub type Priority = i32;

/// A simulation clock reading, in model time units.  Both absolute clock
/// values and relative offsets are represented by this type; values are
/// never negative, NaN, or infinite, which is what makes the total order
/// (and therefore the event queue ordering) well defined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Time(f64);

impl Time {
    /// The clock reading at the start of every simulation run.
    pub const ZERO: Time = Time(0.0);

    /// Construct a clock reading from a raw value, rejecting negative and
    /// non-finite inputs.
    pub fn new(value: f64) -> Result<Self, SimulationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(SimulationError::InvalidTimeValue { value });
        }
        // Normalize -0.0 so equality and the total order agree
        Ok(Time(value + 0.0))
    }

    /// The raw value of this clock reading.
    pub fn value(&self) -> f64 {
        self.0
    }
}

// Valid because the constructor excludes NaN
impl Eq for Time {}

impl Ord for Time {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for Time {
    type Output = Time;

    fn add(self, other: Time) -> Time {
        Time(self.0 + other.0)
    }
}

impl TryFrom<f64> for Time {
    type Error = SimulationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Time::new(value)
    }
}

impl From<Time> for f64 {
    fn from(time: Time) -> f64 {
        time.0
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_clock_readings() {
        assert!(Time::new(-1.0).is_err());
        assert!(Time::new(f64::NAN).is_err());
        assert!(Time::new(f64::INFINITY).is_err());
        assert!(Time::new(0.0).is_ok());
        assert!(Time::new(17.25).is_ok());
    }

    #[test]
    fn orders_and_adds_clock_readings() {
        let three = Time::new(3.0).unwrap();
        let five = Time::new(5.0).unwrap();
        assert!(three < five);
        assert_eq!(Time::ZERO + three, three);
        assert_eq!((three + five).value(), 8.0);
    }

    #[test]
    fn negative_zero_normalizes() {
        let negative_zero = Time::new(-0.0).unwrap();
        assert_eq!(negative_zero, Time::ZERO);
        assert_eq!(negative_zero.cmp(&Time::ZERO), std::cmp::Ordering::Equal);
    }

    #[test]
    fn deserialization_enforces_validation() {
        assert!(serde_json::from_str::<Time>("4.5").is_ok());
        assert!(serde_json::from_str::<Time>("-4.5").is_err());
    }
}
