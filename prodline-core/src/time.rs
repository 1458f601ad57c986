//! Simulation time management

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

use crate::error::SimError;

/// A point on the virtual clock, measured in abstract time units (hours for
/// the production line) since the simulation start.
///
/// The value is always finite and non-negative, which is what makes the total
/// ordering below sound.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimTime(f64);

impl SimTime {
    /// The simulation start.
    pub const fn zero() -> Self {
        SimTime(0.0)
    }

    /// Create a SimTime, rejecting negative or non-finite values.
    pub fn new(units: f64) -> Result<Self, SimError> {
        if !units.is_finite() || units < 0.0 {
            return Err(SimError::InvalidTime(units));
        }
        Ok(SimTime::normalized(units))
    }

    // -0.0 passes the sign check; fold it into +0.0.
    fn normalized(units: f64) -> Self {
        SimTime(units + 0.0)
    }

    /// Get the raw time value
    pub const fn as_f64(&self) -> f64 {
        self.0
    }

    /// Elapsed time since an earlier instant. Saturates at zero.
    pub fn elapsed_since(&self, earlier: SimTime) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }

    /// Move this instant forward by `delay` units. Negative or non-finite
    /// delays are clamped to zero so the clock never runs backwards.
    pub fn after(&self, delay: f64) -> Self {
        if delay.is_finite() && delay > 0.0 {
            SimTime(self.0 + delay)
        } else {
            *self
        }
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Add<f64> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: f64) -> Self::Output {
        self.after(rhs)
    }
}

impl Add<SimTime> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: SimTime) -> Self::Output {
        SimTime(self.0 + rhs.0)
    }
}

impl Sub<SimTime> for SimTime {
    type Output = f64;

    fn sub(self, rhs: SimTime) -> Self::Output {
        self.elapsed_since(rhs)
    }
}

impl Default for SimTime {
    fn default() -> Self {
        SimTime::zero()
    }
}

impl From<f64> for SimTime {
    /// Convert from time units to SimTime
    ///
    /// # Examples
    /// ```
    /// # use prodline_core::SimTime;
    /// let time = SimTime::from(1.5);
    /// assert_eq!(time.as_f64(), 1.5);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the input is negative, infinite, or NaN.
    fn from(units: f64) -> Self {
        if !units.is_finite() {
            panic!("SimTime cannot be created from non-finite value: {units}");
        }
        if units < 0.0 {
            panic!("SimTime cannot be negative: {units}");
        }
        SimTime::normalized(units)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}
