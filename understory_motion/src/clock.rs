// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time sources.
//!
//! A resolution pass reads its clock exactly once and hands the same `now` to
//! every transition and animation, so elements that started together stay in
//! step.

use core::cell::Cell;

/// A monotonic time source, in seconds.
pub trait Clock {
    /// Returns the current time in seconds.
    fn now(&self) -> f64;
}

impl<F: Fn() -> f64> Clock for F {
    #[inline]
    fn now(&self) -> f64 {
        self()
    }
}

/// A clock that only moves when told to.
///
/// ```rust
/// use understory_motion::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// clock.advance(0.25);
/// clock.advance(0.25);
/// assert_eq!(clock.now(), 0.5);
/// clock.set(2.0);
/// assert_eq!(clock.now(), 2.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    /// Creates a clock reading `0.0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock reading `seconds`.
    #[must_use]
    pub fn at(seconds: f64) -> Self {
        Self {
            now: Cell::new(seconds),
        }
    }

    /// Moves the clock to `seconds`.
    ///
    /// Moving backwards is ignored; the clock is monotonic.
    pub fn set(&self, seconds: f64) {
        if seconds > self.now.get() {
            self.now.set(seconds);
        }
    }

    /// Moves the clock forward by `seconds`.
    pub fn advance(&self, seconds: f64) {
        self.set(self.now.get() + seconds);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// Wall-clock time elapsed since the clock was created.
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemClock {
    /// Starts a clock at `0.0`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_is_monotonic() {
        let clock = ManualClock::at(1.0);
        clock.set(0.5);
        assert_eq!(clock.now(), 1.0);
        clock.advance(-1.0);
        assert_eq!(clock.now(), 1.0);
        clock.advance(0.5);
        assert_eq!(clock.now(), 1.5);
    }

    #[test]
    fn closures_are_clocks() {
        let fixed = || 3.0;
        assert_eq!(Clock::now(&fixed), 3.0);
    }

    #[cfg(feature = "std")]
    #[test]
    fn system_clock_starts_near_zero() {
        let clock = SystemClock::new();
        let now = clock.now();
        assert!(now >= 0.0);
        assert!(now < 60.0);
    }
}
