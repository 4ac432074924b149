//! Simulation clock for tracking elapsed simulated time.
//!
//! The clock counts simulated seconds, not wall time. It only advances when a
//! running system takes a step.
//!
//! # Example
//!
//! ```rust
//! use mechanics::SimulationClock;
//!
//! let mut clock = SimulationClock::new();
//! assert_eq!(clock.elapsed(), 0.0);
//! assert!(!clock.is_running());
//!
//! clock.start();
//! clock.advance(0.5);
//! assert_eq!(clock.elapsed(), 0.5);
//! ```

/// Elapsed simulated time plus the running flag.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimulationClock {
    /// Elapsed simulated time in seconds.
    elapsed: f64,
    /// Whether the owning system is being integrated.
    running: bool,
}

impl SimulationClock {
    /// Creates a stopped clock at zero.
    #[inline]
    pub const fn new() -> Self {
        Self {
            elapsed: 0.0,
            running: false,
        }
    }

    /// Returns the elapsed simulated time in seconds.
    #[inline]
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Returns whether the clock is running.
    #[inline]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Marks the clock as running. Elapsed time is untouched.
    #[inline]
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Marks the clock as stopped. Elapsed time is untouched.
    #[inline]
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stops the clock and sets the elapsed time back to exactly zero.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Adds `dt` seconds to the elapsed time.
    #[inline]
    pub fn advance(&mut self, dt: f64) {
        self.elapsed += dt;
    }
}
