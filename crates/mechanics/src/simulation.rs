//! The life cycle shared by every system: reset, start, step.

use crate::{Result, SimulationClock};

/// Standard gravitational acceleration in m/s².
pub const GRAVITY: f64 = 9.81;

/// Returns a time delta for a given number of frames per second.
///
/// # Example
///
/// ```rust
/// use mechanics::fps;
///
/// assert_eq!(fps(60), 1.0 / 60.0);
/// ```
#[inline]
pub fn fps(n: u32) -> f64 {
    1.0 / n as f64
}

/// Angle, angular velocity and the last computed angular acceleration of one
/// pendulum arm.
///
/// The angle is measured from the downward vertical and is never wrapped, so
/// a pendulum that loops over the top keeps counting.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AngularState {
    /// Angle in radians.
    pub angle: f64,
    /// Angular velocity in rad/s.
    pub angular_velocity: f64,
    /// Angular acceleration in rad/s² from the most recent step.
    pub angular_acceleration: f64,
}

impl AngularState {
    /// A state at rest at `angle_degrees` from the vertical.
    #[inline]
    pub fn at_rest(angle_degrees: f64) -> Self {
        Self {
            angle: angle_degrees.to_radians(),
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
        }
    }

    /// One semi-implicit Euler update: velocity first, then the new
    /// velocity moves the angle.
    #[inline]
    pub fn integrate(&mut self, angular_acceleration: f64, dt: f64) {
        self.angular_acceleration = angular_acceleration;
        self.angular_velocity += angular_acceleration * dt;
        self.angle += self.angular_velocity * dt;
    }
}

/// A fixed-step mechanical system driven by an external loop.
///
/// The driver calls [`reset`](Simulation::reset) whenever parameters change,
/// [`start`](Simulation::start) on an explicit request, and
/// [`step`](Simulation::step) once per frame. Snapshots are plain values the
/// driver can hand to a renderer.
///
/// # Example
///
/// ```rust
/// use mechanics::{fps, Simulation, SimplePendulum, SimplePendulumParams};
///
/// fn run<S: Simulation>(system: &mut S, frames: usize) -> S::Snapshot {
///     for _ in 0..frames {
///         system.step(fps(60));
///     }
///     system.snapshot()
/// }
///
/// let mut pendulum = SimplePendulum::new(SimplePendulumParams::default());
/// pendulum.start().unwrap();
/// let snapshot = run(&mut pendulum, 60);
/// assert!((snapshot.elapsed - 1.0).abs() < 1e-9);
/// ```
pub trait Simulation {
    /// User-facing parameters accepted by `reset`.
    type Params: Clone;
    /// Read-only view of the current state.
    type Snapshot;

    /// Reinitializes the state from `params` and stops the clock.
    ///
    /// Any values are accepted here, including ones `start` will refuse.
    fn reset(&mut self, params: Self::Params);

    /// Returns to the last reset snapshot, validates the stored parameters
    /// and starts the clock if they pass.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`](crate::ValidationError) when a parameter
    /// is out of range. The system then stays stopped.
    fn start(&mut self) -> Result<()>;

    /// Advances the state by `dt` seconds. Does nothing while stopped.
    fn step(&mut self, dt: f64);

    /// Current positions, velocities and readouts.
    fn snapshot(&self) -> Self::Snapshot;

    /// Parameters from the last reset.
    fn params(&self) -> &Self::Params;

    /// The simulation clock.
    fn clock(&self) -> &SimulationClock;

    /// Whether `step` currently integrates.
    fn is_running(&self) -> bool {
        self.clock().is_running()
    }

    /// Elapsed simulated time in seconds.
    fn elapsed(&self) -> f64 {
        self.clock().elapsed()
    }
}
