//! Undamped simple pendulum with energy bookkeeping.
//!
//! The equation of motion is the full nonlinear one, `θ'' = -(g/L) sin θ`,
//! with no small-angle approximation. Energies are recomputed from the state
//! on every snapshot. They drift slowly because the integrator does not
//! conserve energy, and that drift is part of what the readout shows.
//!
//! # Example
//!
//! ```rust
//! use mechanics::{fps, Simulation, SimplePendulum, SimplePendulumParams};
//!
//! let mut pendulum = SimplePendulum::new(SimplePendulumParams::new(1.0, 2.0, 30.0));
//! pendulum.start().unwrap();
//!
//! let before = pendulum.snapshot().total_energy;
//! for _ in 0..600 {
//!     pendulum.step(fps(60));
//! }
//! let after = pendulum.snapshot().total_energy;
//! assert!(((after - before) / before).abs() < 0.05);
//! ```

use tracing::{debug, warn};

use crate::error::{check_angle, check_length, check_mass};
use crate::simulation::{AngularState, Simulation, GRAVITY};
use crate::{Arm, Point, Result, SimulationClock, Vector};

/// Largest starting angle, in degrees either side of the vertical, that a run
/// may start from. Closer to the inverted position the fixed-step integrator
/// becomes fragile.
pub const MAX_START_ANGLE_DEGREES: f64 = 170.0;

/// Parameters for a [`SimplePendulum`] run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimplePendulumParams {
    /// Arm length in metres.
    pub length: f64,
    /// Bob mass in kilograms.
    pub mass: f64,
    /// Starting angle from the vertical in degrees.
    pub initial_angle_degrees: f64,
}

impl SimplePendulumParams {
    /// Creates parameters from length (m), mass (kg) and angle (degrees).
    #[inline]
    pub const fn new(length: f64, mass: f64, initial_angle_degrees: f64) -> Self {
        Self {
            length,
            mass,
            initial_angle_degrees,
        }
    }

    /// Checks the start conditions.
    ///
    /// # Errors
    ///
    /// Returns the first failing condition: length, then mass, then angle.
    pub fn validate(&self) -> Result<()> {
        check_length(Arm::Single, self.length)?;
        check_mass(Arm::Single, self.mass)?;
        check_angle(
            self.initial_angle_degrees,
            -MAX_START_ANGLE_DEGREES,
            MAX_START_ANGLE_DEGREES,
        )
    }
}

impl Default for SimplePendulumParams {
    fn default() -> Self {
        Self::new(5.0, 1.0, 45.0)
    }
}

/// Read-only view of a [`SimplePendulum`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimplePendulumSnapshot {
    /// Angle, velocity and acceleration of the arm.
    pub arm: AngularState,
    /// Bob position in metres, y growing downward from the pivot.
    pub bob: Point,
    /// Largest angular distance from the bottom of the swing reached since
    /// the last reset, in radians. Never more than π, even if the bob goes
    /// over the top.
    pub max_amplitude: f64,
    /// Potential energy above the lowest point, in joules.
    pub potential_energy: f64,
    /// Kinetic energy in joules.
    pub kinetic_energy: f64,
    /// Sum of potential and kinetic energy.
    pub total_energy: f64,
    /// Elapsed simulated time in seconds.
    pub elapsed: f64,
    /// Whether the pendulum is being integrated.
    pub running: bool,
}

/// A single undamped pendulum.
#[derive(Debug, Clone, PartialEq)]
pub struct SimplePendulum {
    params: SimplePendulumParams,
    gravity: f64,
    pivot: Point,
    arm: AngularState,
    max_amplitude: f64,
    clock: SimulationClock,
}

impl SimplePendulum {
    /// Creates a stopped pendulum reset to `params`, with the pivot at the
    /// origin and standard gravity.
    pub fn new(params: SimplePendulumParams) -> Self {
        let mut pendulum = Self {
            params,
            gravity: GRAVITY,
            pivot: Point::origin(),
            arm: AngularState::default(),
            max_amplitude: 0.0,
            clock: SimulationClock::new(),
        };
        pendulum.reset(params);
        pendulum
    }

    /// Replaces the gravitational acceleration (m/s²).
    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    /// Moves the pivot. Positions are reported relative to the same frame.
    pub fn with_pivot(mut self, pivot: Point) -> Self {
        self.pivot = pivot;
        self
    }

    /// Gravitational acceleration in m/s².
    #[inline]
    pub const fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Current angular state.
    #[inline]
    pub const fn arm(&self) -> AngularState {
        self.arm
    }

    /// Bob position for the current angle.
    pub fn bob(&self) -> Point {
        self.pivot + Vector::from_arm(self.params.length, self.arm.angle)
    }

    /// `m g h`, with `h` the height above the lowest point of the swing.
    pub fn potential_energy(&self) -> f64 {
        let height = self.params.length * (1.0 - self.arm.angle.cos());
        self.params.mass * self.gravity * height
    }

    /// `½ m v²` with `v = L ω`.
    pub fn kinetic_energy(&self) -> f64 {
        let speed = self.params.length * self.arm.angular_velocity;
        0.5 * self.params.mass * speed * speed
    }

    /// Potential plus kinetic energy.
    pub fn total_energy(&self) -> f64 {
        self.potential_energy() + self.kinetic_energy()
    }

    /// Period of small oscillations, `2π √(L/g)`.
    pub fn small_angle_period(&self) -> f64 {
        core::f64::consts::TAU * (self.params.length / self.gravity).sqrt()
    }
}

/// Distance of an unwrapped angle from the bottom of the swing, in `[0, π]`.
fn amplitude(angle: f64) -> f64 {
    use core::f64::consts::{PI, TAU};
    ((angle + PI).rem_euclid(TAU) - PI).abs()
}

impl Simulation for SimplePendulum {
    type Params = SimplePendulumParams;
    type Snapshot = SimplePendulumSnapshot;

    fn reset(&mut self, params: SimplePendulumParams) {
        self.params = params;
        self.arm = AngularState::at_rest(params.initial_angle_degrees);
        self.max_amplitude = amplitude(self.arm.angle);
        self.clock.reset();
        debug!(
            length = params.length,
            mass = params.mass,
            angle_degrees = params.initial_angle_degrees,
            "Simple pendulum reset"
        );
    }

    fn start(&mut self) -> Result<()> {
        self.reset(self.params);
        if let Err(err) = self.params.validate() {
            warn!(error = %err, "Simple pendulum not started");
            return Err(err);
        }
        self.clock.start();
        debug!("Simple pendulum started");
        Ok(())
    }

    fn step(&mut self, dt: f64) {
        if !self.clock.is_running() {
            return;
        }
        let acceleration = -(self.gravity / self.params.length) * self.arm.angle.sin();
        self.arm.integrate(acceleration, dt);
        self.max_amplitude = self.max_amplitude.max(amplitude(self.arm.angle));
        self.clock.advance(dt);
    }

    fn snapshot(&self) -> SimplePendulumSnapshot {
        let potential_energy = self.potential_energy();
        let kinetic_energy = self.kinetic_energy();
        SimplePendulumSnapshot {
            arm: self.arm,
            bob: self.bob(),
            max_amplitude: self.max_amplitude,
            potential_energy,
            kinetic_energy,
            total_energy: potential_energy + kinetic_energy,
            elapsed: self.clock.elapsed(),
            running: self.clock.is_running(),
        }
    }

    fn params(&self) -> &SimplePendulumParams {
        &self.params
    }

    fn clock(&self) -> &SimulationClock {
        &self.clock
    }
}
