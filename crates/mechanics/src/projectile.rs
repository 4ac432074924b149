//! Drag-free projectile launched from a fixed point above flat ground.
//!
//! Positions are in a height-above-ground frame: `y` is measured upward and
//! the ground is the line `y = 0`. Gravity only acts on the vertical velocity.
//!
//! A run ends on ground impact. The projectile is clamped to the ground, its
//! velocity is zeroed and the clock stops. There is no bounce.
//!
//! # Example
//!
//! ```rust
//! use mechanics::{fps, Projectile, ProjectileParams, Simulation};
//!
//! let mut ball = Projectile::new(ProjectileParams::new(10.0, 30.0, 2.0));
//! ball.start().unwrap();
//!
//! for _ in 0..600 {
//!     ball.step(fps(60));
//! }
//!
//! let snapshot = ball.snapshot();
//! assert!(!snapshot.running);
//! assert_eq!(snapshot.position.y, 0.0);
//! assert!(snapshot.max_height > 2.0);
//! ```

use tracing::{debug, info, warn};

use crate::error::{check_angle, check_finite, is_positive};
use crate::simulation::{Simulation, GRAVITY};
use crate::{Point, Result, SimulationClock, TrajectoryTrace, ValidationError, Vector};

/// Horizontal position of the launch point in metres.
pub const LAUNCH_X: f64 = 1.0;

/// Number of positions kept in the trace.
pub const TRACE_CAPACITY: usize = 1000;

/// Minimum flight time before a launch from ground level may land.
///
/// Without it, a launch from `y = 0` would count as an impact on its very
/// first step.
pub const GROUND_LAUNCH_GRACE: f64 = 0.1;

/// Parameters for a [`Projectile`] launch.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectileParams {
    /// Launch speed in m/s.
    pub speed: f64,
    /// Launch angle above the horizontal in degrees.
    pub launch_angle_degrees: f64,
    /// Height of the launch point above the ground in metres.
    pub initial_height: f64,
}

impl ProjectileParams {
    /// Creates launch parameters from speed (m/s), angle (degrees) and
    /// initial height (m).
    #[inline]
    pub const fn new(speed: f64, launch_angle_degrees: f64, initial_height: f64) -> Self {
        Self {
            speed,
            launch_angle_degrees,
            initial_height,
        }
    }

    /// Checks the launch conditions.
    ///
    /// # Errors
    ///
    /// Fails when the speed is not positive, the angle is outside 0°–90°
    /// (both ends accepted), or the speed or initial height is not finite.
    /// Any finite height is accepted, including negative ones.
    pub fn validate(&self) -> Result<()> {
        if !is_positive(self.speed) {
            return Err(ValidationError::NonPositiveSpeed { value: self.speed });
        }
        check_finite("launch speed", self.speed)?;
        check_angle(self.launch_angle_degrees, 0.0, 90.0)?;
        check_finite("initial height", self.initial_height)
    }

    /// Initial velocity, up positive.
    pub fn launch_velocity(&self) -> Vector {
        let angle = self.launch_angle_degrees.to_radians();
        Vector::new(self.speed * angle.cos(), self.speed * angle.sin())
    }
}

impl Default for ProjectileParams {
    fn default() -> Self {
        Self::new(10.0, 45.0, 0.5)
    }
}

/// Read-only view of a [`Projectile`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProjectileSnapshot {
    /// Position in metres, y up from the ground.
    pub position: Point,
    /// Velocity in m/s, y up.
    pub velocity: Vector,
    /// Highest point reached, never below the launch height.
    pub max_height: f64,
    /// Horizontal distance from launch to where the projectile stopped.
    /// `None` while flying or before launch.
    pub range: Option<f64>,
    /// Time of flight in seconds.
    pub elapsed: f64,
    /// Whether the projectile is in flight.
    pub running: bool,
}

/// A point projectile under constant gravity.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    params: ProjectileParams,
    gravity: f64,
    pos: Point,
    vel: Vector,
    max_height: f64,
    clock: SimulationClock,
    trace: TrajectoryTrace,
}

impl Projectile {
    /// Creates a projectile reset to `params`, waiting on the launch point.
    pub fn new(params: ProjectileParams) -> Self {
        let mut projectile = Self {
            params,
            gravity: GRAVITY,
            pos: Point::origin(),
            vel: Vector::zero(),
            max_height: 0.0,
            clock: SimulationClock::new(),
            trace: TrajectoryTrace::new(TRACE_CAPACITY),
        };
        projectile.reset(params);
        projectile
    }

    /// Replaces the gravitational acceleration (m/s², pulling down).
    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    /// Gravitational acceleration in m/s².
    #[inline]
    pub const fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Current position.
    #[inline]
    pub const fn position(&self) -> Point {
        self.pos
    }

    /// Current velocity.
    #[inline]
    pub const fn velocity(&self) -> Vector {
        self.vel
    }

    /// Recent positions, oldest first.
    #[inline]
    pub const fn trace(&self) -> &TrajectoryTrace {
        &self.trace
    }

    /// Highest point reached so far, never below the launch height.
    pub fn max_height(&self) -> f64 {
        self.max_height.max(self.params.initial_height)
    }

    /// Horizontal distance covered once the projectile has stopped.
    ///
    /// Measured from the launch point to the last trace point and clamped at
    /// zero. `None` while in flight or when nothing was recorded.
    pub fn range(&self) -> Option<f64> {
        if self.clock.is_running() {
            return None;
        }
        self.trace.last().map(|impact| (impact.x - LAUNCH_X).max(0.0))
    }

    /// Closed-form range `v² sin 2θ / g` for a launch from ground level.
    pub fn analytic_range(&self) -> f64 {
        let angle = self.params.launch_angle_degrees.to_radians();
        self.params.speed * self.params.speed * (2.0 * angle).sin() / self.gravity
    }

    #[allow(clippy::float_cmp)]
    fn has_landed(&self) -> bool {
        if self.pos.y > 0.0 {
            return false;
        }
        let height = self.params.initial_height;
        if height > 0.0 {
            return true;
        }
        // Launched from the ground itself: it has to get clear first.
        self.clock.is_running() && height == 0.0 && self.clock.elapsed() > GROUND_LAUNCH_GRACE
    }

    fn land(&mut self) {
        self.pos.y = 0.0;
        self.vel = Vector::zero();
        self.clock.stop();
        self.trace.replace_last(self.pos);
        info!(
            x = self.pos.x,
            flight_time = self.clock.elapsed(),
            max_height = self.max_height(),
            "Projectile landed"
        );
    }
}

impl Simulation for Projectile {
    type Params = ProjectileParams;
    type Snapshot = ProjectileSnapshot;

    fn reset(&mut self, params: ProjectileParams) {
        self.params = params;
        self.pos = Point::new(LAUNCH_X, params.initial_height);
        self.vel = params.launch_velocity();
        self.max_height = params.initial_height;
        self.clock.reset();
        self.trace.clear();
        debug!(
            speed = params.speed,
            angle_degrees = params.launch_angle_degrees,
            height = params.initial_height,
            "Projectile reset"
        );
    }

    fn start(&mut self) -> Result<()> {
        self.reset(self.params);
        if let Err(err) = self.params.validate() {
            warn!(error = %err, "Projectile not launched");
            return Err(err);
        }
        self.clock.start();
        self.trace.push(self.pos);
        debug!("Projectile launched");
        Ok(())
    }

    fn step(&mut self, dt: f64) {
        if !self.clock.is_running() {
            return;
        }
        self.vel.y -= self.gravity * dt;
        self.pos += self.vel * dt;
        self.trace.push(self.pos);
        self.max_height = self.max_height.max(self.pos.y);
        self.clock.advance(dt);

        if self.has_landed() {
            self.land();
        }
    }

    fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            position: self.pos,
            velocity: self.vel,
            max_height: self.max_height(),
            range: self.range(),
            elapsed: self.clock.elapsed(),
            running: self.clock.is_running(),
        }
    }

    fn params(&self) -> &ProjectileParams {
        &self.params
    }

    fn clock(&self) -> &SimulationClock {
        &self.clock
    }
}
