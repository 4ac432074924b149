//! Double pendulum: two point masses on massless rigid rods.
//!
//! The angular accelerations come from the standard Lagrangian equations of
//! motion:
//!
//! ```text
//! δ   = θ1 − θ2
//! den = 2 M1 + M2 − M2 cos 2δ
//!
//! α1 = [−g (2 M1 + M2) sin θ1 − M2 g sin(θ1 − 2 θ2)
//!       − 2 M2 sin δ (ω2² L2 + ω1² L1 cos δ)] / (L1 den)
//!
//! α2 = [2 sin δ (ω1² L1 (M1 + M2) + g (M1 + M2) cos θ1
//!       + ω2² L2 M2 cos δ)] / (L2 den)
//! ```
//!
//! Both arms are then advanced with semi-implicit Euler, velocity before
//! angle. The system is chaotic: runs started a millionth of a radian apart
//! end up in unrelated places, while identical runs stay bit-identical.

use tracing::{debug, trace, warn};

use crate::error::{check_finite, check_length, check_mass};
use crate::simulation::{AngularState, Simulation, GRAVITY};
use crate::{Arm, Point, Result, SimulationClock, TrajectoryTrace, Vector};

/// Substituted for the shared denominator when it cancels to exactly zero.
///
/// This is a crude guard, not a physical resolution of the singularity: the
/// step that hits it sees a large but finite acceleration.
pub const DENOMINATOR_EPSILON: f64 = 1e-9;

/// Number of lower-bob positions kept in the trace.
pub const TRACE_CAPACITY: usize = 2000;

/// Length and mass of one arm.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmParams {
    /// Rod length in metres.
    pub length: f64,
    /// Bob mass in kilograms.
    pub mass: f64,
}

impl ArmParams {
    /// Creates arm parameters from length (m) and mass (kg).
    #[inline]
    pub const fn new(length: f64, mass: f64) -> Self {
        Self { length, mass }
    }

    fn validate(&self, arm: Arm) -> Result<()> {
        check_length(arm, self.length)?;
        check_mass(arm, self.mass)
    }
}

/// Parameters for a [`DoublePendulum`] run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DoublePendulumParams {
    /// Arm attached to the pivot.
    pub upper: ArmParams,
    /// Arm hanging from the upper bob.
    pub lower: ArmParams,
    /// Starting angle of the upper arm in degrees.
    pub upper_angle_degrees: f64,
    /// Starting angle of the lower arm in degrees.
    pub lower_angle_degrees: f64,
}

impl DoublePendulumParams {
    /// Creates parameters for both arms and their starting angles (degrees).
    #[inline]
    pub const fn new(
        upper: ArmParams,
        lower: ArmParams,
        upper_angle_degrees: f64,
        lower_angle_degrees: f64,
    ) -> Self {
        Self {
            upper,
            lower,
            upper_angle_degrees,
            lower_angle_degrees,
        }
    }

    /// Checks that both lengths and both masses are positive.
    ///
    /// # Errors
    ///
    /// Returns the first failing condition: upper length, upper mass, lower
    /// length, lower mass, then the two angles. Angles may take any finite
    /// value.
    pub fn validate(&self) -> Result<()> {
        self.upper.validate(Arm::Upper)?;
        self.lower.validate(Arm::Lower)?;
        check_finite("upper angle", self.upper_angle_degrees)?;
        check_finite("lower angle", self.lower_angle_degrees)
    }
}

impl Default for DoublePendulumParams {
    fn default() -> Self {
        Self::new(ArmParams::new(2.0, 1.0), ArmParams::new(2.0, 1.0), 90.0, 0.0)
    }
}

/// Computes `(α1, α2)` for the given arm states.
///
/// This is the pure right-hand side of the equations of motion. It never
/// fails: when the shared denominator is exactly zero it is replaced by
/// [`DENOMINATOR_EPSILON`], and parameters that `start` would refuse are
/// evaluated as given.
///
/// # Example
///
/// ```rust
/// use mechanics::{angular_accelerations, AngularState, ArmParams, GRAVITY};
///
/// // Hanging straight down at rest: nothing moves.
/// let rest = AngularState::default();
/// let arm = ArmParams::new(1.0, 1.0);
/// let (a1, a2) = angular_accelerations(&rest, &rest, &arm, &arm, GRAVITY);
/// assert_eq!((a1, a2), (0.0, 0.0));
/// ```
#[allow(clippy::float_cmp)]
pub fn angular_accelerations(
    upper: &AngularState,
    lower: &AngularState,
    upper_arm: &ArmParams,
    lower_arm: &ArmParams,
    gravity: f64,
) -> (f64, f64) {
    let (t1, w1) = (upper.angle, upper.angular_velocity);
    let (t2, w2) = (lower.angle, lower.angular_velocity);
    let (l1, m1) = (upper_arm.length, upper_arm.mass);
    let (l2, m2) = (lower_arm.length, lower_arm.mass);
    let g = gravity;

    let delta = t1 - t2;
    let sum_mass = m1 + m2;

    let mut den = 2.0 * m1 + m2 - m2 * (2.0 * delta).cos();
    if den == 0.0 {
        trace!(delta, "Double pendulum denominator cancelled, substituting epsilon");
        den = DENOMINATOR_EPSILON;
    }

    let num1 = -g * (2.0 * m1 + m2) * t1.sin()
        - m2 * g * (t1 - 2.0 * t2).sin()
        - 2.0 * m2 * delta.sin() * (w2 * w2 * l2 + w1 * w1 * l1 * delta.cos());
    let alpha1 = num1 / (l1 * den);

    let num2 = 2.0
        * delta.sin()
        * (w1 * w1 * l1 * sum_mass + g * sum_mass * t1.cos() + w2 * w2 * l2 * m2 * delta.cos());
    let alpha2 = num2 / (l2 * den);

    (alpha1, alpha2)
}

/// Read-only view of a [`DoublePendulum`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DoublePendulumSnapshot {
    /// Upper arm state.
    pub upper: AngularState,
    /// Lower arm state.
    pub lower: AngularState,
    /// Upper bob position in metres, y growing downward.
    pub upper_bob: Point,
    /// Lower bob position in metres, offset from the upper bob.
    pub lower_bob: Point,
    /// Mechanical energy in joules, zero with both bobs level with the pivot.
    pub total_energy: f64,
    /// Elapsed simulated time in seconds.
    pub elapsed: f64,
    /// Whether the pendulum is being integrated.
    pub running: bool,
}

/// Two pendulums chained end to end.
#[derive(Debug, Clone, PartialEq)]
pub struct DoublePendulum {
    params: DoublePendulumParams,
    gravity: f64,
    pivot: Point,
    upper: AngularState,
    lower: AngularState,
    clock: SimulationClock,
    trace: TrajectoryTrace,
}

impl DoublePendulum {
    /// Creates a stopped double pendulum reset to `params`, with the pivot
    /// at the origin and standard gravity.
    pub fn new(params: DoublePendulumParams) -> Self {
        let mut pendulum = Self {
            params,
            gravity: GRAVITY,
            pivot: Point::origin(),
            upper: AngularState::default(),
            lower: AngularState::default(),
            clock: SimulationClock::new(),
            trace: TrajectoryTrace::new(TRACE_CAPACITY),
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

    /// Upper arm state.
    #[inline]
    pub const fn upper(&self) -> AngularState {
        self.upper
    }

    /// Lower arm state.
    #[inline]
    pub const fn lower(&self) -> AngularState {
        self.lower
    }

    /// Upper bob position, one arm length from the pivot.
    pub fn upper_bob(&self) -> Point {
        self.pivot + Vector::from_arm(self.params.upper.length, self.upper.angle)
    }

    /// Lower bob position: the upper bob plus an offset set by the lower
    /// arm's own angle.
    pub fn lower_bob(&self) -> Point {
        self.upper_bob() + Vector::from_arm(self.params.lower.length, self.lower.angle)
    }

    /// Recent lower-bob positions, oldest first.
    #[inline]
    pub const fn trace(&self) -> &TrajectoryTrace {
        &self.trace
    }

    /// Kinetic plus potential energy of the two point masses.
    ///
    /// Heights are measured downward in the pendulum frame, so the potential
    /// term is `−g Σ mᵢ yᵢ` relative to the pivot.
    pub fn total_energy(&self) -> f64 {
        let ArmParams { length: l1, mass: m1 } = self.params.upper;
        let ArmParams { length: l2, mass: m2 } = self.params.lower;
        let (t1, w1) = (self.upper.angle, self.upper.angular_velocity);
        let (t2, w2) = (self.lower.angle, self.lower.angular_velocity);

        let kinetic = 0.5 * m1 * (l1 * w1).powi(2)
            + 0.5
                * m2
                * ((l1 * w1).powi(2)
                    + (l2 * w2).powi(2)
                    + 2.0 * l1 * l2 * w1 * w2 * (t1 - t2).cos());
        let potential = -(m1 + m2) * self.gravity * l1 * t1.cos() - m2 * self.gravity * l2 * t2.cos();
        kinetic + potential
    }
}

impl Simulation for DoublePendulum {
    type Params = DoublePendulumParams;
    type Snapshot = DoublePendulumSnapshot;

    fn reset(&mut self, params: DoublePendulumParams) {
        self.params = params;
        self.upper = AngularState::at_rest(params.upper_angle_degrees);
        self.lower = AngularState::at_rest(params.lower_angle_degrees);
        self.clock.reset();
        self.trace.clear();
        debug!(
            l1 = params.upper.length,
            m1 = params.upper.mass,
            theta1_degrees = params.upper_angle_degrees,
            l2 = params.lower.length,
            m2 = params.lower.mass,
            theta2_degrees = params.lower_angle_degrees,
            "Double pendulum reset"
        );
    }

    fn start(&mut self) -> Result<()> {
        self.reset(self.params);
        if let Err(err) = self.params.validate() {
            warn!(error = %err, "Double pendulum not started");
            return Err(err);
        }
        self.clock.start();
        debug!("Double pendulum started");
        Ok(())
    }

    fn step(&mut self, dt: f64) {
        if !self.clock.is_running() {
            return;
        }
        let (alpha1, alpha2) = angular_accelerations(
            &self.upper,
            &self.lower,
            &self.params.upper,
            &self.params.lower,
            self.gravity,
        );
        self.upper.integrate(alpha1, dt);
        self.lower.integrate(alpha2, dt);
        self.clock.advance(dt);
        self.trace.push(self.lower_bob());
    }

    fn snapshot(&self) -> DoublePendulumSnapshot {
        DoublePendulumSnapshot {
            upper: self.upper,
            lower: self.lower,
            upper_bob: self.upper_bob(),
            lower_bob: self.lower_bob(),
            total_energy: self.total_energy(),
            elapsed: self.clock.elapsed(),
            running: self.clock.is_running(),
        }
    }

    fn params(&self) -> &DoublePendulumParams {
        &self.params
    }

    fn clock(&self) -> &SimulationClock {
        &self.clock
    }
}
