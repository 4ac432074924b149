//! Sensitivity experiments on the double pendulum.
//!
//! A separation run integrates a base pendulum and a copy whose upper angle
//! is nudged by a tiny amount, side by side with the same timestep, and
//! watches the distance between their lower bobs. Divergence is the expected
//! outcome, not a sign of nondeterminism: two runs from identical inputs
//! never separate at all.
//!
//! # Example
//!
//! ```rust
//! use mechanics::chaos::{separation_run, SeparationConfig};
//! use mechanics::{fps, DoublePendulumParams};
//!
//! let config = SeparationConfig::new(fps(60), 600).with_perturbation_radians(0.0);
//! let run = separation_run(&DoublePendulumParams::default(), &config).unwrap();
//!
//! assert_eq!(run.max_separation, 0.0);
//! assert_eq!(run.divergence_time, None);
//! ```

use tracing::debug;

use crate::double::DoublePendulum;
use crate::simulation::Simulation;
use crate::{DoublePendulumParams, Result};

/// Settings for a [`separation_run`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeparationConfig {
    /// Timestep in seconds.
    pub dt: f64,
    /// Maximum number of steps to take.
    pub max_steps: usize,
    /// Offset added to the perturbed copy's upper angle, in radians.
    pub perturbation_radians: f64,
    /// Separation counted as divergence, as a fraction of the lower arm length.
    pub tolerance_fraction: f64,
}

impl SeparationConfig {
    /// A run of `max_steps` steps of `dt` seconds with a `1e-6` rad nudge
    /// and a 1% tolerance.
    pub const fn new(dt: f64, max_steps: usize) -> Self {
        Self {
            dt,
            max_steps,
            perturbation_radians: 1e-6,
            tolerance_fraction: 0.01,
        }
    }

    /// Sets the nudge applied to the upper angle.
    pub const fn with_perturbation_radians(mut self, radians: f64) -> Self {
        self.perturbation_radians = radians;
        self
    }

    /// Sets the divergence threshold as a fraction of the lower arm length.
    pub const fn with_tolerance_fraction(mut self, fraction: f64) -> Self {
        self.tolerance_fraction = fraction;
        self
    }
}

/// Outcome of a [`separation_run`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Separation {
    /// Nudge that was applied, in radians.
    pub perturbation_radians: f64,
    /// Distance counted as divergence, in metres.
    pub tolerance: f64,
    /// Simulated time at which the lower bobs first separated beyond the
    /// tolerance. `None` if they never did.
    pub divergence_time: Option<f64>,
    /// Step index at which divergence was first seen.
    pub divergence_step: Option<usize>,
    /// Largest lower-bob separation observed, in metres.
    pub max_separation: f64,
    /// Separation after the last step, in metres.
    pub final_separation: f64,
    /// Steps actually taken.
    pub steps: usize,
}

impl Separation {
    /// Whether the two runs diverged within the step budget.
    pub const fn diverged(&self) -> bool {
        self.divergence_time.is_some()
    }
}

/// Runs a base and a nudged double pendulum side by side until they
/// separate beyond the tolerance or the step budget runs out.
///
/// The pair keeps stepping until the budget is spent so that
/// `max_separation` and `final_separation` cover the whole run.
///
/// # Errors
///
/// Returns the validation error if `params` cannot be started.
pub fn separation_run(params: &DoublePendulumParams, config: &SeparationConfig) -> Result<Separation> {
    let mut base = DoublePendulum::new(*params);
    let mut nudged_params = *params;
    nudged_params.upper_angle_degrees += config.perturbation_radians.to_degrees();
    let mut nudged = DoublePendulum::new(nudged_params);

    base.start()?;
    nudged.start()?;

    let tolerance = config.tolerance_fraction * params.lower.length;
    let mut divergence_step = None;
    let mut divergence_time = None;
    let mut max_separation: f64 = 0.0;
    let mut separation = 0.0;

    for step in 0..config.max_steps {
        base.step(config.dt);
        nudged.step(config.dt);

        separation = base.lower_bob().distance(nudged.lower_bob());
        max_separation = max_separation.max(separation);
        if divergence_step.is_none() && separation > tolerance {
            divergence_step = Some(step + 1);
            divergence_time = Some(base.elapsed());
        }
    }

    debug!(
        perturbation = config.perturbation_radians,
        ?divergence_time,
        max_separation,
        "Separation run finished"
    );

    Ok(Separation {
        perturbation_radians: config.perturbation_radians,
        tolerance,
        divergence_time,
        divergence_step,
        max_separation,
        final_separation: separation,
        steps: config.max_steps,
    })
}
