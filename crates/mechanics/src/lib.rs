#![forbid(unsafe_code)]
// Allow these clippy lints for physics/math code readability
#![allow(clippy::must_use_candidate)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::use_self)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]

//! # Mechanics
//!
//! Fixed-step integrators for three classical-mechanics systems.
//!
//! Mechanics provides:
//! - **SimplePendulum**: an undamped pendulum with energy bookkeeping
//! - **DoublePendulum**: the coupled, chaotic two-arm pendulum
//! - **Projectile**: a drag-free launch that stops on ground impact
//!
//! Every system follows the same life cycle through the [`Simulation`] trait:
//! `reset` stores parameters, `start` validates them and begins the run, and
//! `step` advances the state by one fixed timestep. All quantities are in
//! physical units (metres, kilograms, seconds, radians). Converting them to
//! screen space is left to whatever draws them.
//!
//! ## Double Pendulum Example
//!
//! ```rust
//! use mechanics::{fps, DoublePendulum, DoublePendulumParams, Simulation};
//!
//! let mut pendulum = DoublePendulum::new(DoublePendulumParams::default());
//! pendulum.start().expect("default parameters are valid");
//!
//! // Simulate 2 seconds at 60 FPS
//! for _ in 0..120 {
//!     pendulum.step(fps(60));
//! }
//!
//! let snapshot = pendulum.snapshot();
//! assert!(snapshot.lower_bob.x.is_finite());
//! assert_eq!(pendulum.trace().len(), 120);
//! ```
//!
//! ## Projectile Example
//!
//! ```rust
//! use mechanics::{fps, Projectile, ProjectileParams, Simulation};
//!
//! let mut ball = Projectile::new(ProjectileParams::new(10.0, 45.0, 0.0));
//! ball.start().unwrap();
//!
//! while ball.is_running() {
//!     ball.step(fps(60));
//! }
//!
//! let range = ball.snapshot().range.unwrap();
//! assert!((range - 10.19).abs() < 0.2);
//! ```
//!
//! ## Integration Scheme
//!
//! All three systems use semi-implicit Euler: velocity is updated first and the
//! new velocity moves the position. The scheme is not energy conserving, and
//! the drift it produces is part of the observable behavior.

mod clock;
mod error;
mod geometry;
mod simulation;
mod trace;

pub mod chaos;
pub mod double;
pub mod projectile;
pub mod simple;

pub use clock::SimulationClock;
pub use double::{
    angular_accelerations, ArmParams, DoublePendulum, DoublePendulumParams,
    DoublePendulumSnapshot, DENOMINATOR_EPSILON,
};
pub use error::{Arm, Result, ValidationError};
pub use geometry::{Point, Vector};
pub use projectile::{Projectile, ProjectileParams, ProjectileSnapshot, LAUNCH_X};
pub use simple::{SimplePendulum, SimplePendulumParams, SimplePendulumSnapshot, MAX_START_ANGLE_DEGREES};
pub use simulation::{fps, AngularState, Simulation, GRAVITY};
pub use trace::TrajectoryTrace;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::double::{ArmParams, DoublePendulum, DoublePendulumParams};
    pub use crate::projectile::{Projectile, ProjectileParams};
    pub use crate::simple::{SimplePendulum, SimplePendulumParams};
    pub use crate::simulation::{fps, Simulation, GRAVITY};
    pub use crate::{Point, TrajectoryTrace, ValidationError, Vector};
}
