//! Fixed-step driving of a [`Simulation`].
//!
//! Frames arrive with whatever duration the caller measured. The driver
//! banks that time and steps the simulation in whole `dt` increments, so the
//! physics timestep never depends on the frame rate. A frame that arrives very
//! late (a stalled terminal, a suspended process) would otherwise trigger a
//! burst of catch-up steps. The per-frame cap drops that backlog instead.

use std::thread;
use std::time::{Duration, Instant};

use mechanics::Simulation;
use tracing::{debug, trace};

/// Default limit on steps taken for a single frame.
pub const DEFAULT_MAX_STEPS_PER_FRAME: u32 = 8;

/// Accumulates frame time and steps a simulation at a fixed `dt`.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedStepDriver {
    dt: f64,
    accumulator: f64,
    max_steps_per_frame: u32,
    total_steps: u64,
    dropped: f64,
}

impl FixedStepDriver {
    /// Creates a driver stepping by `dt` seconds.
    #[must_use]
    pub const fn new(dt: f64) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps_per_frame: DEFAULT_MAX_STEPS_PER_FRAME,
            total_steps: 0,
            dropped: 0.0,
        }
    }

    /// Sets the per-frame step cap. A cap of zero is raised to one.
    #[must_use]
    pub fn with_max_steps_per_frame(mut self, max: u32) -> Self {
        self.max_steps_per_frame = max.max(1);
        self
    }

    /// The fixed timestep in seconds.
    #[must_use]
    pub const fn dt(&self) -> f64 {
        self.dt
    }

    /// Banked time not yet stepped, always below `dt` after a frame.
    #[must_use]
    pub const fn pending(&self) -> f64 {
        self.accumulator
    }

    /// Steps taken since creation or the last [`clear`](Self::clear).
    #[must_use]
    pub const fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Frame time discarded by the step cap, in seconds.
    #[must_use]
    pub const fn dropped(&self) -> f64 {
        self.dropped
    }

    /// Forgets banked time and counters.
    pub fn clear(&mut self) {
        self.accumulator = 0.0;
        self.total_steps = 0;
        self.dropped = 0.0;
    }

    /// Banks `frame_time` seconds and steps `sim` as many whole `dt` as fit,
    /// up to the cap. Returns the number of steps taken.
    ///
    /// Nothing is banked while the simulation is stopped.
    pub fn advance<S: Simulation>(&mut self, sim: &mut S, frame_time: f64) -> u32 {
        if !sim.is_running() {
            self.accumulator = 0.0;
            return 0;
        }
        self.accumulator += frame_time.max(0.0);

        let mut steps = 0;
        while self.accumulator >= self.dt && steps < self.max_steps_per_frame {
            sim.step(self.dt);
            self.accumulator -= self.dt;
            steps += 1;
        }
        self.total_steps += u64::from(steps);

        if self.accumulator >= self.dt {
            let backlog = self.accumulator - self.accumulator % self.dt;
            debug!(backlog, cap = self.max_steps_per_frame, "Dropping frame backlog");
            self.dropped += backlog;
            self.accumulator -= backlog;
        }
        trace!(steps, pending = self.accumulator, "Frame advanced");
        steps
    }
}

/// Wall-clock frame pacing for live runs.
#[derive(Debug)]
pub struct FramePacer {
    frame_duration: Duration,
    last: Instant,
}

impl FramePacer {
    /// Paces frames at `fps` per second, clamped to at least one.
    #[must_use]
    pub fn new(fps: u32) -> Self {
        Self {
            frame_duration: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            last: Instant::now(),
        }
    }

    /// Target duration of one frame.
    #[must_use]
    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Sleeps until the next frame is due and returns the wall time that
    /// passed since the previous call, in seconds.
    pub fn wait(&mut self) -> f64 {
        let due = self.last + self.frame_duration;
        let now = Instant::now();
        if due > now {
            thread::sleep(due - now);
        }
        let now = Instant::now();
        let elapsed = now.duration_since(self.last).as_secs_f64();
        self.last = now;
        elapsed
    }
}
