//! Runs a configured scenario and writes its output.

use std::io::Write;

use anyhow::Context;
use mechanics::{DoublePendulum, Projectile, SimplePendulum, TrajectoryTrace};
use serde::Serialize;
use tracing::{debug, info};

use crate::chaos;
use crate::cli::OutputFormat;
use crate::config::{Config, RunConfig, Scenario};
use crate::driver::{FixedStepDriver, FramePacer};
use crate::output::{write_csv, write_json, Report, RunReport};

/// Frame positions kept for simulations without an engine trace.
pub const HISTORY_CAPACITY: usize = 1000;

/// What a driven run did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Frames driven.
    pub frames: u64,
    /// Integration steps taken.
    pub steps: u64,
    /// Frame time discarded by the step cap, in seconds.
    pub dropped: f64,
    /// Marker position at the start and after every frame.
    pub history: TrajectoryTrace,
}

/// Runs the scenario in `config`, writing results to `out`.
///
/// # Errors
///
/// Fails if the simulation rejects its parameters or `out` cannot be written.
pub fn run<W: Write>(config: &Config, out: &mut W) -> anyhow::Result<()> {
    match config.scenario {
        Scenario::Simple(params) => present(SimplePendulum::new(params), &config.run, out),
        Scenario::Double(params) => present(DoublePendulum::new(params), &config.run, out),
        Scenario::Projectile(params) => present(Projectile::new(params), &config.run, out),
        Scenario::Chaos { params, settings } => {
            chaos::report(&params, &settings, &config.run, out)
        }
    }
}

/// Starts `sim` and drives it for the configured number of frames, or until
/// it stops by itself.
///
/// Live runs are paced against the wall clock. With text output they also
/// write one readout line per frame to `out`.
///
/// # Errors
///
/// Fails if the simulation rejects its parameters or a live line cannot be
/// written.
pub fn drive<S: Report, W: Write>(
    sim: &mut S,
    run: &RunConfig,
    out: &mut W,
) -> anyhow::Result<RunSummary> {
    sim.start()
        .with_context(|| format!("cannot start the {} simulation", S::NAME))?;
    info!(
        simulation = S::NAME,
        fps = run.fps,
        duration = run.duration,
        realtime = run.realtime,
        "Simulation started"
    );

    let mut driver = FixedStepDriver::new(run.dt());
    let mut pacer = run.realtime.then(|| FramePacer::new(run.fps));
    let live = run.realtime && run.format == OutputFormat::Text;
    let mut history = TrajectoryTrace::new(HISTORY_CAPACITY);
    history.push(sim.marker());

    let total = run.frames();
    let mut frames = 0;
    while frames < total && sim.is_running() {
        let frame_time = pacer.as_mut().map_or_else(|| run.dt(), FramePacer::wait);
        driver.advance(sim, frame_time);
        frames += 1;
        history.push(sim.marker());
        if live {
            writeln!(out, "{}", sim.readout())?;
            out.flush()?;
        }
    }

    if !sim.is_running() {
        debug!(simulation = S::NAME, frames, "Simulation stopped by itself");
    }
    info!(
        simulation = S::NAME,
        frames,
        steps = driver.total_steps(),
        dropped = driver.dropped(),
        elapsed = sim.elapsed(),
        "Run finished"
    );

    Ok(RunSummary {
        frames,
        steps: driver.total_steps(),
        dropped: driver.dropped(),
        history,
    })
}

fn present<S, W>(mut sim: S, run: &RunConfig, out: &mut W) -> anyhow::Result<()>
where
    S: Report,
    S::Snapshot: Serialize,
    W: Write,
{
    let summary = drive(&mut sim, run, out)?;
    let trace = Report::trace(&sim).unwrap_or(&summary.history);

    match run.format {
        OutputFormat::Text => {
            writeln!(out, "{}", sim.readout())?;
            writeln!(
                out,
                "{}: {} frames at {} fps, {} steps, {} trace points",
                S::NAME,
                summary.frames,
                run.fps,
                summary.steps,
                trace.len()
            )?;
        }
        OutputFormat::Json => write_json(
            out,
            &RunReport {
                simulation: S::NAME,
                fps: run.fps,
                frames: summary.frames,
                snapshot: sim.snapshot(),
                trace,
            },
        )?,
        OutputFormat::Csv => write_csv(out, trace)?,
    }
    Ok(())
}
