//! Readouts and machine-readable output.
//!
//! The engine works in radians. Everything a person reads is converted to
//! degrees and deg/s here.

use std::io::{self, Write};

use mechanics::chaos::Separation;
use mechanics::{
    AngularState, DoublePendulum, Point, Projectile, Simulation, SimplePendulum, TrajectoryTrace,
};
use serde::Serialize;

/// A simulation the CLI knows how to present.
pub trait Report: Simulation {
    /// Short label used in headers and logs.
    const NAME: &'static str;

    /// One-line human-readable readout of the current state.
    fn readout(&self) -> String;

    /// Position a renderer would draw for the current frame.
    fn marker(&self) -> Point;

    /// Trace kept by the engine itself, if it keeps one.
    fn trace(&self) -> Option<&TrajectoryTrace> {
        None
    }
}

fn arm_text(index: u8, state: &AngularState) -> String {
    format!(
        "θ{index}={:8.3}°  ω{index}={:9.3}°/s  α{index}={:10.3}°/s²",
        state.angle.to_degrees(),
        state.angular_velocity.to_degrees(),
        state.angular_acceleration.to_degrees(),
    )
}

impl Report for SimplePendulum {
    const NAME: &'static str = "simple";

    fn readout(&self) -> String {
        let s = self.snapshot();
        format!(
            "t={:7.3} s  θ={:8.3}°  ω={:9.3}°/s  α={:10.3}°/s²  max={:7.3}°  PE={:.4} J  KE={:.4} J  E={:.4} J",
            s.elapsed,
            s.arm.angle.to_degrees(),
            s.arm.angular_velocity.to_degrees(),
            s.arm.angular_acceleration.to_degrees(),
            s.max_amplitude.to_degrees(),
            s.potential_energy,
            s.kinetic_energy,
            s.total_energy,
        )
    }

    fn marker(&self) -> Point {
        self.bob()
    }
}

impl Report for DoublePendulum {
    const NAME: &'static str = "double";

    fn readout(&self) -> String {
        let s = self.snapshot();
        format!(
            "t={:7.3} s  {}  {}  E={:.4} J",
            s.elapsed,
            arm_text(1, &s.upper),
            arm_text(2, &s.lower),
            s.total_energy,
        )
    }

    fn marker(&self) -> Point {
        self.lower_bob()
    }

    fn trace(&self) -> Option<&TrajectoryTrace> {
        Some(DoublePendulum::trace(self))
    }
}

impl Report for Projectile {
    const NAME: &'static str = "projectile";

    fn readout(&self) -> String {
        let s = self.snapshot();
        let range = s
            .range
            .map_or_else(|| "in flight".to_string(), |r| format!("{r:.3} m"));
        format!(
            "t={:7.3} s  x={:8.3} m  y={:8.3} m  v=({:.3}, {:.3}) m/s  max height={:.3} m  range={range}",
            s.elapsed, s.position.x, s.position.y, s.velocity.x, s.velocity.y, s.max_height,
        )
    }

    fn marker(&self) -> Point {
        self.position()
    }

    fn trace(&self) -> Option<&TrajectoryTrace> {
        Some(Projectile::trace(self))
    }
}

/// Final state of a run, as written for `--format json`.
#[derive(Debug, Serialize)]
pub struct RunReport<'a, T: Serialize> {
    /// Which simulation ran.
    pub simulation: &'static str,
    /// Frame rate the run was driven at.
    pub fps: u32,
    /// Frames actually driven.
    pub frames: u64,
    /// State after the last frame.
    pub snapshot: T,
    /// Engine trace, or the frame history when the engine keeps none.
    pub trace: &'a TrajectoryTrace,
}

/// Writes a report as pretty JSON followed by a newline.
///
/// # Errors
///
/// Returns any error from serialization or the writer.
pub fn write_json<W: Write, T: Serialize>(out: &mut W, report: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)
}

/// Writes trace points as `x,y` rows under a header.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_csv<'a, W: Write>(
    out: &mut W,
    points: impl IntoIterator<Item = &'a Point>,
) -> io::Result<()> {
    writeln!(out, "x,y")?;
    for point in points {
        writeln!(out, "{},{}", point.x, point.y)?;
    }
    Ok(())
}

/// One row of a chaos experiment.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ChaosRow {
    /// Instance number, counting from 1.
    pub instance: usize,
    /// How that instance separated from the unperturbed run.
    #[serde(flatten)]
    pub separation: Separation,
}

/// Writes a chaos experiment as an aligned table.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_chaos_table<W: Write>(out: &mut W, rows: &[ChaosRow]) -> io::Result<()> {
    writeln!(
        out,
        "{:>8}  {:>12}  {:>14}  {:>14}  {:>14}",
        "instance", "nudge (rad)", "diverged at", "max sep (m)", "final sep (m)"
    )?;
    for row in rows {
        let s = &row.separation;
        let diverged = s
            .divergence_time
            .map_or_else(|| "never".to_string(), |t| format!("{t:.3} s"));
        writeln!(
            out,
            "{:>8}  {:>12.3e}  {:>14}  {:>14.6}  {:>14.6}",
            row.instance, s.perturbation_radians, diverged, s.max_separation, s.final_separation
        )?;
    }
    Ok(())
}

/// Writes a chaos experiment as CSV rows.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_chaos_csv<W: Write>(out: &mut W, rows: &[ChaosRow]) -> io::Result<()> {
    writeln!(
        out,
        "instance,perturbation,divergence_time,max_separation,final_separation"
    )?;
    for row in rows {
        let s = &row.separation;
        let time = s.divergence_time.map(|t| t.to_string()).unwrap_or_default();
        writeln!(
            out,
            "{},{},{},{},{}",
            row.instance, s.perturbation_radians, time, s.max_separation, s.final_separation
        )?;
    }
    Ok(())
}
