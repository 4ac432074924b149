//! Parallel sensitivity experiments on the double pendulum.
//!
//! Instance `k` (counting from 1) nudges the upper angle by `k` times the
//! configured perturbation. Every instance owns its pair of pendulums, so the
//! runs are spread over the rayon pool without sharing anything.

use std::io::Write;

use anyhow::Context;
use mechanics::chaos::{separation_run, SeparationConfig};
use mechanics::DoublePendulumParams;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::OutputFormat;
use crate::config::{ChaosSettings, RunConfig};
use crate::output::{write_chaos_csv, write_chaos_table, write_json, ChaosRow};

/// A whole chaos experiment, as written for `--format json`.
#[derive(Debug, Serialize)]
pub struct ChaosReport<'a> {
    /// Pendulum every instance starts from, before its nudge.
    pub params: &'a DoublePendulumParams,
    /// Nudge size, instance count and divergence tolerance.
    pub settings: &'a ChaosSettings,
    /// Timestep in seconds.
    pub dt: f64,
    /// Steps each instance was run for.
    pub steps: usize,
    /// One row per instance, in instance order.
    pub rows: &'a [ChaosRow],
}

/// Runs every instance of the experiment in parallel.
///
/// Rows come back in instance order.
///
/// # Errors
///
/// Returns the validation error if `params` cannot be started.
#[expect(clippy::cast_precision_loss, reason = "instance counts are small")]
pub fn experiment(
    params: &DoublePendulumParams,
    settings: &ChaosSettings,
    run: &RunConfig,
) -> mechanics::Result<Vec<ChaosRow>> {
    let steps = usize::try_from(run.frames()).unwrap_or(usize::MAX);
    (1..=settings.instances)
        .into_par_iter()
        .map(|instance| {
            let config = SeparationConfig::new(run.dt(), steps)
                .with_perturbation_radians(settings.perturbation * instance as f64)
                .with_tolerance_fraction(settings.tolerance);
            separation_run(params, &config).map(|separation| {
                debug!(instance, diverged = separation.diverged(), "Chaos instance finished");
                ChaosRow {
                    instance,
                    separation,
                }
            })
        })
        .collect()
}

/// Runs the experiment and writes it in the configured format.
///
/// # Errors
///
/// Fails if the pendulum parameters are invalid or `out` cannot be written.
pub fn report<W: Write>(
    params: &DoublePendulumParams,
    settings: &ChaosSettings,
    run: &RunConfig,
    out: &mut W,
) -> anyhow::Result<()> {
    if run.realtime {
        debug!("Chaos experiments ignore --realtime");
    }
    let rows = experiment(params, settings, run)
        .context("cannot start the chaos experiment")?;
    let diverged = rows.iter().filter(|row| row.separation.diverged()).count();
    info!(instances = rows.len(), diverged, "Chaos experiment finished");

    match run.format {
        OutputFormat::Text => {
            write_chaos_table(out, &rows)?;
            writeln!(
                out,
                "{diverged} of {} instances diverged within {:.3} s",
                rows.len(),
                run.duration
            )?;
        }
        OutputFormat::Json => write_json(
            out,
            &ChaosReport {
                params,
                settings,
                dt: run.dt(),
                steps: usize::try_from(run.frames()).unwrap_or(usize::MAX),
                rows: &rows,
            },
        )?,
        OutputFormat::Csv => write_chaos_csv(out, &rows)?,
    }
    Ok(())
}
