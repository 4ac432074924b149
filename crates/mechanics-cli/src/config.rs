//! Runtime configuration for `mechanics`.
//!
//! Settings are resolved in three layers, each overriding the one before:
//!
//! 1. built-in defaults (the parameter types' `Default` impls),
//! 2. an optional TOML file,
//! 3. command-line flags.
//!
//! # Config file
//!
//! ```toml
//! [run]
//! fps = 120
//! duration = 30.0
//! format = "json"
//!
//! [double]
//! length1 = 1.0
//! angle1 = 120.0
//!
//! [projectile]
//! speed = 20.0
//! ```
//!
//! Every key is optional. Unknown keys are rejected so that typos surface.

use std::fs;
use std::path::{Path, PathBuf};

use mechanics::{ArmParams, DoublePendulumParams, ProjectileParams, SimplePendulumParams};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::cli::{ChaosArgs, Cli, Command, DoubleArgs, OutputFormat, ProjectileArgs, SimpleArgs};

/// Default frames per second.
pub const DEFAULT_FPS: u32 = 60;

/// Highest accepted frame rate. Larger requests are clamped.
pub const MAX_FPS: u32 = 10_000;

/// Default simulated run length in seconds.
pub const DEFAULT_DURATION: f64 = 10.0;

/// Default nudge for chaos experiments, in radians.
pub const DEFAULT_PERTURBATION: f64 = 1e-6;

/// Default number of nudged copies in a chaos experiment.
pub const DEFAULT_INSTANCES: usize = 4;

/// Default divergence tolerance, as a fraction of the lower arm length.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("duration must be a finite, non-negative number of seconds, got {0}")]
    InvalidDuration(f64),

    #[error("chaos experiments need at least one instance")]
    NoInstances,

    #[error("config key {key} must be a finite number, got {value}")]
    NonFinite { key: &'static str, value: f64 },
}

// ============================================================================
// File layer
// ============================================================================

/// Contents of a config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub run: RunSection,
    pub simple: SimpleSection,
    pub double: DoubleSection,
    pub projectile: ProjectileSection,
    pub chaos: ChaosSection,
}

/// `[run]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunSection {
    pub fps: Option<u32>,
    pub duration: Option<f64>,
    pub format: Option<OutputFormat>,
    pub realtime: Option<bool>,
}

/// `[simple]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimpleSection {
    pub length: Option<f64>,
    pub mass: Option<f64>,
    pub angle: Option<f64>,
}

/// `[double]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DoubleSection {
    pub length1: Option<f64>,
    pub mass1: Option<f64>,
    pub angle1: Option<f64>,
    pub length2: Option<f64>,
    pub mass2: Option<f64>,
    pub angle2: Option<f64>,
}

/// `[projectile]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectileSection {
    pub speed: Option<f64>,
    pub angle: Option<f64>,
    pub height: Option<f64>,
}

/// `[chaos]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChaosSection {
    pub perturbation: Option<f64>,
    pub instances: Option<usize>,
    pub tolerance: Option<f64>,
}

impl FileConfig {
    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid config TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Parses config TOML from a string.
    ///
    /// # Errors
    ///
    /// Returns the TOML error for malformed input or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Every numeric key in the file, as `section.key`.
    fn numbers(&self) -> [(&'static str, Option<f64>); 15] {
        [
            ("run.duration", self.run.duration),
            ("simple.length", self.simple.length),
            ("simple.mass", self.simple.mass),
            ("simple.angle", self.simple.angle),
            ("double.length1", self.double.length1),
            ("double.mass1", self.double.mass1),
            ("double.angle1", self.double.angle1),
            ("double.length2", self.double.length2),
            ("double.mass2", self.double.mass2),
            ("double.angle2", self.double.angle2),
            ("projectile.speed", self.projectile.speed),
            ("projectile.angle", self.projectile.angle),
            ("projectile.height", self.projectile.height),
            ("chaos.perturbation", self.chaos.perturbation),
            ("chaos.tolerance", self.chaos.tolerance),
        ]
    }

    /// Rejects `nan` and `inf`, which TOML accepts as floats.
    ///
    /// Flags get the same treatment from their value parser.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFinite`] naming the first offending key.
    pub fn check_finite(&self) -> Result<(), ConfigError> {
        for (key, value) in self.numbers() {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                return Err(ConfigError::NonFinite { key, value });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Resolved configuration
// ============================================================================

/// Settings for driving any simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunConfig {
    /// Frames per second. Each frame advances by `1 / fps` seconds.
    pub fps: u32,
    /// Simulated seconds to run for.
    pub duration: f64,
    /// How results are written.
    pub format: OutputFormat,
    /// Pace frames against the wall clock.
    pub realtime: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            duration: DEFAULT_DURATION,
            format: OutputFormat::default(),
            realtime: false,
        }
    }
}

impl RunConfig {
    /// Timestep in seconds.
    #[must_use]
    pub fn dt(&self) -> f64 {
        mechanics::fps(self.fps)
    }

    /// Number of frames needed to cover the duration.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "duration is validated finite and non-negative"
    )]
    pub fn frames(&self) -> u64 {
        (self.duration * f64::from(self.fps)).round() as u64
    }
}

/// Settings for a chaos experiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChaosSettings {
    /// Nudge applied to the first instance, in radians. Instance `k` gets
    /// `k` times this.
    pub perturbation: f64,
    /// Number of nudged runs.
    pub instances: usize,
    /// Divergence threshold as a fraction of the lower arm length.
    pub tolerance: f64,
}

impl Default for ChaosSettings {
    fn default() -> Self {
        Self {
            perturbation: DEFAULT_PERTURBATION,
            instances: DEFAULT_INSTANCES,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// The simulation selected on the command line, with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scenario {
    Simple(SimplePendulumParams),
    Double(DoublePendulumParams),
    Projectile(ProjectileParams),
    Chaos {
        params: DoublePendulumParams,
        settings: ChaosSettings,
    },
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// How to drive and report the run.
    pub run: RunConfig,
    /// What to simulate.
    pub scenario: Scenario,
    /// Log verbosity level (0=warn, 1=info, 2=debug, 3+=trace).
    pub verbosity: u8,
}

impl Config {
    /// Create config from CLI arguments, reading the config file if one was
    /// given.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be loaded or the run
    /// settings are unusable. Physical parameters are only checked for
    /// finiteness here. Their ranges are checked when a simulation starts.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(cli, &file)
    }

    /// Merges CLI flags over a parsed config file over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFinite`] if the file holds `nan` or `inf`,
    /// and [`ConfigError::InvalidDuration`] or [`ConfigError::NoInstances`]
    /// for unusable run settings.
    pub fn resolve(cli: &Cli, file: &FileConfig) -> Result<Self, ConfigError> {
        file.check_finite()?;
        let defaults = RunConfig::default();
        let run = RunConfig {
            fps: cli
                .fps
                .or(file.run.fps)
                .unwrap_or(defaults.fps)
                .clamp(1, MAX_FPS),
            duration: cli.duration.or(file.run.duration).unwrap_or(defaults.duration),
            format: cli.format.or(file.run.format).unwrap_or(defaults.format),
            realtime: cli.realtime || file.run.realtime.unwrap_or(defaults.realtime),
        };
        if !run.duration.is_finite() || run.duration < 0.0 {
            return Err(ConfigError::InvalidDuration(run.duration));
        }

        let scenario = match &cli.command {
            Command::Simple(args) => Scenario::Simple(simple_params(args, &file.simple)),
            Command::Double(args) => Scenario::Double(double_params(args, &file.double)),
            Command::Projectile(args) => {
                Scenario::Projectile(projectile_params(args, &file.projectile))
            }
            Command::Chaos(args) => Scenario::Chaos {
                params: double_params(&args.pendulum, &file.double),
                settings: chaos_settings(args, &file.chaos)?,
            },
        };

        Ok(Self {
            run,
            scenario,
            verbosity: cli.verbose,
        })
    }
}

fn simple_params(args: &SimpleArgs, file: &SimpleSection) -> SimplePendulumParams {
    let defaults = SimplePendulumParams::default();
    SimplePendulumParams::new(
        args.length.or(file.length).unwrap_or(defaults.length),
        args.mass.or(file.mass).unwrap_or(defaults.mass),
        args.angle
            .or(file.angle)
            .unwrap_or(defaults.initial_angle_degrees),
    )
}

fn double_params(args: &DoubleArgs, file: &DoubleSection) -> DoublePendulumParams {
    let defaults = DoublePendulumParams::default();
    DoublePendulumParams::new(
        ArmParams::new(
            args.length1.or(file.length1).unwrap_or(defaults.upper.length),
            args.mass1.or(file.mass1).unwrap_or(defaults.upper.mass),
        ),
        ArmParams::new(
            args.length2.or(file.length2).unwrap_or(defaults.lower.length),
            args.mass2.or(file.mass2).unwrap_or(defaults.lower.mass),
        ),
        args.angle1
            .or(file.angle1)
            .unwrap_or(defaults.upper_angle_degrees),
        args.angle2
            .or(file.angle2)
            .unwrap_or(defaults.lower_angle_degrees),
    )
}

fn projectile_params(args: &ProjectileArgs, file: &ProjectileSection) -> ProjectileParams {
    let defaults = ProjectileParams::default();
    ProjectileParams::new(
        args.speed.or(file.speed).unwrap_or(defaults.speed),
        args.angle
            .or(file.angle)
            .unwrap_or(defaults.launch_angle_degrees),
        args.height.or(file.height).unwrap_or(defaults.initial_height),
    )
}

fn chaos_settings(args: &ChaosArgs, file: &ChaosSection) -> Result<ChaosSettings, ConfigError> {
    let defaults = ChaosSettings::default();
    let settings = ChaosSettings {
        perturbation: args
            .perturbation
            .or(file.perturbation)
            .unwrap_or(defaults.perturbation),
        instances: args
            .instances
            .or(file.instances)
            .unwrap_or(defaults.instances),
        tolerance: args.tolerance.or(file.tolerance).unwrap_or(defaults.tolerance),
    };
    if settings.instances == 0 {
        return Err(ConfigError::NoInstances);
    }
    Ok(settings)
}
