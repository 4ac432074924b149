//! Command-line interface for `mechanics`.
//!
//! # Examples
//!
//! ```bash
//! # Ten seconds of the default simple pendulum
//! mechanics simple
//!
//! # A double pendulum for a minute, trace as CSV
//! mechanics --duration 60 --format csv double --angle1 120 --angle2 -10
//!
//! # Launch a projectile and watch it fly
//! mechanics --realtime projectile --speed 15 --angle 60 --height 2
//!
//! # Eight nudged double pendulums in parallel
//! mechanics chaos --instances 8 --perturbation 1e-6
//! ```
//!
//! Every numeric flag left out falls back to the config file and then to the
//! built-in defaults.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::input::parse_number;

/// Fixed-step pendulum and projectile simulations.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "mechanics",
    author,
    version,
    about = "Fixed-step pendulum and projectile simulations",
    long_about = "Integrates a simple pendulum, a double pendulum or a projectile \
                  at a fixed timestep and prints readouts, snapshots or traces."
)]
pub struct Cli {
    /// TOML file with [run], [simple], [double] and [projectile] sections
    #[arg(long, short = 'c', env = "MECHANICS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Frames per second; each frame advances the simulation by 1/FPS seconds
    #[arg(long)]
    pub fps: Option<u32>,

    /// Simulated seconds to run for
    #[arg(long, short = 'd', value_parser = parse_number, allow_negative_numbers = true)]
    pub duration: Option<f64>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<OutputFormat>,

    /// Pace frames against the wall clock and print a live readout
    #[arg(long)]
    pub realtime: bool,

    /// Enable verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Simulations the CLI can drive.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Single pendulum with energy readout
    Simple(SimpleArgs),

    /// Double pendulum with a trace of the lower bob
    Double(DoubleArgs),

    /// Drag-free projectile launched above flat ground
    Projectile(ProjectileArgs),

    /// Run nudged copies of a double pendulum in parallel and report divergence
    Chaos(ChaosArgs),
}

/// Simple pendulum parameters.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct SimpleArgs {
    /// Arm length in metres
    #[arg(long, value_parser = parse_number)]
    pub length: Option<f64>,

    /// Bob mass in kilograms
    #[arg(long, value_parser = parse_number)]
    pub mass: Option<f64>,

    /// Starting angle in degrees (-170 to 170)
    #[arg(long, value_parser = parse_number, allow_negative_numbers = true)]
    pub angle: Option<f64>,
}

/// Double pendulum parameters.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct DoubleArgs {
    /// Upper arm length in metres
    #[arg(long, value_parser = parse_number)]
    pub length1: Option<f64>,

    /// Upper bob mass in kilograms
    #[arg(long, value_parser = parse_number)]
    pub mass1: Option<f64>,

    /// Upper arm starting angle in degrees
    #[arg(long, value_parser = parse_number, allow_negative_numbers = true)]
    pub angle1: Option<f64>,

    /// Lower arm length in metres
    #[arg(long, value_parser = parse_number)]
    pub length2: Option<f64>,

    /// Lower bob mass in kilograms
    #[arg(long, value_parser = parse_number)]
    pub mass2: Option<f64>,

    /// Lower arm starting angle in degrees
    #[arg(long, value_parser = parse_number, allow_negative_numbers = true)]
    pub angle2: Option<f64>,
}

/// Projectile launch parameters.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ProjectileArgs {
    /// Launch speed in m/s
    #[arg(long, value_parser = parse_number, allow_negative_numbers = true)]
    pub speed: Option<f64>,

    /// Launch angle above the horizontal in degrees (0 to 90)
    #[arg(long, value_parser = parse_number, allow_negative_numbers = true)]
    pub angle: Option<f64>,

    /// Launch height above the ground in metres
    #[arg(long, value_parser = parse_number, allow_negative_numbers = true)]
    pub height: Option<f64>,
}

/// Chaos experiment settings on top of the double pendulum parameters.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ChaosArgs {
    #[command(flatten)]
    pub pendulum: DoubleArgs,

    /// Smallest nudge to the upper angle in radians; instance k uses k times this
    #[arg(long, value_parser = parse_number)]
    pub perturbation: Option<f64>,

    /// Number of nudged copies to run
    #[arg(long, short = 'n')]
    pub instances: Option<usize>,

    /// Lower-bob separation counted as divergence, as a fraction of the lower arm length
    #[arg(long, value_parser = parse_number)]
    pub tolerance: Option<f64>,
}

/// How results are written to stdout.
#[derive(ValueEnum, Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable readout
    #[default]
    Text,
    /// Final snapshot and trace as JSON
    Json,
    /// Trace as `x,y` rows
    Csv,
}

impl Cli {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Get log level based on verbosity.
    #[must_use]
    pub const fn log_level(&self) -> LogLevel {
        match self.verbose {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// Log level for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Only show warnings and errors
    Warn,
    /// Show info messages
    Info,
    /// Show debug messages
    Debug,
    /// Show all messages including trace
    Trace,
}

impl LogLevel {
    /// Filter directive understood by `tracing_subscriber::EnvFilter`.
    #[must_use]
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}
