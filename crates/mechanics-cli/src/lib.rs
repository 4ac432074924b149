#![forbid(unsafe_code)]

//! # Mechanics CLI
//!
//! Headless driver for the `mechanics` integrators. It resolves parameters
//! from flags and an optional config file, drives a simulation at a fixed
//! timestep and prints a readout, a JSON snapshot or a CSV trace.
//!
//! ## Modules
//!
//! - [`cli`] - Command-line contract
//! - [`config`] - Layered configuration
//! - [`input`] - Numeric text parsing
//! - [`driver`] - Fixed-step driver and frame pacing
//! - [`runner`] - Scenario execution
//! - [`chaos`] - Parallel divergence experiments
//! - [`output`] - Readouts, JSON and CSV
//! - [`logging`] - `tracing` subscriber setup

pub mod chaos;
pub mod cli;
pub mod config;
pub mod driver;
pub mod input;
pub mod logging;
pub mod output;
pub mod runner;

pub use cli::{Cli, OutputFormat};
pub use config::{Config, ConfigError};
pub use input::ParsedNumber;
