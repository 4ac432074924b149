#![forbid(unsafe_code)]

//! # Mechanics
//!
//! Fixed-step pendulum and projectile simulations on the command line.
//!
//! ## Usage
//!
//! ```bash
//! mechanics simple --length 2 --angle 60
//! mechanics --format csv double --angle1 120
//! mechanics --realtime projectile --speed 15
//! mechanics chaos --instances 8
//! ```

use std::io::{self, Write};

use anyhow::Context;
use mechanics_cli::{logging, runner, Cli, Config};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    logging::init(cli.log_level())?;

    let config = Config::from_cli(&cli).context("invalid configuration")?;

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    runner::run(&config, &mut out)?;
    out.flush()?;

    Ok(())
}
