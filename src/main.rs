//! # wheatstone
//!
//! Command-line front end for the bridge measurement rig.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive session against the backend
//! wheatstone run --url http://127.0.0.1:5000
//!
//! # One-shot status poll
//! wheatstone status
//!
//! # Evaluate the ΔR formulas offline
//! wheatstone formula --us 2.0 --ug 0.01 --r0 400
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::{dispatch, init_logging, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity());
    dispatch(cli)
}
