use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use wheatstone::client::BackendConfig;

mod config;
mod formula;
mod run;
mod status;

pub use config::Config;

/// wheatstone - Bridge measurement rig control surface
#[derive(Parser)]
#[command(name = "wheatstone")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Backend connection flags shared by the commands that talk to the rig.
#[derive(Args, Debug, Default)]
pub struct BackendArgs {
    /// Backend base URL (default: http://127.0.0.1:5000)
    #[arg(short = 'u', long, value_name = "URL")]
    url: Option<String>,

    /// Status polling period in milliseconds
    #[arg(long, value_name = "MS")]
    poll_ms: Option<u64>,

    /// Timeout for commands in milliseconds (none by default)
    #[arg(long, value_name = "MS")]
    command_timeout_ms: Option<u64>,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl BackendArgs {
    /// Overlay the flags on a configuration loaded from file and defaults.
    pub fn apply(&self, mut config: BackendConfig) -> BackendConfig {
        if let Some(url) = &self.url {
            config.base_url = url.clone();
        }
        if let Some(ms) = self.poll_ms {
            config = config.poll_interval_ms(ms);
        }
        if let Some(ms) = self.command_timeout_ms {
            config = config.command_timeout_ms(ms);
        }
        config
    }

    /// Load the config file (if any) and resolve the backend settings.
    pub fn resolve(&self) -> Result<(Config, BackendConfig)> {
        let file = Config::load(self.config.as_deref())?;
        let backend = self.apply(file.backend_config());
        Ok((file, backend))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive measurement session against the backend
    Run {
        #[command(flatten)]
        backend: BackendArgs,

        /// Excitation voltage Us in volts (default: 2.0)
        #[arg(long, value_name = "VOLTS")]
        excitation: Option<String>,

        /// Directory for CSV exports (default: current directory)
        #[arg(short = 'o', long, value_name = "DIR")]
        export_dir: Option<PathBuf>,
    },

    /// Poll the backend once and print the control panel
    Status {
        #[command(flatten)]
        backend: BackendArgs,

        /// Print the raw status document as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Evaluate the ΔR formulas for one reading, without a backend
    Formula {
        /// Excitation voltage Us in volts (falls back to 2.0 when not positive)
        #[arg(long, value_name = "VOLTS", default_value = "2.0")]
        us: String,

        /// Bridge voltage Ug in volts
        #[arg(long, value_name = "VOLTS", allow_hyphen_values = true)]
        ug: f64,

        /// Resistance R0 in ohms
        #[arg(long, value_name = "OHMS")]
        r0: f64,

        /// Calibration offset subtracted from both results
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        offset: f64,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            backend,
            excitation,
            export_dir,
        } => {
            let (file, backend_config) = backend.resolve()?;
            let mut session = file.session_config();
            if let Some(excitation) = excitation {
                session = session.with_excitation(excitation);
            }
            if let Some(dir) = export_dir {
                session = session.with_export_dir(dir);
            }
            run::run(backend_config, session)
        }
        Commands::Status { backend, json } => {
            let (_, backend_config) = backend.resolve()?;
            status::run(backend_config, json)
        }
        Commands::Formula { us, ug, r0, offset } => formula::run(&us, ug, r0, offset),
    }
}
