//! `stpp` binary: run one conditional preprocessing pass over a stream.

use std::process::ExitCode;

use clap::Parser;

use stpp_cli::cli::Args;
use stpp_cli::config::Config;
use stpp_cli::error::EXIT_USAGE;
use stpp_cli::logging::init_logging;
use stpp_cli::run::{build_config, run};

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&Config::default());
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::from(EXIT_USAGE);
        }
    };
    init_logging(&config);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starting stpp");

    match run(&args, &config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "preprocessing failed");
            ExitCode::from(e.exit_code())
        }
    }
}
