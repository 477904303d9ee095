//! Binary crate for the `readme-weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Logging setup
//! - Mapping the run result to a process exit code

use clap::Parser;
use std::process::ExitCode;
use weather_core::ProcessEnv;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cmd = cli::Cli::parse();
    if let Err(e) = cli::init_tracing(cmd.log_level) {
        eprintln!("❌ {e:#}");
        return ExitCode::FAILURE;
    }

    match cmd.run(&ProcessEnv).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
