//! qco - Quick-changeover completion forecasting CLI
//!
//! Looks up a changeover record by module and style, scores it with three
//! pre-trained models and blends the results into one weighted risk score.

// Some public helpers (hot-swap, single-shot predict) are only exercised from tests
#![allow(dead_code)]

mod cli;
mod config;
mod dataset;
mod ensemble;
mod error;
mod features;
mod models;
mod pipeline;
mod predictor;
mod reporters;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use error::QcoError;

/// Exit status for errors the user can fix by changing the request
const EXIT_USER_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    // Initialize logging; RUST_LOG wins over --log-level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let user_error = err
                .downcast_ref::<QcoError>()
                .is_some_and(QcoError::is_user_error);
            if user_error {
                ExitCode::from(EXIT_USER_ERROR)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
