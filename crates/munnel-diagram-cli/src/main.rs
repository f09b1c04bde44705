//! Munnel diagram CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use munnel_diagram_cli::{Args, error_adapter::render_report};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting Munnel diagram");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = munnel_diagram_cli::run(&args) {
        let report = render_report(&err);
        if log::max_level() >= LevelFilter::Error {
            error!("{report}");
        } else {
            eprintln!("{report}");
        }
        process::exit(1);
    }

    info!("Completed successfully");
}
