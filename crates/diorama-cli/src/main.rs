//! Diorama CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info, warn};

use diorama_cli::{
    Args,
    error_adapter::{Reportable, failures_to_reportables, to_reportables},
};

fn report(reportables: &[Reportable<'_>]) {
    let reporter = miette::GraphicalReportHandler::new();

    // Render each diagnostic independently
    for reportable in reportables {
        let mut writer = String::new();
        if reporter.render_report(&mut writer, reportable).is_err() {
            writer = reportable.to_string();
        }
        error!("{writer}");
    }
}

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    let args = Args::parse();

    // Initialize the logger with the specified log level
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

    info!(log_level:?; "Starting Diorama");
    debug!(args:?; "Parsed arguments");

    match diorama_cli::run(&args) {
        Ok(output) => {
            let failures = output.report().failures();
            if !failures.is_empty() {
                report(&failures_to_reportables(failures, output.source()));
                warn!(failed = failures.len(); "Some diagrams were not rendered");
                process::exit(1);
            }
        }
        Err(err) => {
            report(&to_reportables(&err));
            process::exit(1);
        }
    }

    info!("Completed successfully");
}
