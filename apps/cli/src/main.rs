//! pricestage CLI — Israeli supermarket price data staging pipeline.
//!
//! Downloads raw price/product dumps via the external scraper, parses them
//! to CSV via the external parser, verifies the staged output, and prints
//! guidance for the downstream MongoDB import step.

mod commands;

use std::process::ExitCode;

use clap::Parser;

use commands::Cli;
use pricestage_shared::{EXIT_FAILURE, PriceStageError};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = color_eyre::install() {
        eprintln!("failed to install error reporting: {err}");
        return ExitCode::from(EXIT_FAILURE);
    }

    let cli = Cli::parse();
    commands::init_tracing(&cli);

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            // Each fatal taxonomy member maps to its own exit code so
            // operators (and wrapping scripts) can tell the failures apart.
            let code = match err.downcast_ref::<PriceStageError>() {
                Some(e) => {
                    if let Some(hint) = e.remediation() {
                        eprintln!("Hint: {hint}");
                    }
                    e.exit_code()
                }
                None => EXIT_FAILURE,
            };
            ExitCode::from(code)
        }
    }
}
