//! StoryReel CLI
//!
//! Command-line interface for the StoryReel backend.

#![allow(clippy::print_stderr)]

use std::process::ExitCode;

use application::ApplicationError;
use clap::Parser;
use infrastructure::{AppConfig, create_api_client, init_logging};
use presentation_cli::{Cli, log_filter_from_verbosity, run};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(base_url) = cli.base_url.clone() {
        config.api.base_url = base_url;
        config.validate()?;
    }
    if let Some(filter) = log_filter_from_verbosity(cli.verbose) {
        config.logging.filter = filter.to_string();
    }
    init_logging(&config.logging)?;

    let client = create_api_client(&config)?;

    match run(cli, &client).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            let message = e
                .downcast_ref::<ApplicationError>()
                .map_or_else(|| e.to_string(), |err| err.user_message(&err.to_string()));
            eprintln!("❌ {message}");
            Ok(ExitCode::FAILURE)
        },
    }
}
