//! Main entry point for the keysmith CLI

use clap::Parser;
use keysmith_cli::{Cli, ConsolePasswordReader, run};
use keysmith_common::LoggingTransformer;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize structured logging
    LoggingTransformer::init();

    let cli = Cli::parse();
    match run(&cli.command, ConsolePasswordReader).await {
        Ok(result) => ExitCode::from(result.status),
        Err(e) => {
            for message in e.messages() {
                eprintln!("{message}");
            }
            ExitCode::from(e.exit_status())
        }
    }
}
