//! # Keysmith CLI
//!
//! `keygen` and `keyupdate` commands over the keysmith key and vault crates.

#![forbid(unsafe_code)]

pub mod commands;
pub mod keygen;
pub mod keyupdate;
pub mod options;
pub mod outcome;
pub mod password_reader;

pub use commands::{Cli, Commands, KeyUpdateArgs, KeygenArgs};
pub use outcome::{CliError, CliResult};
pub use password_reader::ConsolePasswordReader;

use keysmith_key::PasswordReader;

/// Run one command, prompting for passwords through `password_reader`
///
/// # Errors
///
/// Returns the command's failure
pub async fn run<P: PasswordReader>(
    command: &Commands,
    password_reader: P,
) -> Result<CliResult, CliError> {
    match command {
        Commands::Keygen(args) => keygen::run_keygen(args, password_reader).await,
        Commands::Keyupdate(args) => keyupdate::run_keyupdate(args, &password_reader).await,
    }
}
