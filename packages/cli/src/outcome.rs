//! Command results and exit status mapping

use keysmith_key::{ConfigError, KeyError, NodeConfig};
use keysmith_vault::VaultError;
use thiserror::Error;

/// Result of a successful command
#[derive(Debug, Clone, PartialEq)]
pub struct CliResult {
    /// Process exit status
    pub status: u8,
    /// Whether the caller should skip printing the config
    pub suppress_output: bool,
    /// Node config after the command, when one was loaded
    pub config: Option<NodeConfig>,
}

impl CliResult {
    /// Status 0 with output suppressed
    pub fn success(config: Option<NodeConfig>) -> Self {
        Self {
            status: 0,
            suppress_output: true,
            config,
        }
    }
}

/// Any failure a command can end with
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error(transparent)]
    Vault(#[from] VaultError),
}

impl CliError {
    /// Lines to print on stderr: one per violation, otherwise the error itself
    pub fn messages(&self) -> Vec<String> {
        let violations = match self {
            CliError::Config(e) | CliError::Key(KeyError::Config(e)) => e.violations(),
            _ => &[],
        };

        if violations.is_empty() {
            vec![self.to_string()]
        } else {
            violations.iter().map(ToString::to_string).collect()
        }
    }

    /// Process exit status for this failure
    pub fn exit_status(&self) -> u8 {
        1
    }
}
