//! Typed configuration resolved from CLI options and node config files
//!
//! Resolvers here are pure: they take an immutable options value and return
//! either validated configuration or a [`ConfigError`].

mod argon;
mod encryptor;
mod node;
mod vault;

pub use argon::{ArgonAlgorithm, ArgonOptions};
pub use encryptor::{
    EncryptorConfig, EncryptorType, resolve_encryptor_config, try_resolve_encryptor_config,
};
pub use node::{KeyConfiguration, KeyPairPaths, NodeConfig};
pub use vault::{
    AwsKeyVaultConfig, AzureKeyVaultConfig, HashicorpKeyVaultConfig, KeyVaultConfig,
    KeyVaultOptions, KeyVaultType, VaultArgs, resolve_key_vault_config,
};

use std::fmt;
use thiserror::Error;

/// A single failed field constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    /// Property path of the offending field
    pub field: String,
    /// Human readable constraint message
    pub message: String,
}

impl ConstraintViolation {
    /// Create a violation for `field`
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Configuration resolution errors
///
/// `Cli` is a single stop-immediately condition. `ConstraintViolations`
/// carries every failed check collected from independent validations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Single-message command line error
    #[error("{0}")]
    Cli(String),

    /// One or more field constraints failed
    #[error("{}", join_violations(.0))]
    ConstraintViolations(Vec<ConstraintViolation>),

    /// Config file could not be read
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for the expected shape
    #[error("Invalid config file: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConfigError {
    /// Create a single-message CLI error
    pub fn cli(msg: impl Into<String>) -> Self {
        Self::Cli(msg.into())
    }

    /// Violations carried by this error, empty for other variants
    #[must_use]
    pub fn violations(&self) -> &[ConstraintViolation] {
        match self {
            Self::ConstraintViolations(violations) => violations,
            _ => &[],
        }
    }
}

fn join_violations(violations: &[ConstraintViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Turn a collected violation list into a result
pub(crate) fn check_violations(violations: Vec<ConstraintViolation>) -> Result<(), ConfigError> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ConstraintViolations(violations))
    }
}
