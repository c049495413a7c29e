//! Encryption scheme selection

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Supported encryption schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EncryptorType {
    /// Curve25519 keypairs with XChaCha20-Poly1305 protected private keys
    #[default]
    Nacl,
}

impl fmt::Display for EncryptorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nacl => f.write_str("NACL"),
        }
    }
}

impl FromStr for EncryptorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NACL" => Ok(Self::Nacl),
            other => Err(format!("unsupported encryptor type '{other}'")),
        }
    }
}

/// Encryption scheme plus scheme-specific properties
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EncryptorConfig {
    /// Scheme
    #[serde(rename = "type")]
    pub encryptor_type: EncryptorType,
    /// Scheme-specific settings
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, String>,
}

impl EncryptorConfig {
    /// Config for `encryptor_type` with no extra properties
    #[must_use]
    pub fn new(encryptor_type: EncryptorType) -> Self {
        Self {
            encryptor_type,
            properties: HashMap::new(),
        }
    }
}

/// Pick the encryptor config for this invocation
///
/// A config file encryptor wins and `cli_parse` is never called, so CLI-only
/// encryptor flags are not evaluated at all in that case. Otherwise the CLI
/// result is returned as is, including `None`; defaulting belongs to
/// [`KeyEncryptorFactory`](crate::KeyEncryptorFactory).
pub fn resolve_encryptor_config<F>(
    main_config: Option<&EncryptorConfig>,
    cli_parse: F,
) -> Option<EncryptorConfig>
where
    F: FnOnce() -> Option<EncryptorConfig>,
{
    match try_resolve_encryptor_config(main_config, || Ok::<_, Infallible>(cli_parse())) {
        Ok(config) => config,
        Err(never) => match never {},
    }
}

/// [`resolve_encryptor_config`] for a CLI parse that can fail
///
/// A parse error only surfaces when the config file has no encryptor.
///
/// # Errors
///
/// Returns the error from `cli_parse` when it is called and fails
pub fn try_resolve_encryptor_config<F, E>(
    main_config: Option<&EncryptorConfig>,
    cli_parse: F,
) -> Result<Option<EncryptorConfig>, E>
where
    F: FnOnce() -> Result<Option<EncryptorConfig>, E>,
{
    match main_config {
        Some(config) => Ok(Some(config.clone())),
        None => cli_parse(),
    }
}
