//! Node configuration file (`--configfile`)
//!
//! Only the sections key management cares about are typed. Everything else in
//! the file is kept verbatim so a config can be rewritten with new key pairs
//! without losing unrelated settings.

use super::{ConfigError, ConstraintViolation, EncryptorConfig, KeyVaultConfig, check_violations};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

const PASSWORD_FILE_MISSING: &str = "Password file does not exist";
const INLINE_PASSWORDS: &str = "For security reasons, passwords should not be provided directly in the config.  Provide them in a separate file with \"passwordFile\" or at the CLI prompt during node startup.";
const NO_KEY_PAIRS: &str = "At least 1 public/private key pair must be provided";

/// Parsed node configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfig {
    /// Encryption scheme for this node, if configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryptor: Option<EncryptorConfig>,
    /// Key section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<KeyConfiguration>,
    /// Settings outside key management, preserved as read
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// The `keys` section of a node configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyConfiguration {
    /// File holding one key password per line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_file: Option<PathBuf>,
    /// Inline passwords (rejected by validation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passwords: Option<Vec<String>>,
    /// Key pair entries; shapes other than [`KeyPairPaths`] are kept untouched
    #[serde(default)]
    pub key_data: Vec<Value>,
    /// Remote vault holding the node's keys
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_vault_config: Option<KeyVaultConfig>,
}

/// A key pair stored as a `.pub` / `.key` file pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPairPaths {
    /// Base64 public key file
    pub public_key_path: PathBuf,
    /// Serialized private key data file
    pub private_key_path: PathBuf,
}

impl KeyPairPaths {
    /// `{base}.pub` / `{base}.key`
    pub fn for_base(base: &str) -> Self {
        Self {
            public_key_path: PathBuf::from(format!("{base}.pub")),
            private_key_path: PathBuf::from(format!("{base}.key")),
        }
    }
}

impl NodeConfig {
    /// Read and parse a JSON node config
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid config
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&contents)?;
        log::debug!("Loaded node config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Write the config as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), contents)?;
        Ok(())
    }

    /// Append a file-based key pair to the `keys` section, creating it if needed
    pub fn add_key_pair(&mut self, paths: &KeyPairPaths) -> Result<(), ConfigError> {
        let entry = serde_json::to_value(paths)?;
        self.keys.get_or_insert_with(KeyConfiguration::default).key_data.push(entry);
        Ok(())
    }

    /// Check the key section, reporting every violation together
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConstraintViolations`] listing all failures
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut violations = Vec::new();

        if let Some(keys) = &self.keys {
            if let Some(password_file) = &keys.password_file
                && !password_file.exists()
            {
                violations.push(ConstraintViolation::new(
                    "keys.passwordFile",
                    PASSWORD_FILE_MISSING,
                ));
            }

            if keys.passwords.as_ref().is_some_and(|p| !p.is_empty()) {
                violations.push(ConstraintViolation::new("keys.passwords", INLINE_PASSWORDS));
            }

            if keys.key_data.is_empty() {
                violations.push(ConstraintViolation::new("keys.keyData", NO_KEY_PAIRS));
            }

            if let Some(vault) = &keys.key_vault_config {
                violations.extend(vault.validate().into_iter().map(|v| {
                    ConstraintViolation::new(format!("keys.keyVaultConfig.{}", v.field), v.message)
                }));
            }
        }

        check_violations(violations)
    }
}
