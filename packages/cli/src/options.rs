//! Option groups shared by the subcommands

use clap::Args;
use keysmith_key::config::{
    ArgonAlgorithm, ArgonOptions, EncryptorConfig, EncryptorType, KeyVaultOptions, VaultArgs,
};
use keysmith_key::ConfigError;
use std::path::{Path, PathBuf};

/// Encryptor selection
#[derive(Debug, Clone, Default, Args)]
pub struct EncryptorArgs {
    /// Encryption scheme for key pairs (NACL)
    #[arg(long = "encryptor.type", value_name = "TYPE")]
    pub encryptor_type: Option<String>,
}

impl EncryptorArgs {
    /// Encryptor config from the command line, if one was given
    ///
    /// The type is only checked here, so a config file encryptor makes the
    /// flag irrelevant.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Cli`] for an unsupported encryptor type
    pub fn parse_encryptor_config(&self) -> Result<Option<EncryptorConfig>, ConfigError> {
        self.encryptor_type
            .as_deref()
            .map(|t| {
                t.parse::<EncryptorType>()
                    .map(EncryptorConfig::new)
                    .map_err(ConfigError::cli)
            })
            .transpose()
    }
}

/// Argon2 overrides for newly locked keys
#[derive(Debug, Clone, Default, Args)]
pub struct KdfArgs {
    /// Argon2 variant: i, d or id
    #[arg(long = "kdf.algorithm", value_name = "ALGORITHM")]
    pub algorithm: Option<ArgonAlgorithm>,
    /// Argon2 time cost
    #[arg(long = "kdf.iterations", value_name = "N")]
    pub iterations: Option<u32>,
    /// Argon2 memory cost in KiB
    #[arg(long = "kdf.memory", value_name = "KIB")]
    pub memory: Option<u32>,
    /// Argon2 lanes
    #[arg(long = "kdf.parallelism", value_name = "N")]
    pub parallelism: Option<u32>,
}

/// Argon2 settings for `keyupdate`, named after the key file layout
#[derive(Debug, Clone, Default, Args)]
pub struct KeyUpdateKdfArgs {
    /// Argon2 variant: i, d or id
    #[arg(long = "keys.keyData.config.data.aopts.algorithm", value_name = "ALGORITHM")]
    pub algorithm: Option<ArgonAlgorithm>,
    /// Argon2 time cost
    #[arg(long = "keys.keyData.config.data.aopts.iterations", value_name = "N")]
    pub iterations: Option<u32>,
    /// Argon2 memory cost in KiB
    #[arg(long = "keys.keyData.config.data.aopts.memory", value_name = "KIB")]
    pub memory: Option<u32>,
    /// Argon2 lanes
    #[arg(long = "keys.keyData.config.data.aopts.parallelism", value_name = "N")]
    pub parallelism: Option<u32>,
}

impl From<&KeyUpdateKdfArgs> for KdfArgs {
    fn from(args: &KeyUpdateKdfArgs) -> Self {
        Self {
            algorithm: args.algorithm,
            iterations: args.iterations,
            memory: args.memory,
            parallelism: args.parallelism,
        }
    }
}

impl KdfArgs {
    /// Whether no override was given
    pub fn is_empty(&self) -> bool {
        self.algorithm.is_none()
            && self.iterations.is_none()
            && self.memory.is_none()
            && self.parallelism.is_none()
    }

    /// `base` with every given override applied
    pub fn apply(&self, base: ArgonOptions) -> ArgonOptions {
        ArgonOptions {
            algorithm: self.algorithm.unwrap_or(base.algorithm),
            iterations: self.iterations.unwrap_or(base.iterations),
            memory: self.memory.unwrap_or(base.memory),
            parallelism: self.parallelism.unwrap_or(base.parallelism),
        }
    }

    /// KDF options for key generation
    ///
    /// `None` unless a keygen config file or an override was supplied, so
    /// the generator can store password-less keys unlocked.
    ///
    /// # Errors
    ///
    /// Returns an error if the keygen config file cannot be read or parsed
    pub async fn resolve(
        &self,
        keygen_config: Option<&Path>,
    ) -> Result<Option<ArgonOptions>, keysmith_key::ConfigError> {
        let base = match keygen_config {
            Some(path) => {
                let contents = tokio::fs::read_to_string(path).await?;
                Some(serde_json::from_str::<ArgonOptions>(&contents)?)
            }
            None => None,
        };

        Ok(match base {
            Some(base) => Some(self.apply(base)),
            None if self.is_empty() => None,
            None => Some(self.apply(ArgonOptions::default())),
        })
    }
}

/// Vault selection
#[derive(Debug, Clone, Default, Args)]
pub struct VaultCliArgs {
    /// Store generated keys in a vault: AZURE, HASHICORP or AWS
    #[arg(long = "vault.type", value_name = "TYPE")]
    pub vault_type: Option<String>,
    /// Vault URL, or endpoint override for AWS
    #[arg(long = "vault.url", value_name = "URL")]
    pub vault_url: Option<String>,
    /// Hashicorp AppRole mount path (default: approle)
    #[arg(long = "vault.hashicorp.approlepath", value_name = "PATH")]
    pub hashicorp_approle_path: Option<String>,
    /// PEM file with the client certificate and key for Hashicorp TLS
    #[arg(long = "vault.hashicorp.tlskeystore", value_name = "FILE")]
    pub hashicorp_tls_keystore: Option<PathBuf>,
    /// PEM file with the CA certificate for Hashicorp TLS
    #[arg(long = "vault.hashicorp.tlstruststore", value_name = "FILE")]
    pub hashicorp_tls_truststore: Option<PathBuf>,
    /// Hashicorp KV v2 secret engine mount path
    #[arg(long = "vault.hashicorp.secretenginepath", value_name = "PATH")]
    pub hashicorp_secret_engine_path: Option<String>,
}

impl VaultCliArgs {
    /// Values for the vault resolver; an unrecognised type counts as absent
    pub fn to_vault_args(&self) -> VaultArgs {
        let vault_type = self.vault_type.as_deref().and_then(|t| match t.parse() {
            Ok(vault_type) => Some(vault_type),
            Err(e) => {
                log::warn!("Ignoring vault type: {e}");
                None
            }
        });

        VaultArgs {
            vault_type,
            vault_url: self.vault_url.clone(),
            hashicorp_approle_path: self.hashicorp_approle_path.clone(),
            hashicorp_tls_keystore: self.hashicorp_tls_keystore.clone(),
            hashicorp_tls_truststore: self.hashicorp_tls_truststore.clone(),
        }
    }

    /// Pass-through options for the vault generator
    pub fn vault_options(&self) -> Option<KeyVaultOptions> {
        self.hashicorp_secret_engine_path
            .as_deref()
            .map(KeyVaultOptions::new)
    }
}
