//! Key vault selection and validation
//!
//! Exactly one persistence target is active per invocation: local files
//! (`None`) or one of the remote vault variants below. Each variant owns its
//! own validation; the resolver dispatches on the explicit [`KeyVaultType`].

use super::{ConfigError, ConstraintViolation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

const MAY_NOT_BE_NULL: &str = "may not be null";
const FILE_DOES_NOT_EXIST: &str = "File does not exist";
const INVALID_AWS_ENDPOINT: &str = "must be a valid AWS service endpoint URL with scheme";
const VAULT_TYPE_MISSING: &str = "Key vault type either not provided or not recognised";
const HASHICORP_FILENAME_MISSING: &str =
    "At least one -filename must be provided when saving generated keys in a Hashicorp Vault";

/// Remote vault backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KeyVaultType {
    /// Azure Key Vault
    Azure,
    /// Hashicorp Vault (KV v2 secret engine)
    Hashicorp,
    /// AWS Secrets Manager
    Aws,
}

impl fmt::Display for KeyVaultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Azure => "AZURE",
            Self::Hashicorp => "HASHICORP",
            Self::Aws => "AWS",
        };
        f.write_str(name)
    }
}

impl FromStr for KeyVaultType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AZURE" => Ok(Self::Azure),
            "HASHICORP" => Ok(Self::Hashicorp),
            "AWS" => Ok(Self::Aws),
            other => Err(format!("unknown key vault type '{other}'")),
        }
    }
}

/// Azure Key Vault settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzureKeyVaultConfig {
    /// Vault URL, e.g. `https://myvault.vault.azure.net`
    pub url: String,
}

/// Hashicorp Vault settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashicorpKeyVaultConfig {
    /// Vault server URL
    pub url: String,
    /// Mount path of the AppRole auth method
    #[serde(default = "default_approle_path")]
    pub approle_path: String,
    /// PEM bundle (certificate + private key) presented as client identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_key_store_path: Option<PathBuf>,
    /// PEM CA certificate trusted for the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_trust_store_path: Option<PathBuf>,
}

fn default_approle_path() -> String {
    "approle".to_string()
}

/// AWS Secrets Manager settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AwsKeyVaultConfig {
    /// Service endpoint override; the SDK default is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// A resolved remote vault target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "keyVaultType", rename_all = "UPPERCASE")]
pub enum KeyVaultConfig {
    /// Azure Key Vault
    Azure(AzureKeyVaultConfig),
    /// Hashicorp Vault
    Hashicorp(HashicorpKeyVaultConfig),
    /// AWS Secrets Manager
    Aws(AwsKeyVaultConfig),
}

impl KeyVaultConfig {
    /// Backend discriminant
    #[must_use]
    pub fn vault_type(&self) -> KeyVaultType {
        match self {
            Self::Azure(_) => KeyVaultType::Azure,
            Self::Hashicorp(_) => KeyVaultType::Hashicorp,
            Self::Aws(_) => KeyVaultType::Aws,
        }
    }

    /// Run the variant's field checks, collecting every failure
    #[must_use]
    pub fn validate(&self) -> Vec<ConstraintViolation> {
        match self {
            Self::Azure(_) => Vec::new(),
            Self::Hashicorp(config) => validate_tls_paths(
                config.tls_key_store_path.as_deref(),
                config.tls_trust_store_path.as_deref(),
            ),
            Self::Aws(config) => validate_aws_endpoint(config.endpoint.as_deref())
                .into_iter()
                .collect(),
        }
    }
}

/// Vault-specific values passed through to the generator untouched
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyVaultOptions {
    /// Hashicorp KV v2 secret engine mount path
    pub hashicorp_secret_engine_path: Option<String>,
}

impl KeyVaultOptions {
    /// Options carrying a Hashicorp secret engine path
    pub fn new(hashicorp_secret_engine_path: impl Into<String>) -> Self {
        Self {
            hashicorp_secret_engine_path: Some(hashicorp_secret_engine_path.into()),
        }
    }
}

/// Raw vault selection values collected from the command line
#[derive(Debug, Clone, Default)]
pub struct VaultArgs {
    /// Selected backend; `None` when absent or unrecognised
    pub vault_type: Option<KeyVaultType>,
    /// Vault URL (endpoint for AWS)
    pub vault_url: Option<String>,
    /// Hashicorp AppRole mount path
    pub hashicorp_approle_path: Option<String>,
    /// Hashicorp TLS client identity PEM
    pub hashicorp_tls_keystore: Option<PathBuf>,
    /// Hashicorp TLS CA PEM
    pub hashicorp_tls_truststore: Option<PathBuf>,
}

/// Build the vault target for a key generation run
///
/// Returns `Ok(None)` when no vault was requested, meaning keys go to local
/// files. `output_path_count` is the number of `-filename` values supplied.
///
/// # Errors
///
/// - [`ConfigError::Cli`] when a URL is given without a recognised vault type,
///   or when Hashicorp is selected without any output filename
/// - [`ConfigError::ConstraintViolations`] with every failed field check
pub fn resolve_key_vault_config(
    args: &VaultArgs,
    output_path_count: usize,
) -> Result<Option<KeyVaultConfig>, ConfigError> {
    let Some(vault_type) = args.vault_type else {
        if args.vault_url.is_some() {
            return Err(ConfigError::cli(VAULT_TYPE_MISSING));
        }
        return Ok(None);
    };

    let config = match vault_type {
        KeyVaultType::Azure => build_azure(args),
        KeyVaultType::Hashicorp => {
            if output_path_count == 0 {
                return Err(ConfigError::cli(HASHICORP_FILENAME_MISSING));
            }
            build_hashicorp(args)
        }
        KeyVaultType::Aws => build_aws(args),
    }
    .map_err(ConfigError::ConstraintViolations)?;

    log::debug!("Resolved {vault_type} key vault config");
    Ok(Some(config))
}

fn build_azure(args: &VaultArgs) -> Result<KeyVaultConfig, Vec<ConstraintViolation>> {
    match &args.vault_url {
        Some(url) => Ok(KeyVaultConfig::Azure(AzureKeyVaultConfig { url: url.clone() })),
        None => Err(vec![url_violation()]),
    }
}

fn build_hashicorp(args: &VaultArgs) -> Result<KeyVaultConfig, Vec<ConstraintViolation>> {
    let mut violations = Vec::new();
    if args.vault_url.is_none() {
        violations.push(url_violation());
    }
    violations.extend(validate_tls_paths(
        args.hashicorp_tls_keystore.as_deref(),
        args.hashicorp_tls_truststore.as_deref(),
    ));

    match &args.vault_url {
        Some(url) if violations.is_empty() => {
            Ok(KeyVaultConfig::Hashicorp(HashicorpKeyVaultConfig {
                url: url.clone(),
                approle_path: args
                    .hashicorp_approle_path
                    .clone()
                    .unwrap_or_else(default_approle_path),
                tls_key_store_path: args.hashicorp_tls_keystore.clone(),
                tls_trust_store_path: args.hashicorp_tls_truststore.clone(),
            }))
        }
        _ => Err(violations),
    }
}

fn build_aws(args: &VaultArgs) -> Result<KeyVaultConfig, Vec<ConstraintViolation>> {
    let config = KeyVaultConfig::Aws(AwsKeyVaultConfig {
        endpoint: args.vault_url.clone(),
    });
    let violations = config.validate();
    if violations.is_empty() {
        Ok(config)
    } else {
        Err(violations)
    }
}

fn url_violation() -> ConstraintViolation {
    ConstraintViolation::new("url", MAY_NOT_BE_NULL)
}

fn validate_tls_paths(
    keystore: Option<&Path>,
    truststore: Option<&Path>,
) -> Vec<ConstraintViolation> {
    [("tlsKeyStorePath", keystore), ("tlsTrustStorePath", truststore)]
        .into_iter()
        .filter_map(|(field, path)| {
            path.filter(|p| !p.exists())
                .map(|_| ConstraintViolation::new(field, FILE_DOES_NOT_EXIST))
        })
        .collect()
}

fn validate_aws_endpoint(endpoint: Option<&str>) -> Option<ConstraintViolation> {
    let endpoint = endpoint?;
    match Url::parse(endpoint) {
        Ok(url) if url.has_host() => None,
        _ => Some(ConstraintViolation::new("endpoint", INVALID_AWS_ENDPOINT)),
    }
}
