//! Factory for the configured vault backend

use crate::aws::AwsSecretsManagerService;
use crate::azure::{AzureCredentials, AzureKeyVaultService};
use crate::error::VaultResult;
use crate::hashicorp::{HashicorpAuth, HashicorpKeyVaultService};
use keysmith_key::config::{KeyVaultConfig, KeyVaultOptions};
use keysmith_key::{KeyPair, KeyVaultService, Result};

/// Enum to hold the different vault backends
///
/// Lets the generator stay generic over a single concrete type while the
/// backend is chosen at runtime.
#[derive(Debug, Clone)]
pub enum KeyVaultBackend {
    Azure(AzureKeyVaultService),
    Hashicorp(HashicorpKeyVaultService),
    Aws(AwsSecretsManagerService),
}

impl KeyVaultService for KeyVaultBackend {
    fn backend_name(&self) -> &'static str {
        match self {
            KeyVaultBackend::Azure(_) => "azure",
            KeyVaultBackend::Hashicorp(_) => "hashicorp",
            KeyVaultBackend::Aws(_) => "aws",
        }
    }

    async fn store_key_pair(
        &self,
        name: &str,
        key_pair: &KeyPair,
        options: Option<&KeyVaultOptions>,
    ) -> Result<Vec<String>> {
        let stored = match self {
            KeyVaultBackend::Azure(service) => service.save_key_pair(name, key_pair).await,
            KeyVaultBackend::Hashicorp(service) => {
                service.save_key_pair(name, key_pair, options).await
            }
            KeyVaultBackend::Aws(service) => service.save_key_pair(name, key_pair).await,
        };
        Ok(stored?)
    }
}

/// Build the backend for `config`, reading credentials from the environment
///
/// # Errors
///
/// Returns an error for missing credentials, bad URLs or unreadable TLS files
pub async fn create_key_vault_service(config: &KeyVaultConfig) -> VaultResult<KeyVaultBackend> {
    log::debug!("Creating {} key vault service", config.vault_type());

    let backend = match config {
        KeyVaultConfig::Azure(azure) => {
            KeyVaultBackend::Azure(AzureKeyVaultService::new(azure, AzureCredentials::from_env()?)?)
        }
        KeyVaultConfig::Hashicorp(hashicorp) => KeyVaultBackend::Hashicorp(
            HashicorpKeyVaultService::new(hashicorp, HashicorpAuth::from_env()?)?,
        ),
        KeyVaultConfig::Aws(aws) => {
            KeyVaultBackend::Aws(AwsSecretsManagerService::connect(aws).await)
        }
    };
    Ok(backend)
}
