//! Key generation into an external secret store

use super::{GeneratedKey, KeyLocation};
use crate::config::{ArgonOptions, KeyVaultOptions};
use crate::encryptor::KeyEncryptor;
use crate::key_pair::KeyPair;
use crate::Result;
use keysmith_common::LoggingTransformer;
use std::future::Future;

/// A secret store able to hold identity key pairs
///
/// Implementations store the base64 public and private halves as two
/// secrets derived from `name` and return the identifiers they were stored
/// under.
pub trait KeyVaultService: Send + Sync {
    /// Short backend name used in logs
    fn backend_name(&self) -> &'static str;

    /// Persist `key_pair` under `name`
    fn store_key_pair(
        &self,
        name: &str,
        key_pair: &KeyPair,
        options: Option<&KeyVaultOptions>,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// Generates key pairs and hands them to a [`KeyVaultService`]
///
/// Vault-held keys are never password protected, so KDF options are ignored.
#[derive(Debug)]
pub struct VaultKeyGenerator<V> {
    encryptor: KeyEncryptor,
    vault: V,
}

impl<V: KeyVaultService> VaultKeyGenerator<V> {
    /// Create a generator storing into `vault`
    pub fn new(encryptor: KeyEncryptor, vault: V) -> Self {
        Self { encryptor, vault }
    }

    /// Generate one pair and store it under `name`
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Vault`](crate::KeyError::Vault) if the store rejects
    /// either secret
    pub async fn generate(
        &self,
        name: &str,
        kdf: Option<&ArgonOptions>,
        options: Option<&KeyVaultOptions>,
    ) -> Result<GeneratedKey> {
        if kdf.is_some() {
            log::warn!("KDF options are ignored for keys stored in a vault");
        }

        let key_pair = self.encryptor.generate_key_pair();
        let backend = self.vault.backend_name();
        let result = self.vault.store_key_pair(name, &key_pair, options).await;
        LoggingTransformer::log_vault_operation(backend, "store_key_pair", name, result.is_ok());

        Ok(GeneratedKey {
            public_key: key_pair.public_key,
            location: KeyLocation::Vault(result?),
        })
    }
}
