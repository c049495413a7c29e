//! Identity key pair generation
//!
//! [`KeyGenerator`] picks between local files and a secret store once per
//! invocation. Targets are processed one at a time and the first failure
//! stops the run; pairs already written stay in place.

mod file;
mod vault;

pub use file::FileKeyGenerator;
pub use vault::{KeyVaultService, VaultKeyGenerator};

use crate::Result;
use crate::config::{ArgonOptions, KeyPairPaths, KeyVaultOptions};
use crate::key_pair::PublicKey;
use crate::passwords::PasswordReader;

/// Where a generated pair ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyLocation {
    /// Written to the local filesystem
    Files(KeyPairPaths),
    /// Stored as secrets with these identifiers
    Vault(Vec<String>),
}

/// Result of generating one key pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedKey {
    /// Public half, safe to display
    pub public_key: PublicKey,
    /// Storage location
    pub location: KeyLocation,
}

/// File or vault backed generator
#[derive(Debug)]
pub enum KeyGenerator<V, P> {
    /// Local `.pub`/`.key` files
    File(FileKeyGenerator<P>),
    /// External secret store
    Vault(VaultKeyGenerator<V>),
}

impl<V: KeyVaultService, P: PasswordReader> KeyGenerator<V, P> {
    /// Generate one pair for `target`
    ///
    /// `target` is a base path for files or a secret name for vaults.
    ///
    /// # Errors
    ///
    /// Propagates the underlying generator's error
    pub async fn generate(
        &self,
        target: &str,
        kdf: Option<&ArgonOptions>,
        options: Option<&KeyVaultOptions>,
    ) -> Result<GeneratedKey> {
        match self {
            Self::File(generator) => generator.generate(target, kdf).await,
            Self::Vault(generator) => generator.generate(target, kdf, options).await,
        }
    }

    /// Generate a pair for each target in order, stopping at the first error
    ///
    /// # Errors
    ///
    /// Returns the first generation failure
    pub async fn generate_all(
        &self,
        targets: &[String],
        kdf: Option<&ArgonOptions>,
        options: Option<&KeyVaultOptions>,
    ) -> Result<Vec<GeneratedKey>> {
        let mut generated = Vec::with_capacity(targets.len());
        for target in targets {
            generated.push(self.generate(target, kdf, options).await?);
        }
        Ok(generated)
    }
}
