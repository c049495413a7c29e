//! Remote secret stores for node identity key pairs
//!
//! Each backend implements the storage half of
//! [`KeyVaultService`](keysmith_key::KeyVaultService). Backends are built by
//! [`create_key_vault_service`] from an already validated
//! [`KeyVaultConfig`](keysmith_key::KeyVaultConfig).

#![forbid(unsafe_code)]

pub mod aws;
pub mod azure;
pub mod error;
pub mod factory;
pub mod hashicorp;

pub use aws::AwsSecretsManagerService;
pub use azure::{AzureCredentials, AzureKeyVaultService};
pub use error::{VaultError, VaultResult};
pub use factory::{KeyVaultBackend, create_key_vault_service};
pub use hashicorp::{HashicorpAuth, HashicorpKeyVaultService};
