//! # Keysmith Key Management
//!
//! Identity key pairs for peer nodes: generation to files or a secret store,
//! password protection with argon2-derived keys, and password rotation of
//! existing key files.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use keysmith_key::{KeyEncryptorFactory, KeyPasswordUpdate, update_key_password};
//!
//! # async fn run(reader: impl keysmith_key::PasswordReader) -> keysmith_key::Result<()> {
//! let encryptor = KeyEncryptorFactory::create(None);
//! let request = KeyPasswordUpdate {
//!     private_key_path: "node.key".into(),
//!     password: Some("old password".into()),
//!     password_file: None,
//!     argon_options: Default::default(),
//! };
//! let outcome = update_key_password(&request, &encryptor, &reader).await?;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod encryptor;
pub mod error;
pub mod generator;
pub mod key_data;
pub mod key_file;
pub mod key_pair;
pub mod passwords;
pub mod rotation;

pub use config::{
    ArgonAlgorithm, ArgonOptions, ConfigError, ConstraintViolation, EncryptorConfig,
    EncryptorType, KeyVaultConfig, KeyVaultOptions, KeyVaultType, NodeConfig,
};
pub use encryptor::{KeyEncryptor, KeyEncryptorFactory};
pub use error::{KeyError, Result};
pub use generator::{
    FileKeyGenerator, GeneratedKey, KeyGenerator, KeyLocation, KeyVaultService,
    VaultKeyGenerator,
};
pub use key_data::{KeyDataConfig, LockedPrivateKey, PrivateKeyType};
pub use key_pair::{KeyPair, PrivateKey, PublicKey};
pub use passwords::{PasswordReader, candidate_passwords};
pub use rotation::{KeyPasswordUpdate, KeyUpdateOutcome, unlock_private_key, update_key_password};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ArgonOptions, EncryptorConfig, KeyVaultConfig, KeyVaultOptions};
    pub use crate::{
        KeyEncryptor, KeyEncryptorFactory, KeyError, KeyGenerator, KeyVaultService,
        PasswordReader, Result,
    };
}
