//! Password protection of private keys
//!
//! A [`KeyEncryptor`] is built once per invocation by [`KeyEncryptorFactory`]
//! from the resolved [`EncryptorConfig`] and is then shared, immutable, by
//! every encrypt/decrypt call.

mod kdf;
mod nacl;
mod secretbox;

use crate::config::{ArgonOptions, EncryptorConfig, EncryptorType};
use crate::key_data::LockedPrivateKey;
use crate::key_pair::{KeyPair, PrivateKey};
use crate::{KeyError, Result};
use kdf::SALT_LENGTH;
use rand::RngCore;
use secretbox::NONCE_LENGTH;

/// Builds the [`KeyEncryptor`] for an invocation
pub struct KeyEncryptorFactory;

impl KeyEncryptorFactory {
    /// Create an encryptor, defaulting to NaCl when no config was resolved
    #[must_use]
    pub fn create(config: Option<&EncryptorConfig>) -> KeyEncryptor {
        let encryptor_type = config.map(|c| c.encryptor_type).unwrap_or_default();
        log::debug!("Creating key encryptor for {encryptor_type}");
        KeyEncryptor { encryptor_type }
    }
}

/// Stateless private key sealing service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEncryptor {
    encryptor_type: EncryptorType,
}

impl KeyEncryptor {
    /// Scheme this encryptor implements
    #[must_use]
    pub fn encryptor_type(&self) -> EncryptorType {
        self.encryptor_type
    }

    /// Generate a new identity key pair for this scheme
    #[must_use]
    pub fn generate_key_pair(&self) -> KeyPair {
        match self.encryptor_type {
            EncryptorType::Nacl => nacl::generate_key_pair(),
        }
    }

    /// Seal `private_key` under a key derived from `password`
    ///
    /// Salt and nonce are fresh for every call, so sealing the same key twice
    /// never produces the same record.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::KeyDerivation`] for unusable argon parameters or
    /// [`KeyError::Encryption`] if sealing fails
    pub fn encrypt_private_key(
        &self,
        private_key: &PrivateKey,
        password: &str,
        options: &ArgonOptions,
    ) -> Result<LockedPrivateKey> {
        let mut salt = [0u8; SALT_LENGTH];
        let mut nonce = [0u8; NONCE_LENGTH];
        let mut rng = rand::rng();
        rng.fill_bytes(&mut salt);
        rng.fill_bytes(&mut nonce);

        let key = kdf::derive_key(password.as_bytes(), &salt, options)?;
        let ciphertext = secretbox::seal(private_key.bytes(), &key, &nonce)?;

        Ok(LockedPrivateKey::from_parts(
            &ciphertext,
            &nonce,
            &salt,
            *options,
        ))
    }

    /// Recover the private key sealed in `locked`
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Decryption`] for a wrong password or corrupted
    /// data, [`KeyError::InvalidKeyFormat`] if a field is not base64
    pub fn decrypt_private_key(
        &self,
        locked: &LockedPrivateKey,
        password: &str,
    ) -> Result<PrivateKey> {
        let ciphertext = LockedPrivateKey::decode_field("ciphertext", &locked.ciphertext)?;
        let nonce = LockedPrivateKey::decode_field("nonce", &locked.nonce)?;
        let salt = LockedPrivateKey::decode_field("salt", &locked.salt)?;

        let key = kdf::derive_key(password.as_bytes(), &salt, &locked.kdf_params)
            .map_err(|e| KeyError::Decryption(e.to_string()))?;
        let plaintext = secretbox::open(&ciphertext, &key, &nonce)?;

        Ok(PrivateKey::from_bytes(plaintext.to_vec()))
    }

    /// Check that a recovered private key is usable with this scheme
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidKeySize`] if a NaCl key is not 32 bytes
    pub fn check_private_key(&self, private_key: &PrivateKey) -> Result<()> {
        match self.encryptor_type {
            EncryptorType::Nacl => nacl::check_private_key(private_key),
        }
    }
}
