//! Error types for key management

use crate::config::ConfigError;
use thiserror::Error;

/// Key-specific errors
#[derive(Debug, Error)]
pub enum KeyError {
    /// Key derivation from a password failed (bad argon parameters)
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// Sealing private key material failed
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Wrong password or corrupted ciphertext
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// Key material could not be decoded
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    /// Invalid key size provided
    #[error("Invalid key size: expected {expected}, got {actual}")]
    InvalidKeySize {
        /// Expected key size in bytes
        expected: usize,
        /// Actual key size in bytes
        actual: usize,
    },

    /// The key file to update does not exist
    #[error("Private key path must exist when updating key password")]
    PrivateKeyPathNotFound,

    /// None of the candidate passwords unlocked the stored key
    #[error("Locked key but no valid password given")]
    NoValidPassword,

    /// Generation refuses to overwrite an existing key file
    #[error("Key file already exists: {0}")]
    KeyFileExists(String),

    /// Reading a password from the operator failed
    #[error("Failed to read password: {0}")]
    PasswordRead(String),

    /// Remote vault operation failed
    #[error("Key vault error: {0}")]
    Vault(String),

    /// Configuration could not be resolved
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Key data could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl KeyError {
    /// Create a vault error from any displayable cause
    pub fn vault(msg: impl Into<String>) -> Self {
        Self::Vault(msg.into())
    }
}

/// Result type for key operations
pub type Result<T> = std::result::Result<T, KeyError>;
