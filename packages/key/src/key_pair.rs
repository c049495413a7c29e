//! Identity key material

use crate::{KeyError, Result};
use base64::{Engine, engine::general_purpose::STANDARD};
use std::fmt;
use zeroize::Zeroizing;

/// Length in bytes of both halves of a NaCl identity key pair
pub const KEY_LENGTH: usize = 32;

/// Private key bytes, zeroized on drop
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    key_bytes: Zeroizing<Vec<u8>>,
}

impl PrivateKey {
    /// Wrap raw private key bytes
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            key_bytes: Zeroizing::new(bytes),
        }
    }

    /// Decode a base64 private key
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidKeyFormat`] if `encoded` is not valid base64
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| KeyError::InvalidKeyFormat(format!("private key is not base64: {e}")))?;
        Ok(Self::from_bytes(bytes))
    }

    /// Raw key bytes
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.key_bytes
    }

    /// Base64 encoding of the key bytes
    #[must_use]
    pub fn encode_to_base64(&self) -> String {
        STANDARD.encode(self.bytes())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// Public key bytes
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    key_bytes: Vec<u8>,
}

impl PublicKey {
    /// Wrap raw public key bytes
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { key_bytes: bytes }
    }

    /// Raw key bytes
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.key_bytes
    }

    /// Base64 encoding of the key bytes
    #[must_use]
    pub fn encode_to_base64(&self) -> String {
        STANDARD.encode(self.bytes())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.encode_to_base64())
    }
}

/// A freshly generated identity key pair
///
/// Lives only until it has been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    /// Shareable half
    pub public_key: PublicKey,
    /// Secret half
    pub private_key: PrivateKey,
}
