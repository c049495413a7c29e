//! On-disk private key records
//!
//! ```json
//! {"type":"UNLOCKED","value":"<base64>"}
//! {"type":"LOCKED","privateKeyData":{"ciphertext":"..","nonce":"..","salt":"..","kdfParams":{..}}}
//! ```

use crate::config::ArgonOptions;
use crate::key_pair::PrivateKey;
use crate::{KeyError, Result};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a stored private key is password protected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrivateKeyType {
    /// Sealed under a password-derived key
    Locked,
    /// Stored as directly usable bytes
    Unlocked,
}

impl fmt::Display for PrivateKeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked => f.write_str("LOCKED"),
            Self::Unlocked => f.write_str("UNLOCKED"),
        }
    }
}

/// Sealed private key plus everything needed to re-derive the sealing key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedPrivateKey {
    /// Base64 ciphertext (including the authentication tag)
    pub ciphertext: String,
    /// Base64 AEAD nonce
    pub nonce: String,
    /// Base64 KDF salt
    pub salt: String,
    /// KDF parameters used when sealing
    pub kdf_params: ArgonOptions,
}

impl LockedPrivateKey {
    pub(crate) fn from_parts(
        ciphertext: &[u8],
        nonce: &[u8],
        salt: &[u8],
        kdf_params: ArgonOptions,
    ) -> Self {
        Self {
            ciphertext: STANDARD.encode(ciphertext),
            nonce: STANDARD.encode(nonce),
            salt: STANDARD.encode(salt),
            kdf_params,
        }
    }

    pub(crate) fn decode_field(name: &str, value: &str) -> Result<Vec<u8>> {
        STANDARD
            .decode(value)
            .map_err(|e| KeyError::InvalidKeyFormat(format!("{name} is not base64: {e}")))
    }
}

/// A private key file's contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum KeyDataConfig {
    /// Password protected key
    Locked {
        /// Sealed key material
        #[serde(rename = "privateKeyData")]
        private_key_data: LockedPrivateKey,
    },
    /// Plain key
    Unlocked {
        /// Base64 private key
        value: String,
    },
}

impl KeyDataConfig {
    /// Record for an unprotected key
    #[must_use]
    pub fn unlocked(private_key: &PrivateKey) -> Self {
        Self::Unlocked {
            value: private_key.encode_to_base64(),
        }
    }

    /// Record for a sealed key
    #[must_use]
    pub fn locked(private_key_data: LockedPrivateKey) -> Self {
        Self::Locked { private_key_data }
    }

    /// Locked or unlocked
    #[must_use]
    pub fn key_type(&self) -> PrivateKeyType {
        match self {
            Self::Locked { .. } => PrivateKeyType::Locked,
            Self::Unlocked { .. } => PrivateKeyType::Unlocked,
        }
    }

    /// Parse a key file's contents
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Serialization`] if the JSON does not describe key data
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize for writing to a key file
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Serialization`] if serialization fails
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
