//! XChaCha20-Poly1305 sealing of private key bytes

use super::kdf::DERIVED_KEY_LENGTH;
use crate::{KeyError, Result};
use chacha20poly1305::{
    Key, XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit},
};
use zeroize::Zeroizing;

/// Nonce length in bytes
pub(crate) const NONCE_LENGTH: usize = 24;

/// Seal `plaintext` under `key`
pub(crate) fn seal(
    plaintext: &[u8],
    key: &[u8; DERIVED_KEY_LENGTH],
    nonce: &[u8; NONCE_LENGTH],
) -> Result<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(Key::from_slice(key));

    cipher
        .encrypt(XNonce::from_slice(nonce), plaintext)
        .map_err(|_| KeyError::Encryption("Private key encryption failed".into()))
}

/// Open a sealed box; fails on a wrong key or any tampering
pub(crate) fn open(
    ciphertext: &[u8],
    key: &[u8; DERIVED_KEY_LENGTH],
    nonce: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    if nonce.len() != NONCE_LENGTH {
        return Err(KeyError::Decryption(format!(
            "Invalid nonce length: expected {NONCE_LENGTH}, got {}",
            nonce.len()
        )));
    }

    let cipher = XChaCha20Poly1305::new(Key::from_slice(key));

    cipher
        .decrypt(XNonce::from_slice(nonce), ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| KeyError::Decryption("Private key decryption failed".into()))
}
