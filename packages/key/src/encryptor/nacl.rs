//! Curve25519 identity key pairs

use crate::key_pair::{KEY_LENGTH, KeyPair, PrivateKey, PublicKey};
use crate::{KeyError, Result};
use rand::RngCore;
use x25519_dalek::StaticSecret;
use zeroize::Zeroizing;

pub(crate) fn generate_key_pair() -> KeyPair {
    let mut seed = Zeroizing::new([0u8; KEY_LENGTH]);
    rand::rng().fill_bytes(&mut *seed);

    let secret = StaticSecret::from(*seed);
    let public = x25519_dalek::PublicKey::from(&secret);

    KeyPair {
        public_key: PublicKey::from_bytes(public.as_bytes().to_vec()),
        private_key: PrivateKey::from_bytes(secret.to_bytes().to_vec()),
    }
}

pub(crate) fn check_private_key(private_key: &PrivateKey) -> Result<()> {
    let actual = private_key.bytes().len();
    if actual != KEY_LENGTH {
        return Err(KeyError::InvalidKeySize {
            expected: KEY_LENGTH,
            actual,
        });
    }
    Ok(())
}
