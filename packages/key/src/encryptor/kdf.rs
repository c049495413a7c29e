//! Argon2 password key derivation

use crate::config::{ArgonAlgorithm, ArgonOptions};
use crate::{KeyError, Result};
use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroizing;

/// Salt length in bytes
pub(crate) const SALT_LENGTH: usize = 16;

/// Derived secretbox key length in bytes
pub(crate) const DERIVED_KEY_LENGTH: usize = 32;

/// Derive the symmetric sealing key for `password`
///
/// # Errors
///
/// Returns [`KeyError::KeyDerivation`] for zero or out-of-range parameters
/// (memory must be at least 8 KiB per lane) or an unusable salt
pub(crate) fn derive_key(
    password: &[u8],
    salt: &[u8],
    options: &ArgonOptions,
) -> Result<Zeroizing<[u8; DERIVED_KEY_LENGTH]>> {
    let params = Params::new(
        options.memory,
        options.iterations,
        options.parallelism,
        Some(DERIVED_KEY_LENGTH),
    )
    .map_err(|e| KeyError::KeyDerivation(format!("Invalid Argon2 parameters: {e}")))?;

    let argon2 = Argon2::new(variant(options.algorithm), Version::V0x13, params);

    let mut output = Zeroizing::new([0u8; DERIVED_KEY_LENGTH]);
    argon2
        .hash_password_into(password, salt, &mut *output)
        .map_err(|e| KeyError::KeyDerivation(format!("Argon2 key derivation failed: {e}")))?;

    Ok(output)
}

fn variant(algorithm: ArgonAlgorithm) -> Algorithm {
    match algorithm {
        ArgonAlgorithm::Argon2i => Algorithm::Argon2i,
        ArgonAlgorithm::Argon2d => Algorithm::Argon2d,
        ArgonAlgorithm::Argon2id => Algorithm::Argon2id,
    }
}
