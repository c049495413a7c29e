//! Changing the password protecting an existing private key file

use crate::config::ArgonOptions;
use crate::encryptor::KeyEncryptor;
use crate::key_data::{KeyDataConfig, PrivateKeyType};
use crate::key_file::{read_key_file, replace_key_file};
use crate::key_pair::PrivateKey;
use crate::passwords::{PasswordReader, candidate_passwords};
use crate::{KeyError, Result};
use keysmith_common::{LoggingTransformer, log_security_event};
use std::fmt;
use std::path::PathBuf;

/// Inputs to a password update
#[derive(Debug, Clone)]
pub struct KeyPasswordUpdate {
    /// Key file to rewrite in place
    pub private_key_path: PathBuf,
    /// Current password, tried alone when present
    pub password: Option<String>,
    /// File of candidate passwords, one per line
    pub password_file: Option<PathBuf>,
    /// KDF parameters for the re-locked key
    pub argon_options: ArgonOptions,
}

/// Successful password update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyUpdateOutcome {
    /// Rewritten key file
    pub private_key_path: PathBuf,
    /// Protection now applied to it
    pub key_type: PrivateKeyType,
}

impl fmt::Display for KeyUpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Private key at {} updated.",
            self.private_key_path.display()
        )
    }
}

/// Recover the raw private key from stored key data
///
/// Unlocked data is decoded as is. Locked data is tried against each
/// candidate in order and the first that opens it wins.
///
/// # Errors
///
/// Returns [`KeyError::NoValidPassword`] if no candidate opens a locked key,
/// or the encryptor's rejection of the key it recovered
pub fn unlock_private_key(
    key_data: &KeyDataConfig,
    candidates: &[String],
    encryptor: &KeyEncryptor,
) -> Result<PrivateKey> {
    match key_data {
        KeyDataConfig::Unlocked { value } => PrivateKey::from_base64(value),
        KeyDataConfig::Locked { private_key_data } => {
            let private_key = candidates
                .iter()
                .find_map(|password| {
                    match encryptor.decrypt_private_key(private_key_data, password) {
                        Ok(key) => Some(key),
                        Err(e) => {
                            log::debug!("Password failed to decrypt ({e}). Trying next if available.");
                            None
                        }
                    }
                })
                .ok_or(KeyError::NoValidPassword)?;
            encryptor.check_private_key(&private_key)?;
            Ok(private_key)
        }
    }
}

/// Re-protect the key at `request.private_key_path` under a new password
///
/// The new password comes from `password_reader`; an empty answer stores the
/// key unlocked. The file is only replaced once the new contents are fully
/// written.
///
/// # Errors
///
/// Returns [`KeyError::PrivateKeyPathNotFound`] for a missing file,
/// [`KeyError::NoValidPassword`] if a locked key cannot be opened, or any
/// password, encryption or I/O failure
pub async fn update_key_password<P: PasswordReader + ?Sized>(
    request: &KeyPasswordUpdate,
    encryptor: &KeyEncryptor,
    password_reader: &P,
) -> Result<KeyUpdateOutcome> {
    let path = &request.private_key_path;
    if !tokio::fs::try_exists(path).await? {
        return Err(KeyError::PrivateKeyPathNotFound);
    }

    let candidates = candidate_passwords(
        request.password.as_deref(),
        request.password_file.as_deref(),
    )
    .await?;

    let key_data = read_key_file(path).await?;
    let private_key = match unlock_private_key(&key_data, &candidates, encryptor) {
        Ok(key) => key,
        Err(e) => {
            log_security_event("KEY_UNLOCK", &e.to_string(), false);
            return Err(e);
        }
    };

    let new_password = password_reader.request_user_password()?;
    let updated = if new_password.is_empty() {
        KeyDataConfig::unlocked(&private_key)
    } else {
        let locked = encryptor
            .encrypt_private_key(&private_key, &new_password, &request.argon_options)
            .inspect_err(|e| LoggingTransformer::log_crypto_error("encrypt_private_key", e))?;
        KeyDataConfig::locked(locked)
    };

    let replaced = replace_key_file(path, &updated).await;
    LoggingTransformer::log_key_file_operation(
        "update_key_password",
        &path.display().to_string(),
        replaced.is_ok(),
    );
    replaced?;

    log_security_event(
        "KEY_PASSWORD_UPDATED",
        &format!("{} -> {}", key_data.key_type(), updated.key_type()),
        true,
    );

    Ok(KeyUpdateOutcome {
        private_key_path: path.clone(),
        key_type: updated.key_type(),
    })
}
