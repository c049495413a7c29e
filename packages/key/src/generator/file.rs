//! Key generation to local files

use super::{GeneratedKey, KeyLocation};
use crate::config::{ArgonOptions, KeyPairPaths};
use crate::encryptor::KeyEncryptor;
use crate::key_data::KeyDataConfig;
use crate::key_file::write_new_file;
use crate::passwords::PasswordReader;
use crate::{KeyError, Result};
use keysmith_common::{LoggingTransformer, log_security_event};
use std::path::Path;

/// Writes `{target}.pub` and `{target}.key`
///
/// The operator is asked for a password per pair. An empty answer with no
/// explicit KDF options stores the key unlocked; anything else locks it.
#[derive(Debug)]
pub struct FileKeyGenerator<P> {
    encryptor: KeyEncryptor,
    password_reader: P,
}

impl<P: PasswordReader> FileKeyGenerator<P> {
    /// Create a generator prompting through `password_reader`
    pub fn new(encryptor: KeyEncryptor, password_reader: P) -> Self {
        Self {
            encryptor,
            password_reader,
        }
    }

    /// Generate one pair under the `target` base path
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::KeyFileExists`] if either output file is already
    /// present, or any password, encryption or I/O failure
    pub async fn generate(&self, target: &str, kdf: Option<&ArgonOptions>) -> Result<GeneratedKey> {
        let paths = KeyPairPaths::for_base(target);
        for path in [&paths.public_key_path, &paths.private_key_path] {
            if tokio::fs::try_exists(path).await? {
                return Err(KeyError::KeyFileExists(path.display().to_string()));
            }
        }

        let key_pair = self.encryptor.generate_key_pair();
        let password = self.password_reader.request_user_password()?;

        let key_data = match (kdf, password.is_empty()) {
            (None, true) => KeyDataConfig::unlocked(&key_pair.private_key),
            (Some(options), _) => KeyDataConfig::locked(
                self.encryptor
                    .encrypt_private_key(&key_pair.private_key, &password, options)?,
            ),
            (None, false) => KeyDataConfig::locked(self.encryptor.encrypt_private_key(
                &key_pair.private_key,
                &password,
                &ArgonOptions::default(),
            )?),
        };

        if let Some(parent) = paths.private_key_path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let public = key_pair.public_key.encode_to_base64();
        let private = key_data.to_json()?;
        write_new_file(&paths.public_key_path, public.as_bytes(), false).await?;
        let written = write_new_file(&paths.private_key_path, private.as_bytes(), true).await;
        log_written(&paths.private_key_path, written.is_ok());
        if let Err(e) = written {
            // the public half is useless without its private key
            if let Err(cleanup) = tokio::fs::remove_file(&paths.public_key_path).await {
                log::warn!("Failed to remove orphaned public key file: {cleanup}");
            }
            return Err(e);
        }

        log_security_event(
            "KEY_GENERATED",
            &format!("{} key pair written", key_data.key_type()),
            true,
        );

        Ok(GeneratedKey {
            public_key: key_pair.public_key,
            location: KeyLocation::Files(paths),
        })
    }
}

fn log_written(path: &Path, success: bool) {
    LoggingTransformer::log_key_file_operation(
        "write_private_key",
        &path.display().to_string(),
        success,
    );
}
