//! Reading and writing private key files

use crate::key_data::KeyDataConfig;
use crate::{KeyError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Owner read/write only
#[cfg(unix)]
const PRIVATE_FILE_MODE: u32 = 0o600;

/// Parse the key data stored at `path`
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not contain key data
pub async fn read_key_file(path: &Path) -> Result<KeyDataConfig> {
    let contents = fs::read_to_string(path).await?;
    KeyDataConfig::from_json(&contents)
}

/// Create `path` with `contents`, refusing to overwrite
///
/// Private files are created owner-only on Unix.
pub(crate) async fn write_new_file(path: &Path, contents: &[u8], private: bool) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    if private {
        restrict_to_owner(&mut options);
    }

    let mut file = options.open(path).await.map_err(|e| {
        if e.kind() == ErrorKind::AlreadyExists {
            KeyError::KeyFileExists(path.display().to_string())
        } else {
            KeyError::Io(e)
        }
    })?;
    file.write_all(contents).await?;
    file.sync_all().await?;
    Ok(())
}

/// Replace the key file at `path` with `key_data`
///
/// The new contents go to a sibling temp file which is then renamed over the
/// original, so a crash leaves either the old or the new key, never a torn
/// one. The original file's permissions are carried over.
///
/// # Errors
///
/// Returns an error if serialization, the temp write or the rename fails
pub async fn replace_key_file(path: &Path, key_data: &KeyDataConfig) -> Result<()> {
    let contents = key_data.to_json()?;
    let permissions = fs::metadata(path).await?.permissions();
    let temp_path = temp_sibling(path);

    let result = async {
        write_new_file(&temp_path, contents.as_bytes(), true).await?;
        fs::set_permissions(&temp_path, permissions).await?;
        fs::rename(&temp_path, path).await?;
        Ok(())
    }
    .await;

    if result.is_err() {
        let _ = fs::remove_file(&temp_path).await;
    }
    result
}

#[cfg(unix)]
fn restrict_to_owner(options: &mut OpenOptions) {
    options.mode(PRIVATE_FILE_MODE);
}

#[cfg(not(unix))]
fn restrict_to_owner(_options: &mut OpenOptions) {}

fn temp_sibling(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4()))
}
