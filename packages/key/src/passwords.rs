//! Password sources

use crate::Result;
use std::path::Path;

/// Supplies new key passwords, normally by prompting the operator
///
/// An empty password means "store the key unlocked".
pub trait PasswordReader {
    /// Ask for a password
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::PasswordRead`](crate::KeyError::PasswordRead) if no
    /// password could be obtained
    fn request_user_password(&self) -> Result<String>;
}

/// Ordered passwords to try against a locked key
///
/// An explicit password wins; otherwise every line of `password_file` in file
/// order; otherwise nothing.
///
/// # Errors
///
/// Returns an I/O error if the password file cannot be read
pub async fn candidate_passwords(
    password: Option<&str>,
    password_file: Option<&Path>,
) -> Result<Vec<String>> {
    if let Some(password) = password {
        return Ok(vec![password.to_string()]);
    }

    match password_file {
        Some(path) => {
            let contents = tokio::fs::read_to_string(path).await?;
            Ok(contents.lines().map(str::to_string).collect())
        }
        None => Ok(Vec::new()),
    }
}
