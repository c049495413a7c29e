//! Vault backend errors

use keysmith_key::KeyError;

/// Failures talking to a remote secret store
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{backend} returned status {status}: {body}")]
    Status {
        backend: &'static str,
        status: u16,
        body: String,
    },
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("{0}")]
    MissingCredentials(String),
    #[error("Hashicorp secret engine path must be provided")]
    MissingSecretEnginePath,
    #[error("Invalid vault URL: {0}")]
    InvalidUrl(String),
    #[error("TLS configuration error: {0}")]
    Tls(String),
    #[error("AWS SDK operation error: {0}")]
    SdkOperationError(String),
}

/// Result type for vault operations
pub type VaultResult<T> = Result<T, VaultError>;

impl From<VaultError> for KeyError {
    fn from(err: VaultError) -> Self {
        KeyError::vault(err.to_string())
    }
}
