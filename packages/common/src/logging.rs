//! Structured logging infrastructure
//!
//! `env_logger` backs the standard `log` facade. Anything that could identify a
//! secret (vault secret names, key file paths) is hashed before it is logged.

use log::{debug, error, info, warn};
use sha2::{Digest, Sha256};
use std::sync::Once;
use std::time::{SystemTime, UNIX_EPOCH};

static INIT_LOGGER: Once = Once::new();

/// Logging bootstrap and key-operation log helpers
pub struct LoggingTransformer;

impl LoggingTransformer {
    /// Initialize logging (call once at application startup)
    ///
    /// Levels come from `RUST_LOG`, e.g. `RUST_LOG=keysmith_key=debug`.
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            env_logger::Builder::from_default_env()
                .format_timestamp_micros()
                .init();

            debug!("Structured logging initialized");
        });
    }

    /// Initialize logging for tests without clashing with other test threads
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Log a key file operation against a hashed path
    pub fn log_key_file_operation(operation: &str, path: &str, success: bool) {
        let path_hash = Self::secure_hash_key(path);
        if success {
            info!("Key file operation succeeded: {operation} (path_hash: {path_hash})");
        } else {
            warn!("Key file operation failed: {operation} (path_hash: {path_hash})");
        }
    }

    /// Log a remote vault write with the secret name hashed
    pub fn log_vault_operation(backend: &str, operation: &str, secret_name: &str, success: bool) {
        let name_hash = Self::secure_hash_key(secret_name);
        if success {
            info!("Vault operation succeeded: {backend} {operation} (secret_hash: {name_hash})");
        } else {
            warn!("Vault operation failed: {backend} {operation} (secret_hash: {name_hash})");
        }
    }

    /// Log a cryptographic failure by error type only
    pub fn log_crypto_error(operation: &str, error: &dyn std::error::Error) {
        error!(
            "Cryptographic operation failed: {} (error_type: {})",
            operation,
            std::any::type_name_of_val(error)
        );
    }

    /// First 12 hex characters of the SHA-256 of `key`, prefixed with `#`
    fn secure_hash_key(key: &str) -> String {
        let hash = Sha256::digest(key.as_bytes());
        let hex_hash = format!("{hash:x}");
        format!("#{}", &hex_hash[..12])
    }
}

/// Logs a security-relevant event with standardized formatting
///
/// # Parameters
/// * `event_type` - Type of security event (e.g., "KEY_GENERATED", "KEY_PASSWORD_UPDATE")
/// * `details` - Additional details about the event
/// * `success` - Whether the operation was successful
pub fn log_security_event(event_type: &str, details: &str, success: bool) {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    if success {
        info!("[{timestamp}] SUCCESS - {event_type}: {details}");
    } else {
        warn!("[{timestamp}] FAILURE - {event_type}: {details}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_key_hashing() {
        LoggingTransformer::init_test();

        let hash1 = LoggingTransformer::secure_hash_key("/keys/node1.key");
        let hash2 = LoggingTransformer::secure_hash_key("/keys/node2.key");

        assert_ne!(hash1, hash2);
        assert_eq!(hash1, LoggingTransformer::secure_hash_key("/keys/node1.key"));
        assert!(hash1.starts_with('#'));
        assert_eq!(hash1.len(), 13);
    }

    #[test]
    fn test_logging_operations() {
        LoggingTransformer::init_test();

        LoggingTransformer::log_key_file_operation("write", "node.key", true);
        LoggingTransformer::log_vault_operation("aws", "create_secret", "nodeKey", false);
        log_security_event("KEY_GENERATED", "file target", true);
    }
}
