//! AWS Secrets Manager backend

use crate::error::{VaultError, VaultResult};
use aws_config::BehaviorVersion;
use aws_sdk_secretsmanager::Client;
use keysmith_key::KeyPair;
use keysmith_key::config::AwsKeyVaultConfig;
use zeroize::Zeroizing;

/// Writes key pairs to AWS Secrets Manager
///
/// Credentials and region come from the default provider chain.
#[derive(Debug, Clone)]
pub struct AwsSecretsManagerService {
    client: Client,
}

impl AwsSecretsManagerService {
    /// Load AWS configuration and build the client
    ///
    /// A configured endpoint replaces the regional service endpoint, which is
    /// how local emulators are targeted.
    pub async fn connect(config: &AwsKeyVaultConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        Self {
            client: Client::new(&sdk_config),
        }
    }

    async fn create_secret(&self, secret_name: &str, value: &str) -> VaultResult<String> {
        let output = self
            .client
            .create_secret()
            .name(secret_name)
            .secret_string(value)
            .send()
            .await
            .map_err(|e| VaultError::SdkOperationError(e.to_string()))?;

        Ok(output.arn().unwrap_or(secret_name).to_string())
    }

    /// Create `{name}Pub` and `{name}Key` secrets
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::SdkOperationError`] if either secret cannot be
    /// created, including when it already exists
    pub async fn save_key_pair(&self, name: &str, key_pair: &KeyPair) -> VaultResult<Vec<String>> {
        let public_arn = self
            .create_secret(
                &format!("{name}Pub"),
                &key_pair.public_key.encode_to_base64(),
            )
            .await?;
        let private_value = Zeroizing::new(key_pair.private_key.encode_to_base64());
        let private_arn = self
            .create_secret(&format!("{name}Key"), &private_value)
            .await?;

        Ok(vec![public_arn, private_arn])
    }
}
