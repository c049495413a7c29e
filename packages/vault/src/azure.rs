//! Azure Key Vault backend
//!
//! Authenticates with the OAuth2 client-credentials flow and writes each half
//! of the key pair as its own secret through the Key Vault REST API.

use crate::error::{VaultError, VaultResult};
use keysmith_key::KeyPair;
use keysmith_key::config::AzureKeyVaultConfig;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use zeroize::Zeroizing;

const API_VERSION: &str = "7.4";
const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
const VAULT_SCOPE: &str = "https://vault.azure.net/.default";

const CLIENT_ID_VAR: &str = "AZURE_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "AZURE_CLIENT_SECRET";
const TENANT_ID_VAR: &str = "AZURE_TENANT_ID";
const AUTHORITY_HOST_VAR: &str = "AZURE_AUTHORITY_HOST";

/// Service principal used to obtain vault access tokens
#[derive(Clone)]
pub struct AzureCredentials {
    tenant_id: String,
    client_id: String,
    client_secret: Zeroizing<String>,
    authority_host: String,
}

impl std::fmt::Debug for AzureCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureCredentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("authority_host", &self.authority_host)
            .finish_non_exhaustive()
    }
}

impl AzureCredentials {
    /// Read credentials from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::MissingCredentials`] naming every unset variable
    pub fn from_env() -> VaultResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`, which maps variable names to values
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::MissingCredentials`] naming every unset variable
    pub fn from_lookup<F>(lookup: F) -> VaultResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| lookup(name).filter(|v| !v.is_empty()).ok_or(name);

        match (read(TENANT_ID_VAR), read(CLIENT_ID_VAR), read(CLIENT_SECRET_VAR)) {
            (Ok(tenant_id), Ok(client_id), Ok(client_secret)) => Ok(Self {
                tenant_id,
                client_id,
                client_secret: Zeroizing::new(client_secret),
                authority_host: lookup(AUTHORITY_HOST_VAR)
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| DEFAULT_AUTHORITY_HOST.to_string()),
            }),
            (tenant, client, secret) => {
                let missing: Vec<_> = [tenant.err(), client.err(), secret.err()]
                    .into_iter()
                    .flatten()
                    .collect();
                Err(VaultError::MissingCredentials(format!(
                    "Azure credentials incomplete, set {}",
                    missing.join(", ")
                )))
            }
        }
    }

    fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host.trim_end_matches('/'),
            self.tenant_id
        )
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct SecretBundle {
    id: String,
}

/// Writes key pairs to an Azure Key Vault
#[derive(Debug, Clone)]
pub struct AzureKeyVaultService {
    client: Client,
    vault_url: String,
    credentials: AzureCredentials,
}

impl AzureKeyVaultService {
    /// Create a service for the vault at `config.url`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: &AzureKeyVaultConfig, credentials: AzureCredentials) -> VaultResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("keysmith/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            vault_url: config.url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Secret URL for `secret_name`
    pub(crate) fn secret_url(&self, secret_name: &str) -> String {
        format!(
            "{}/secrets/{secret_name}?api-version={API_VERSION}",
            self.vault_url
        )
    }

    async fn access_token(&self) -> VaultResult<Zeroizing<String>> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("scope", VAULT_SCOPE),
        ];

        let response = self
            .client
            .post(self.credentials.token_url())
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(VaultError::AuthenticationFailed(format!(
                "Azure token endpoint returned status {}",
                response.status()
            )));
        }

        let token: TokenResponse = response.json().await?;
        Ok(Zeroizing::new(token.access_token))
    }

    async fn set_secret(&self, token: &str, secret_name: &str, value: &str) -> VaultResult<String> {
        let response = self
            .client
            .put(self.secret_url(secret_name))
            .bearer_auth(token)
            .json(&json!({ "value": value }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(VaultError::Status {
                backend: "Azure Key Vault",
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let bundle: SecretBundle = response.json().await?;
        Ok(bundle.id)
    }

    /// Store the public and private halves as `{name}Pub` and `{name}Key`
    ///
    /// # Errors
    ///
    /// Returns an error if authentication or either secret write fails
    pub async fn save_key_pair(&self, name: &str, key_pair: &KeyPair) -> VaultResult<Vec<String>> {
        let token = self.access_token().await?;

        let public_id = self
            .set_secret(
                &token,
                &format!("{name}Pub"),
                &key_pair.public_key.encode_to_base64(),
            )
            .await?;
        let private_value = Zeroizing::new(key_pair.private_key.encode_to_base64());
        let private_id = self
            .set_secret(&token, &format!("{name}Key"), &private_value)
            .await?;

        Ok(vec![public_id, private_id])
    }
}
