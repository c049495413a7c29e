//! Hashicorp Vault backend (KV version 2 secret engine)

use crate::error::{VaultError, VaultResult};
use keysmith_key::KeyPair;
use keysmith_key::config::{HashicorpKeyVaultConfig, KeyVaultOptions};
use reqwest::{Certificate, Client, Identity};
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use url::Url;
use zeroize::Zeroizing;

const ROLE_ID_VAR: &str = "HASHICORP_ROLE_ID";
const SECRET_ID_VAR: &str = "HASHICORP_SECRET_ID";
const TOKEN_VAR: &str = "HASHICORP_TOKEN";
const TOKEN_HEADER: &str = "X-Vault-Token";

/// How to obtain a Vault token
#[derive(Clone)]
pub enum HashicorpAuth {
    /// Pre-issued token
    Token(Zeroizing<String>),
    /// AppRole login
    AppRole {
        /// Role identifier
        role_id: String,
        /// Secret identifier
        secret_id: Zeroizing<String>,
    },
}

impl std::fmt::Debug for HashicorpAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(_) => f.write_str("Token(..)"),
            Self::AppRole { role_id, .. } => write!(f, "AppRole({role_id})"),
        }
    }
}

impl HashicorpAuth {
    /// Pick the auth method from the process environment
    ///
    /// # Errors
    ///
    /// See [`HashicorpAuth::from_lookup`]
    pub fn from_env() -> VaultResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Pick the auth method through `lookup`
    ///
    /// AppRole is used when both role and secret ids are present. Setting
    /// only one of them is an error. Otherwise a token is required.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::MissingCredentials`] when no usable combination
    /// is set
    pub fn from_lookup<F>(lookup: F) -> VaultResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.is_empty());

        match (read(ROLE_ID_VAR), read(SECRET_ID_VAR)) {
            (Some(role_id), Some(secret_id)) => Ok(Self::AppRole {
                role_id,
                secret_id: Zeroizing::new(secret_id),
            }),
            (None, None) => read(TOKEN_VAR)
                .map(|token| Self::Token(Zeroizing::new(token)))
                .ok_or_else(|| {
                    VaultError::MissingCredentials(format!(
                        "{TOKEN_VAR} environment variable must be set"
                    ))
                }),
            _ => Err(VaultError::MissingCredentials(format!(
                "Both {ROLE_ID_VAR} and {SECRET_ID_VAR} environment variables must be set to use the AppRole authentication method"
            ))),
        }
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    auth: LoginAuth,
}

#[derive(Deserialize)]
struct LoginAuth {
    client_token: String,
}

/// Writes key pairs to a Hashicorp Vault KV v2 engine
#[derive(Debug, Clone)]
pub struct HashicorpKeyVaultService {
    client: Client,
    base_url: Url,
    approle_path: String,
    auth: HashicorpAuth,
}

impl HashicorpKeyVaultService {
    /// Create a service for `config`, loading any TLS material it names
    ///
    /// # Errors
    ///
    /// Returns an error for an unparseable URL or unreadable TLS files
    pub fn new(config: &HashicorpKeyVaultConfig, auth: HashicorpAuth) -> VaultResult<Self> {
        let mut base_url =
            Url::parse(&config.url).map_err(|e| VaultError::InvalidUrl(e.to_string()))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("keysmith/", env!("CARGO_PKG_VERSION")));

        if let Some(truststore) = &config.tls_trust_store_path {
            let pem = read_pem(truststore)?;
            let certificate =
                Certificate::from_pem(&pem).map_err(|e| VaultError::Tls(e.to_string()))?;
            builder = builder.add_root_certificate(certificate);
        }
        if let Some(keystore) = &config.tls_key_store_path {
            let pem = read_pem(keystore)?;
            let identity = Identity::from_pem(&pem).map_err(|e| VaultError::Tls(e.to_string()))?;
            builder = builder.identity(identity);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            approle_path: config.approle_path.clone(),
            auth,
        })
    }

    pub(crate) fn endpoint(&self, path: &str) -> VaultResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| VaultError::InvalidUrl(e.to_string()))
    }

    async fn token(&self) -> VaultResult<Zeroizing<String>> {
        let (role_id, secret_id) = match &self.auth {
            HashicorpAuth::Token(token) => return Ok(token.clone()),
            HashicorpAuth::AppRole { role_id, secret_id } => (role_id, secret_id),
        };

        let url = self.endpoint(&format!("v1/auth/{}/login", self.approle_path))?;
        let response = self
            .client
            .post(url)
            .json(&json!({ "role_id": role_id, "secret_id": secret_id.as_str() }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(VaultError::AuthenticationFailed(format!(
                "AppRole login returned status {}",
                response.status()
            )));
        }

        let login: LoginResponse = response.json().await?;
        Ok(Zeroizing::new(login.auth.client_token))
    }

    /// Write both halves to `{secret_engine_path}/data/{name}`
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::MissingSecretEnginePath`] when `options` carries
    /// no engine path, or any login or write failure
    pub async fn save_key_pair(
        &self,
        name: &str,
        key_pair: &KeyPair,
        options: Option<&KeyVaultOptions>,
    ) -> VaultResult<Vec<String>> {
        let engine = options
            .and_then(|o| o.hashicorp_secret_engine_path.as_deref())
            .filter(|p| !p.is_empty())
            .ok_or(VaultError::MissingSecretEnginePath)?
            .trim_matches('/');

        let token = self.token().await?;
        let url = self.endpoint(&format!("v1/{engine}/data/{name}"))?;
        let private_value = Zeroizing::new(key_pair.private_key.encode_to_base64());

        let response = self
            .client
            .post(url)
            .header(TOKEN_HEADER, token.as_str())
            .json(&json!({
                "data": {
                    "publicKey": key_pair.public_key.encode_to_base64(),
                    "privateKey": private_value.as_str(),
                }
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(VaultError::Status {
                backend: "Hashicorp Vault",
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(vec![format!("{engine}/{name}")])
    }
}

fn read_pem(path: &Path) -> VaultResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| VaultError::Tls(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use keysmith_key::KeyEncryptorFactory;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn config(url: &str) -> HashicorpKeyVaultConfig {
        HashicorpKeyVaultConfig {
            url: url.to_string(),
            approle_path: "approle".to_string(),
            tls_key_store_path: None,
            tls_trust_store_path: None,
        }
    }

    #[test]
    fn test_approle_preferred_when_both_ids_set() {
        let auth = HashicorpAuth::from_lookup(lookup(&[
            (ROLE_ID_VAR, "role"),
            (SECRET_ID_VAR, "secret"),
            (TOKEN_VAR, "token"),
        ]))
        .unwrap();
        assert!(matches!(auth, HashicorpAuth::AppRole { role_id, .. } if role_id == "role"));
    }

    #[test]
    fn test_half_configured_approle_is_rejected() {
        let err = HashicorpAuth::from_lookup(lookup(&[(ROLE_ID_VAR, "role"), (TOKEN_VAR, "t")]))
            .unwrap_err();
        assert!(err.to_string().contains("Both HASHICORP_ROLE_ID and HASHICORP_SECRET_ID"));
    }

    #[test]
    fn test_token_required_without_approle() {
        assert!(matches!(
            HashicorpAuth::from_lookup(lookup(&[(TOKEN_VAR, "t")])),
            Ok(HashicorpAuth::Token(_))
        ));
        assert!(HashicorpAuth::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn test_endpoints_keep_base_path() {
        let service = HashicorpKeyVaultService::new(
            &config("https://vault.example.com:8200/proxy"),
            HashicorpAuth::Token(Zeroizing::new("t".into())),
        )
        .unwrap();

        assert_eq!(
            service.endpoint("v1/secret/data/node").unwrap().as_str(),
            "https://vault.example.com:8200/proxy/v1/secret/data/node"
        );
    }

    #[test]
    fn test_unreadable_truststore_is_a_tls_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config("https://vault:8200");
        config.tls_trust_store_path = Some(dir.path().join("missing-ca.pem"));

        let result =
            HashicorpKeyVaultService::new(&config, HashicorpAuth::Token(Zeroizing::new("t".into())));
        assert!(matches!(result, Err(VaultError::Tls(_))));
    }

    #[tokio::test]
    async fn test_secret_engine_path_is_required() {
        let service = HashicorpKeyVaultService::new(
            &config("https://vault:8200"),
            HashicorpAuth::Token(Zeroizing::new("t".into())),
        )
        .unwrap();
        let key_pair = KeyEncryptorFactory::create(None).generate_key_pair();

        let result = service.save_key_pair("node", &key_pair, None).await;
        assert!(matches!(result, Err(VaultError::MissingSecretEnginePath)));
    }
}
