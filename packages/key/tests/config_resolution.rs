//! Encryptor and key vault config resolution

use keysmith_key::config::{
    EncryptorConfig, EncryptorType, KeyVaultConfig, KeyVaultType, NodeConfig, VaultArgs,
    resolve_encryptor_config, resolve_key_vault_config, try_resolve_encryptor_config,
};
use keysmith_key::ConfigError;
use std::cell::Cell;

#[test]
fn test_encryptor_from_config_file_skips_cli_parse() {
    let from_file = EncryptorConfig::new(EncryptorType::Nacl);
    let calls = Cell::new(0);

    let resolved = resolve_encryptor_config(Some(&from_file), || {
        calls.set(calls.get() + 1);
        None
    });

    assert_eq!(resolved, Some(from_file));
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_encryptor_falls_back_to_cli_once() {
    let calls = Cell::new(0);

    let resolved = resolve_encryptor_config(None, || {
        calls.set(calls.get() + 1);
        Some(EncryptorConfig::new(EncryptorType::Nacl))
    });

    assert_eq!(resolved.map(|c| c.encryptor_type), Some(EncryptorType::Nacl));
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_encryptor_absent_everywhere() {
    assert_eq!(resolve_encryptor_config(None, || None), None);
}

#[test]
fn test_failing_cli_parse_is_skipped_when_config_has_encryptor() {
    let from_file = EncryptorConfig::new(EncryptorType::Nacl);

    let resolved = try_resolve_encryptor_config(Some(&from_file), || {
        Err(ConfigError::cli("unsupported encryptor type 'GARBAGE'"))
    });

    assert_eq!(resolved.unwrap(), Some(from_file));
}

#[test]
fn test_failing_cli_parse_surfaces_without_config_encryptor() {
    let resolved = try_resolve_encryptor_config(None, || {
        Err(ConfigError::cli("unsupported encryptor type 'GARBAGE'"))
    });

    assert!(matches!(resolved, Err(ConfigError::Cli(_))));
}

#[test]
fn test_no_vault_arguments_means_files() {
    let resolved = resolve_key_vault_config(&VaultArgs::default(), 0).unwrap();
    assert_eq!(resolved, None);
}

#[test]
fn test_url_without_type_is_rejected() {
    let args = VaultArgs {
        vault_url: Some("https://vault.example.com".into()),
        ..VaultArgs::default()
    };

    let err = resolve_key_vault_config(&args, 1).unwrap_err();
    assert!(matches!(err, ConfigError::Cli(msg) if msg.contains("Key vault type")));
}

#[test]
fn test_azure_requires_url() {
    let args = VaultArgs {
        vault_type: Some(KeyVaultType::Azure),
        ..VaultArgs::default()
    };

    let err = resolve_key_vault_config(&args, 0).unwrap_err();
    let violations = err.violations();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].to_string(), "url: may not be null");
}

#[test]
fn test_azure_with_url() {
    let args = VaultArgs {
        vault_type: Some(KeyVaultType::Azure),
        vault_url: Some("https://my-vault.vault.azure.net".into()),
        ..VaultArgs::default()
    };

    match resolve_key_vault_config(&args, 0).unwrap() {
        Some(KeyVaultConfig::Azure(config)) => {
            assert_eq!(config.url, "https://my-vault.vault.azure.net");
        }
        other => panic!("unexpected resolution {other:?}"),
    }
}

#[test]
fn test_hashicorp_needs_a_filename_before_anything_else() {
    let args = VaultArgs {
        vault_type: Some(KeyVaultType::Hashicorp),
        ..VaultArgs::default()
    };

    let err = resolve_key_vault_config(&args, 0).unwrap_err();
    assert!(matches!(err, ConfigError::Cli(msg) if msg.contains("-filename")));
}

#[test]
fn test_hashicorp_reports_all_violations_together() {
    let dir = tempfile::tempdir().unwrap();
    let args = VaultArgs {
        vault_type: Some(KeyVaultType::Hashicorp),
        hashicorp_tls_keystore: Some(dir.path().join("missing-identity.pem")),
        hashicorp_tls_truststore: Some(dir.path().join("missing-ca.pem")),
        ..VaultArgs::default()
    };

    let err = resolve_key_vault_config(&args, 1).unwrap_err();
    let fields: Vec<_> = err.violations().iter().map(|v| v.field.as_str()).collect();
    assert_eq!(fields, vec!["url", "tlsKeyStorePath", "tlsTrustStorePath"]);
}

#[test]
fn test_hashicorp_with_existing_tls_files() {
    let identity = tempfile::NamedTempFile::new().unwrap();
    let ca = tempfile::NamedTempFile::new().unwrap();
    let args = VaultArgs {
        vault_type: Some(KeyVaultType::Hashicorp),
        vault_url: Some("https://vault:8200".into()),
        hashicorp_approle_path: Some("custom-approle".into()),
        hashicorp_tls_keystore: Some(identity.path().to_path_buf()),
        hashicorp_tls_truststore: Some(ca.path().to_path_buf()),
    };

    match resolve_key_vault_config(&args, 2).unwrap() {
        Some(KeyVaultConfig::Hashicorp(config)) => {
            assert_eq!(config.url, "https://vault:8200");
            assert_eq!(config.approle_path, "custom-approle");
            assert_eq!(config.tls_key_store_path.as_deref(), Some(identity.path()));
            assert_eq!(config.tls_trust_store_path.as_deref(), Some(ca.path()));
        }
        other => panic!("unexpected resolution {other:?}"),
    }
}

#[test]
fn test_aws_endpoint_is_optional_but_validated() {
    let without_endpoint = VaultArgs {
        vault_type: Some(KeyVaultType::Aws),
        ..VaultArgs::default()
    };
    assert!(matches!(
        resolve_key_vault_config(&without_endpoint, 0).unwrap(),
        Some(KeyVaultConfig::Aws(config)) if config.endpoint.is_none()
    ));

    let bad_endpoint = VaultArgs {
        vault_type: Some(KeyVaultType::Aws),
        vault_url: Some("secretsmanager.local".into()),
        ..VaultArgs::default()
    };
    let err = resolve_key_vault_config(&bad_endpoint, 0).unwrap_err();
    assert_eq!(err.violations()[0].field, "endpoint");
}

#[test]
fn test_hashicorp_missing_tls_files_are_the_only_violations() {
    let dir = tempfile::tempdir().unwrap();
    let args = VaultArgs {
        vault_type: Some(KeyVaultType::Hashicorp),
        vault_url: Some("someurl".into()),
        hashicorp_approle_path: Some("someapprole".into()),
        hashicorp_tls_keystore: Some(dir.path().join("nope-identity.pem")),
        hashicorp_tls_truststore: Some(dir.path().join("nope-ca.pem")),
    };

    let err = resolve_key_vault_config(&args, 1).unwrap_err();
    let messages: Vec<_> = err.violations().iter().map(|v| v.message.as_str()).collect();
    assert_eq!(messages, vec!["File does not exist", "File does not exist"]);
}

#[test]
fn test_aws_endpoint_without_scheme_message() {
    let args = VaultArgs {
        vault_type: Some(KeyVaultType::Aws),
        vault_url: Some("not a valid url".into()),
        ..VaultArgs::default()
    };

    let err = resolve_key_vault_config(&args, 0).unwrap_err();
    let violations = err.violations();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].field, "endpoint");
    assert_eq!(
        violations[0].message,
        "must be a valid AWS service endpoint URL with scheme"
    );
}

#[test]
fn test_node_config_validation_reports_every_problem() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("node.json");
    std::fs::write(
        &config_path,
        r#"{
            "jdbc": {"url": "jdbc:h2:mem:"},
            "keys": {
                "passwordFile": "/definitely/not/here/passwords.txt",
                "passwords": ["inline"],
                "keyData": []
            }
        }"#,
    )
    .unwrap();

    let config = NodeConfig::load(&config_path).unwrap();
    let err = config.validate().unwrap_err();
    let fields: Vec<_> = err.violations().iter().map(|v| v.field.as_str()).collect();

    assert_eq!(
        fields,
        vec!["keys.passwordFile", "keys.passwords", "keys.keyData"]
    );
}
