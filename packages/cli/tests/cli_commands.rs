//! End-to-end command tests with scripted passwords

use clap::Parser;
use keysmith_cli::{Cli, CliError, Commands, run};
use keysmith_key::config::{ArgonAlgorithm, ArgonOptions};
use keysmith_key::key_file::read_key_file;
use keysmith_key::{
    KeyDataConfig, KeyEncryptorFactory, KeyError, PasswordReader, PrivateKey, PrivateKeyType,
    Result, unlock_private_key,
};
use std::collections::VecDeque;
use std::sync::Mutex;

struct ScriptedPasswords(Mutex<VecDeque<String>>);

impl ScriptedPasswords {
    fn new(answers: &[&str]) -> Self {
        Self(Mutex::new(answers.iter().map(|a| a.to_string()).collect()))
    }
}

impl PasswordReader for ScriptedPasswords {
    fn request_user_password(&self) -> Result<String> {
        self.0
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| KeyError::PasswordRead("no scripted password left".into()))
    }
}

fn parse(args: &[&str]) -> Commands {
    let mut argv = vec!["keysmith"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap().command
}

#[test]
fn test_dotted_flags_parse() {
    let command = parse(&[
        "keygen",
        "--filename",
        "a",
        "--filename",
        "b",
        "--kdf.algorithm",
        "id",
        "--kdf.memory",
        "2048",
        "--vault.type",
        "HASHICORP",
        "--vault.hashicorp.secretenginepath",
        "secret",
        "--encryptor.type",
        "NACL",
    ]);

    let Commands::Keygen(args) = command else {
        panic!("expected keygen");
    };
    assert_eq!(args.filenames, vec!["a", "b"]);
    assert_eq!(args.kdf.algorithm, Some(ArgonAlgorithm::Argon2id));
    assert_eq!(args.kdf.memory, Some(2048));
    assert_eq!(args.vault.vault_type.as_deref(), Some("HASHICORP"));
    assert_eq!(args.encryptor.encryptor_type.as_deref(), Some("NACL"));
}

#[tokio::test]
async fn test_config_file_encryptor_ignores_bad_encryptor_flag() {
    let dir = tempfile::tempdir().unwrap();
    let config_in = dir.path().join("node.json");
    std::fs::write(&config_in, r#"{"encryptor":{"type":"NACL"}}"#).unwrap();
    let base = dir.path().join("node").display().to_string();

    let command = parse(&[
        "keygen",
        "--filename",
        base.as_str(),
        "--configfile",
        config_in.to_str().unwrap(),
        "--encryptor.type",
        "GARBAGE",
    ]);
    let result = run(&command, ScriptedPasswords::new(&[""])).await.unwrap();

    assert_eq!(result.status, 0);
    assert!(std::path::Path::new(&format!("{base}.key")).exists());
}

#[tokio::test]
async fn test_bad_encryptor_flag_without_config_encryptor_fails() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("node").display().to_string();

    let command = parse(&[
        "keygen",
        "--filename",
        base.as_str(),
        "--encryptor.type",
        "GARBAGE",
    ]);
    let err = run(&command, ScriptedPasswords::new(&[""])).await.unwrap_err();

    assert!(matches!(err, CliError::Config(_)));
    assert_eq!(err.messages(), vec!["unsupported encryptor type 'GARBAGE'"]);
    assert!(!std::path::Path::new(&format!("{base}.key")).exists());
}

#[tokio::test]
async fn test_keygen_writes_files_and_config_out() {
    let dir = tempfile::tempdir().unwrap();
    let config_in = dir.path().join("node.json");
    let config_out = dir.path().join("node-out.json");
    std::fs::write(&config_in, r#"{"server":{"port":9000}}"#).unwrap();
    let base = dir.path().join("node").display().to_string();

    let command = parse(&[
        "keygen",
        "--filename",
        base.as_str(),
        "--configfile",
        config_in.to_str().unwrap(),
        "--configout",
        config_out.to_str().unwrap(),
    ]);
    let result = run(&command, ScriptedPasswords::new(&[""])).await.unwrap();

    assert_eq!(result.status, 0);
    assert!(result.suppress_output);

    let key_data = read_key_file(format!("{base}.key").as_ref()).await.unwrap();
    assert_eq!(key_data.key_type(), PrivateKeyType::Unlocked);

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config_out).unwrap()).unwrap();
    assert_eq!(written["server"]["port"], 9000);
    assert_eq!(
        written["keys"]["keyData"][0]["privateKeyPath"],
        format!("{base}.key")
    );
}

#[tokio::test]
async fn test_keygen_kdf_flags_are_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("node").display().to_string();

    let command = parse(&[
        "keygen",
        "--filename",
        base.as_str(),
        "--kdf.algorithm",
        "id",
        "--kdf.iterations",
        "1",
        "--kdf.memory",
        "256",
        "--kdf.parallelism",
        "1",
    ]);
    run(&command, ScriptedPasswords::new(&["pw"])).await.unwrap();

    match read_key_file(format!("{base}.key").as_ref()).await.unwrap() {
        KeyDataConfig::Locked { private_key_data } => assert_eq!(
            private_key_data.kdf_params,
            ArgonOptions::new(ArgonAlgorithm::Argon2id, 1, 256, 1)
        ),
        other => panic!("expected locked key, got {other:?}"),
    }
}

#[tokio::test]
async fn test_keygen_vault_violations_are_listed() {
    let command = parse(&["keygen", "--vault.type", "AZURE"]);
    let err = run(&command, ScriptedPasswords::new(&[])).await.unwrap_err();

    assert_eq!(err.messages(), vec!["url: may not be null"]);
}

#[tokio::test]
async fn test_keygen_url_without_type_fails() {
    let command = parse(&["keygen", "--vault.url", "https://vault.example.com"]);
    let err = run(&command, ScriptedPasswords::new(&[])).await.unwrap_err();

    assert!(matches!(err, CliError::Config(_)));
    assert_eq!(err.messages().len(), 1);
}

#[tokio::test]
async fn test_keyupdate_unlocks_and_relocks() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("node.key");
    let password_file = dir.path().join("passwords.txt");
    let original = PrivateKey::from_bytes(vec![9; 32]);
    let encryptor = KeyEncryptorFactory::create(None);
    let fast = ArgonOptions::new(ArgonAlgorithm::Argon2id, 1, 256, 1);

    let locked = KeyDataConfig::locked(
        encryptor
            .encrypt_private_key(&original, "correct", &fast)
            .unwrap(),
    );
    std::fs::write(&key_path, locked.to_json().unwrap()).unwrap();
    std::fs::write(&password_file, "wrong\ncorrect\n").unwrap();

    let command = parse(&[
        "keyupdate",
        "--keys.keyData.privateKeyPath",
        key_path.to_str().unwrap(),
        "--keys.passwordFile",
        password_file.to_str().unwrap(),
        "--keys.keyData.config.data.aopts.algorithm",
        "id",
        "--keys.keyData.config.data.aopts.iterations",
        "1",
        "--keys.keyData.config.data.aopts.memory",
        "256",
        "--keys.keyData.config.data.aopts.parallelism",
        "1",
    ]);
    let result = run(&command, ScriptedPasswords::new(&["next"])).await.unwrap();
    assert_eq!(result.status, 0);

    let rewritten = read_key_file(&key_path).await.unwrap();
    assert_eq!(
        unlock_private_key(&rewritten, &["next".to_string()], &encryptor).unwrap(),
        original
    );
}

#[test]
fn test_keyupdate_requires_private_key_path() {
    let err =
        Cli::try_parse_from(["keysmith", "keyupdate", "--keys.passwords", "pw"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}

#[tokio::test]
async fn test_keyupdate_missing_key_file() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("absent.key");

    let command = parse(&[
        "keyupdate",
        "--keys.keyData.privateKeyPath",
        key_path.to_str().unwrap(),
        "--keys.passwords",
        "pw",
    ]);
    let err = run(&command, ScriptedPasswords::new(&[""])).await.unwrap_err();

    assert_eq!(
        err.messages(),
        vec!["Private key path must exist when updating key password"]
    );
}
