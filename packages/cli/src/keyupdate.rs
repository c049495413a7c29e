//! `keyupdate` command

use crate::commands::KeyUpdateArgs;
use crate::options::KdfArgs;
use crate::outcome::{CliError, CliResult};
use keysmith_key::config::{ArgonOptions, NodeConfig, try_resolve_encryptor_config};
use keysmith_key::{KeyEncryptorFactory, KeyPasswordUpdate, PasswordReader, update_key_password};

/// Re-protect the key at `--keys.keyData.privateKeyPath`
///
/// # Errors
///
/// Returns a CLI error for an unsupported `--encryptor.type` when the config
/// file names no encryptor, or any failure from the update itself
pub async fn run_keyupdate<P: PasswordReader>(
    args: &KeyUpdateArgs,
    password_reader: &P,
) -> Result<CliResult, CliError> {
    let config = args
        .config_file
        .as_ref()
        .map(NodeConfig::load)
        .transpose()?;

    let encryptor_config = try_resolve_encryptor_config(
        config.as_ref().and_then(|c| c.encryptor.as_ref()),
        || args.encryptor.parse_encryptor_config(),
    )?;
    let encryptor = KeyEncryptorFactory::create(encryptor_config.as_ref());

    let request = KeyPasswordUpdate {
        private_key_path: args.private_key_path.clone(),
        password: args.password.clone(),
        password_file: args.password_file.clone(),
        argon_options: KdfArgs::from(&args.kdf).apply(ArgonOptions::default()),
    };

    let outcome = update_key_password(&request, &encryptor, password_reader).await?;
    println!("{outcome}");

    Ok(CliResult::success(config))
}
