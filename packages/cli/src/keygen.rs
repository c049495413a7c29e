//! `keygen` command

use crate::commands::KeygenArgs;
use crate::outcome::{CliError, CliResult};
use keysmith_key::config::{NodeConfig, resolve_key_vault_config, try_resolve_encryptor_config};
use keysmith_key::{
    ConfigError, FileKeyGenerator, KeyEncryptorFactory, KeyGenerator, KeyLocation,
    PasswordReader, VaultKeyGenerator,
};
use keysmith_vault::create_key_vault_service;

const CONFIG_OUT_WITHOUT_CONFIG: &str = "--configout requires --configfile";

/// Generate one key pair per `--filename`
///
/// # Errors
///
/// Returns configuration errors before any key is generated, then the first
/// generation failure
pub async fn run_keygen<P: PasswordReader>(
    args: &KeygenArgs,
    password_reader: P,
) -> Result<CliResult, CliError> {
    if args.config_out.is_some() && args.config_file.is_none() {
        return Err(ConfigError::cli(CONFIG_OUT_WITHOUT_CONFIG).into());
    }

    let mut config = args
        .config_file
        .as_ref()
        .map(NodeConfig::load)
        .transpose()?;

    let encryptor_config = try_resolve_encryptor_config(
        config.as_ref().and_then(|c| c.encryptor.as_ref()),
        || args.encryptor.parse_encryptor_config(),
    )?;
    let encryptor = KeyEncryptorFactory::create(encryptor_config.as_ref());

    let kdf = args.kdf.resolve(args.keygen_config.as_deref()).await?;
    let vault_config = resolve_key_vault_config(&args.vault.to_vault_args(), args.filenames.len())?;
    let vault_options = args.vault.vault_options();

    let targets = if args.filenames.is_empty() {
        vec![String::new()]
    } else {
        args.filenames.clone()
    };

    let generator = match &vault_config {
        Some(vault_config) => KeyGenerator::Vault(VaultKeyGenerator::new(
            encryptor,
            create_key_vault_service(vault_config).await?,
        )),
        None => KeyGenerator::File(FileKeyGenerator::new(encryptor, password_reader)),
    };

    let generated = generator
        .generate_all(&targets, kdf.as_ref(), vault_options.as_ref())
        .await?;
    log::info!("Generated {} key pair(s)", generated.len());

    if let (Some(config), Some(out)) = (config.as_mut(), &args.config_out) {
        for key in &generated {
            if let KeyLocation::Files(paths) = &key.location {
                config.add_key_pair(paths)?;
            }
        }
        config.validate()?;
        config.save(out)?;
        log::info!("Updated config written to {}", out.display());
    }

    Ok(CliResult::success(config))
}
