//! CLI command definitions

use crate::options::{EncryptorArgs, KdfArgs, KeyUpdateKdfArgs, VaultCliArgs};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "keysmith")]
#[command(about = "Generate and re-protect node identity keys", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Generate identity key pairs
    ///
    /// Each --filename yields one pair. Without a vault the pair is written to
    /// `<filename>.pub` and `<filename>.key`; with a vault the filename is the
    /// secret name. The operator is asked for a password per pair and a blank
    /// answer stores the private key unlocked.
    ///
    /// Example usage:
    ///   keysmith keygen --filename node1 --filename node2
    ///   keysmith keygen --filename node --vault.type AZURE --vault.url https://v.vault.azure.net
    Keygen(KeygenArgs),

    /// Change the password protecting an existing private key file
    ///
    /// The current password is taken from --keys.passwords, or tried line by
    /// line from --keys.passwordFile. The new password is prompted for; a
    /// blank answer stores the key unlocked.
    ///
    /// Example usage:
    ///   keysmith keyupdate --keys.keyData.privateKeyPath node.key --keys.passwordFile pw.txt
    Keyupdate(KeyUpdateArgs),
}

/// Options for `keygen`
#[derive(Debug, Clone, Default, Args)]
pub struct KeygenArgs {
    /// Base path or vault secret name for a generated pair; repeatable
    #[arg(long = "filename", value_name = "NAME")]
    pub filenames: Vec<String>,

    /// JSON file with argon options for locking new keys
    #[arg(long = "keygenconfig", value_name = "FILE")]
    pub keygen_config: Option<PathBuf>,

    #[command(flatten)]
    pub kdf: KdfArgs,

    #[command(flatten)]
    pub vault: VaultCliArgs,

    #[command(flatten)]
    pub encryptor: EncryptorArgs,

    /// Node config file
    #[arg(long = "configfile", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Where to write the node config with the new key pairs added
    #[arg(long = "configout", value_name = "FILE")]
    pub config_out: Option<PathBuf>,
}

/// Options for `keyupdate`
#[derive(Debug, Clone, Default, Args)]
pub struct KeyUpdateArgs {
    /// Private key file to update
    #[arg(long = "keys.keyData.privateKeyPath", value_name = "FILE", required = true)]
    pub private_key_path: PathBuf,

    /// Current password of the key
    #[arg(long = "keys.passwords", value_name = "PASSWORD")]
    pub password: Option<String>,

    /// File of candidate passwords, one per line
    #[arg(long = "keys.passwordFile", value_name = "FILE")]
    pub password_file: Option<PathBuf>,

    #[command(flatten)]
    pub kdf: KeyUpdateKdfArgs,

    #[command(flatten)]
    pub encryptor: EncryptorArgs,

    /// Node config file, consulted for its encryptor
    #[arg(long = "configfile", value_name = "FILE")]
    pub config_file: Option<PathBuf>,
}
