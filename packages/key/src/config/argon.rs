//! Argon2 key derivation parameters

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Argon2 variant used to derive the secretbox key from a password
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArgonAlgorithm {
    /// Argon2i, data-independent memory access
    #[default]
    #[serde(rename = "i")]
    Argon2i,
    /// Argon2d, data-dependent memory access
    #[serde(rename = "d")]
    Argon2d,
    /// Argon2id hybrid
    #[serde(rename = "id")]
    Argon2id,
}

impl ArgonAlgorithm {
    /// Short name as written in key files
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Argon2i => "i",
            Self::Argon2d => "d",
            Self::Argon2id => "id",
        }
    }
}

impl fmt::Display for ArgonAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArgonAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "i" | "argon2i" => Ok(Self::Argon2i),
            "d" | "argon2d" => Ok(Self::Argon2d),
            "id" | "argon2id" => Ok(Self::Argon2id),
            other => Err(format!(
                "unknown argon algorithm '{other}', expected one of: i, d, id"
            )),
        }
    }
}

/// KDF parameters stored alongside every locked private key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgonOptions {
    /// Argon2 variant
    #[serde(default)]
    pub algorithm: ArgonAlgorithm,
    /// Time cost
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Memory cost in KiB
    #[serde(default = "default_memory")]
    pub memory: u32,
    /// Lanes
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_iterations() -> u32 {
    10
}

fn default_memory() -> u32 {
    1_048_576 // 1 GiB
}

fn default_parallelism() -> u32 {
    4
}

impl ArgonOptions {
    /// Build options from explicit values
    #[must_use]
    pub fn new(algorithm: ArgonAlgorithm, iterations: u32, memory: u32, parallelism: u32) -> Self {
        Self {
            algorithm,
            iterations,
            memory,
            parallelism,
        }
    }
}

impl Default for ArgonOptions {
    fn default() -> Self {
        Self {
            algorithm: ArgonAlgorithm::default(),
            iterations: default_iterations(),
            memory: default_memory(),
            parallelism: default_parallelism(),
        }
    }
}
