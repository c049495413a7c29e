//! Shared fixtures for keysmith_key integration tests

#![allow(dead_code)]

use keysmith_key::config::{ArgonAlgorithm, ArgonOptions, KeyVaultOptions};
use keysmith_key::{KeyError, KeyPair, KeyVaultService, PasswordReader, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Cheap argon parameters so tests stay fast
pub fn fast_options() -> ArgonOptions {
    ArgonOptions::new(ArgonAlgorithm::Argon2id, 1, 256, 1)
}

/// Answers password prompts from a fixed script
pub struct ScriptedPasswords {
    answers: Mutex<VecDeque<String>>,
}

impl ScriptedPasswords {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.lock().unwrap().len()
    }
}

impl PasswordReader for ScriptedPasswords {
    fn request_user_password(&self) -> Result<String> {
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| KeyError::PasswordRead("no scripted password left".into()))
    }
}

pub type StoredPairs = Arc<Mutex<Vec<(String, KeyPair, Option<KeyVaultOptions>)>>>;

/// In-memory vault recording every stored pair
#[derive(Default)]
pub struct RecordingVault {
    pub stored: StoredPairs,
    pub reject: bool,
}

impl KeyVaultService for RecordingVault {
    fn backend_name(&self) -> &'static str {
        "recording"
    }

    async fn store_key_pair(
        &self,
        name: &str,
        key_pair: &KeyPair,
        options: Option<&KeyVaultOptions>,
    ) -> Result<Vec<String>> {
        if self.reject {
            return Err(KeyError::vault("rejected"));
        }
        self.stored
            .lock()
            .unwrap()
            .push((name.to_string(), key_pair.clone(), options.cloned()));
        Ok(vec![format!("{name}Pub"), format!("{name}Key")])
    }
}
