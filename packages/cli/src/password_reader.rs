//! Operator password prompt

use dialoguer::{Password, theme::ColorfulTheme};
use keysmith_key::{KeyError, PasswordReader, Result};
use std::io::{BufRead, IsTerminal};

/// Prompts on the terminal, or reads one line from stdin when piped
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePasswordReader;

impl PasswordReader for ConsolePasswordReader {
    fn request_user_password(&self) -> Result<String> {
        if !std::io::stdin().is_terminal() {
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .map_err(|e| KeyError::PasswordRead(e.to_string()))?;
            return Ok(line.trim_end_matches(['\r', '\n']).to_string());
        }

        Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Enter a password if you want to lock the private key or leave blank")
            .with_confirmation(
                "Please re-enter the password (or lack of) to confirm",
                "Passwords do not match",
            )
            .allow_empty_password(true)
            .interact()
            .map_err(|e| KeyError::PasswordRead(e.to_string()))
    }
}
