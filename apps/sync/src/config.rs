//! Environment-driven configuration.

use anyhow::{bail, Result};

/// Everything the job needs, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub readwise_token: String,
    pub anki_deck_name: String,
    pub anki_model_name: String,
    pub anki_connect_url: String,
    pub anki_app_path: String,
    pub last_run_file: String,
}

impl Config {
    /// Read configuration from the environment (a `.env` file is loaded by
    /// the caller beforehand).
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            readwise_token: required("READWISE_API_TOKEN")?,
            anki_deck_name: required("ANKI_DECK_NAME")?,
            anki_model_name: required("ANKI_MODEL_NAME")?,
            anki_connect_url: optional("ANKI_CONNECT_URL", "http://127.0.0.1:8765"),
            anki_app_path: optional("ANKI_APP_PATH", "/Applications/Anki.app"),
            last_run_file: optional("LAST_RUN_FILE", ".last_run"),
        })
    }
}

fn required(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => bail!("{} is required", name),
    }
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
