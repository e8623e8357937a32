//! AnkiConnect client.
//!
//! Talks to the AnkiConnect add-on's local HTTP endpoint using its
//! `{action, version, params}` envelope (protocol version 6). Also carries
//! the bootstrap concerns around the sync itself: health check, launching
//! the Anki app, and making sure the target deck and note type exist.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use vocab_core::error::{Result, SyncError};
use vocab_core::{CardContent, CardSink};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How long to wait for AnkiConnect after launching the app.
const LAUNCH_WAIT: Duration = Duration::from_secs(15);

pub struct AnkiClient {
    client: Client,
    connect_url: String,
    app_path: String,
}

#[derive(Debug, Deserialize)]
struct ConnectResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}

impl AnkiClient {
    pub fn new(connect_url: impl Into<String>, app_path: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            connect_url: connect_url.into(),
            app_path: app_path.into(),
        }
    }

    async fn invoke(&self, action: &str, params: Value) -> Result<Value> {
        let payload = json!({
            "action": action,
            "version": 6,
            "params": params,
        });

        let resp = self
            .client
            .post(&self.connect_url)
            .json(&payload)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| SyncError::Connectivity(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SyncError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        let body: ConnectResponse = resp.json().await.map_err(|e| SyncError::Parse(e.to_string()))?;
        if let Some(error) = body.error {
            return Err(SyncError::Gateway {
                status: status.as_u16(),
                message: format!("AnkiConnect action '{}' failed: {}", action, error),
            });
        }
        Ok(body.result)
    }

    /// True when AnkiConnect answers its `version` action.
    pub async fn health_check(&self) -> bool {
        self.invoke("version", json!({})).await.is_ok()
    }

    /// Launch the Anki desktop app and wait for AnkiConnect to come up.
    /// Only supported on macOS; elsewhere the caller must start Anki itself.
    pub async fn launch_app(&self) -> Result<()> {
        if std::env::consts::OS != "macos" {
            tracing::warn!("Anki auto-launch is only supported on macOS");
            return Err(SyncError::Connectivity(
                "Anki is not running and cannot be auto-launched on this platform".to_string(),
            ));
        }

        tracing::info!("Launching Anki from {}", self.app_path);
        std::process::Command::new("open")
            .arg(&self.app_path)
            .spawn()
            .map_err(|e| SyncError::Connectivity(format!("failed to launch Anki: {}", e)))?;

        tokio::time::sleep(LAUNCH_WAIT).await;
        Ok(())
    }

    /// Create the deck if Anki doesn't have it yet.
    pub async fn ensure_deck(&self, deck: &str) -> Result<()> {
        let names: Vec<String> = from_result(self.invoke("deckNames", json!({})).await?)?;
        if names.iter().any(|n| n == deck) {
            return Ok(());
        }

        tracing::info!("Deck '{}' not found; creating it", deck);
        self.invoke("createDeck", json!({ "deck": deck })).await?;
        Ok(())
    }

    /// Whether the note type exists. Note types are never auto-created; a
    /// missing one is for the user to fix in Anki.
    pub async fn model_exists(&self, model: &str) -> Result<bool> {
        let names: Vec<String> = from_result(self.invoke("modelNames", json!({})).await?)?;
        Ok(names.iter().any(|n| n == model))
    }
}

fn from_result<T: serde::de::DeserializeOwned>(result: Value) -> Result<T> {
    serde_json::from_value(result).map_err(|e| SyncError::Parse(e.to_string()))
}

/// Build a `findNotes` query matching the front field in one deck. Anki's
/// search is case-insensitive, which gives us the duplicate-check semantics
/// for free.
fn find_query(deck: &str, front: &str) -> String {
    format!(r#"deck:"{}" "Front:{}""#, deck, front.replace('"', "\\\""))
}

/// Build the `addNote` params for a rendered card.
fn note_params(deck: &str, model: &str, card: &CardContent) -> Value {
    json!({
        "note": {
            "deckName": deck,
            "modelName": model,
            "fields": {
                "Front": card.front,
                "Back": card.back,
            },
            "options": {
                "allowDuplicate": false,
            },
            "tags": card.tags,
        }
    })
}

#[async_trait]
impl CardSink for AnkiClient {
    async fn find_card(&self, deck: &str, front: &str) -> Result<Option<i64>> {
        let params = json!({ "query": find_query(deck, front) });
        let ids: Vec<i64> = from_result(self.invoke("findNotes", params).await?)?;
        Ok(ids.first().copied())
    }

    async fn create_card(&self, deck: &str, model: &str, card: &CardContent) -> Result<i64> {
        let result = self.invoke("addNote", note_params(deck, model, card)).await?;
        result.as_i64().ok_or_else(|| SyncError::Parse(format!(
            "addNote returned a non-numeric note id: {}",
            result
        )))
    }
}
