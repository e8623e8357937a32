//! One-shot Readwise → Anki vocabulary sync job.

pub mod anki;
pub mod config;
pub mod readwise;

use anyhow::{bail, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vocab_core::{FileStateStore, SyncRunner};

use crate::anki::AnkiClient;
use crate::config::Config;
use crate::readwise::ReadwiseClient;

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Readwise to Anki sync");

    let config = Config::from_env().context("configuration error")?;

    let readwise = ReadwiseClient::new(config.readwise_token.clone());
    let anki = AnkiClient::new(config.anki_connect_url.clone(), config.anki_app_path.clone());

    if !readwise.check_token().await? {
        bail!("Readwise API token is invalid or unauthorized");
    }

    // Anki must be up before any AnkiConnect call; try launching it once.
    if !anki.health_check().await {
        tracing::info!("AnkiConnect is not responding; attempting to launch Anki");
        anki.launch_app().await?;
        if !anki.health_check().await {
            bail!("Anki is still not responsive after launch attempt");
        }
    }

    anki.ensure_deck(&config.anki_deck_name)
        .await
        .with_context(|| format!("failed to ensure deck '{}' exists", config.anki_deck_name))?;

    if !anki.model_exists(&config.anki_model_name).await? {
        bail!(
            "Anki note type '{}' does not exist; create it in Anki first",
            config.anki_model_name
        );
    }

    let state = FileStateStore::new(&config.last_run_file);
    let runner = SyncRunner::new(
        readwise,
        anki,
        state,
        config.anki_deck_name,
        config.anki_model_name,
    );

    let report = runner.run().await?;

    tracing::info!(
        "Sync finished: {} fetched, {} created, {} skipped, {} failed",
        report.fetched,
        report.created,
        report.skipped,
        report.failed
    );

    Ok(())
}
