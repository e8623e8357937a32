//! Sync orchestrator: one incremental pass from source to sink.

use chrono::Utc;

use crate::error::Result;
use crate::gateway::{CardSink, HighlightSource};
use crate::parser::parse_note;
use crate::state::RunStateStore;
use crate::types::{CardContent, SyncReport};

/// Drives one sync run: fetch the window after the watermark, parse each
/// note, create the cards that don't exist yet, then advance the watermark.
///
/// Per-item sink failures are counted and skipped over; only a failure to
/// list highlights at all aborts the run (leaving the watermark untouched,
/// so the next run retries the same window — the sink's duplicate check
/// makes that rerun safe).
pub struct SyncRunner<S, K, R> {
    source: S,
    sink: K,
    state: R,
    deck: String,
    model: String,
}

impl<S, K, R> SyncRunner<S, K, R>
where
    S: HighlightSource,
    K: CardSink,
    R: RunStateStore,
{
    pub fn new(source: S, sink: K, state: R, deck: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            source,
            sink,
            state,
            deck: deck.into(),
            model: model.into(),
        }
    }

    pub async fn run(&self) -> Result<SyncReport> {
        let since = self.state.load();
        match since {
            Some(ts) => tracing::info!("Fetching highlights updated after {}", ts.to_rfc3339()),
            None => tracing::info!("No watermark; fetching all highlights"),
        }

        let highlights = self.source.list_updated_since(since).await?;

        let mut report = SyncReport {
            fetched: highlights.len(),
            ..SyncReport::default()
        };

        for highlight in &highlights {
            let Some(def) = parse_note(&highlight.note) else {
                tracing::debug!("Highlight {} note is not a definition; skipping", highlight.id);
                report.skipped += 1;
                continue;
            };

            let card = CardContent::render(&def, highlight);

            match self.sink.find_card(&self.deck, &card.front).await {
                Ok(Some(_)) => {
                    tracing::debug!("Card '{}' already exists; skipping", card.front);
                    report.skipped += 1;
                }
                Ok(None) => match self.sink.create_card(&self.deck, &self.model, &card).await {
                    Ok(id) => {
                        tracing::info!("Created card '{}' (id {})", card.front, id);
                        report.created += 1;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to create card '{}': {}", card.front, e);
                        report.failed += 1;
                    }
                },
                Err(e) => {
                    tracing::warn!("Duplicate check failed for '{}': {}", card.front, e);
                    report.failed += 1;
                }
            }
        }

        // The watermark moves to the newest timestamp we actually observed;
        // with nothing fetched there is nothing to re-observe, so "now" is
        // safe. Items that failed to create were still observed — a rerun
        // would only re-hit the duplicate check — so they don't hold the
        // watermark back.
        let new_watermark = highlights
            .iter()
            .map(|h| h.updated_at)
            .max()
            .unwrap_or_else(Utc::now);

        if let Err(e) = self.state.save(new_watermark) {
            tracing::error!(
                "Failed to persist watermark {}; next run will reprocess this window: {}",
                new_watermark.to_rfc3339(),
                e
            );
        }

        Ok(report)
    }
}
