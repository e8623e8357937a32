//! Capability traits for the two remote collaborators.
//!
//! The orchestrator only sees these seams; the real network clients live in
//! the binary crate and the test suites use in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::{CardContent, Highlight};

/// Read side: the highlighting service.
#[async_trait]
pub trait HighlightSource {
    /// List highlights updated after `since`, oldest history included when
    /// `since` is `None`. Pagination is the implementer's concern; the
    /// returned order is source-defined and callers must not rely on it.
    async fn list_updated_since(&self, since: Option<DateTime<Utc>>) -> Result<Vec<Highlight>>;
}

/// Write side: the flashcard application.
#[async_trait]
pub trait CardSink {
    /// Look up a card in `deck` whose front text equals `front`,
    /// case-insensitively. Returns the card's id when found.
    async fn find_card(&self, deck: &str, front: &str) -> Result<Option<i64>>;

    /// Create a card in `deck` using note type `model`. Returns the new
    /// card's id.
    async fn create_card(&self, deck: &str, model: &str, card: &CardContent) -> Result<i64>;
}
