//! Readwise export API client.
//!
//! Wraps `GET /api/v2/export`, following `nextPageCursor` pagination until
//! exhausted and flattening the book/highlight nesting into the core
//! [`Highlight`] shape.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use vocab_core::error::{Result, SyncError};
use vocab_core::{Highlight, HighlightSource};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ReadwiseClient {
    client: Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ExportResponse {
    results: Vec<ExportBook>,
    #[serde(rename = "nextPageCursor")]
    next_page_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExportBook {
    title: Option<String>,
    author: Option<String>,
    #[serde(default)]
    highlights: Vec<ExportHighlight>,
}

#[derive(Debug, Deserialize)]
struct ExportHighlight {
    id: i64,
    #[serde(default)]
    text: String,
    #[serde(default)]
    note: Option<String>,
    updated_at: DateTime<Utc>,
    readwise_url: Option<String>,
}

impl ReadwiseClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: "https://readwise.io/api/v2".to_string(),
            token: token.into(),
        }
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.token)
    }

    /// Validate the API token against `/auth/`; Readwise answers 204 for a
    /// valid token.
    pub async fn check_token(&self) -> Result<bool> {
        let resp = self
            .client
            .get(format!("{}/auth/", self.base_url))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| SyncError::Connectivity(e.to_string()))?;

        Ok(resp.status() == reqwest::StatusCode::NO_CONTENT)
    }

    async fn fetch_page(
        &self,
        since: Option<DateTime<Utc>>,
        cursor: Option<&str>,
    ) -> Result<ExportResponse> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(ts) = since {
            query.push(("updatedAfter", ts.to_rfc3339()));
        }
        if let Some(cursor) = cursor {
            query.push(("pageCursor", cursor.to_string()));
        }

        let resp = self
            .client
            .get(format!("{}/export", self.base_url))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .query(&query)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| SyncError::Connectivity(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after = resp
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("?");
                tracing::warn!("Readwise rate limit hit; retry after {} seconds", retry_after);
            }
            let message = resp.text().await.unwrap_or_default();
            return Err(SyncError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        resp.json().await.map_err(|e| SyncError::Parse(e.to_string()))
    }
}

/// Flatten the nested export payload, attaching book metadata to each
/// highlight. Highlights without a note are dropped here: they can never
/// parse as definitions and would only inflate the run counters.
fn flatten(books: Vec<ExportBook>) -> Vec<Highlight> {
    let mut highlights = Vec::new();
    for book in books {
        for h in book.highlights {
            let note = match h.note {
                Some(note) if !note.trim().is_empty() => note,
                _ => continue,
            };
            highlights.push(Highlight {
                id: h.id,
                text: h.text,
                note,
                updated_at: h.updated_at,
                source_title: book.title.clone(),
                source_author: book.author.clone(),
                url: h.readwise_url,
            });
        }
    }
    highlights
}

#[async_trait]
impl HighlightSource for ReadwiseClient {
    async fn list_updated_since(&self, since: Option<DateTime<Utc>>) -> Result<Vec<Highlight>> {
        match since {
            Some(ts) => tracing::debug!("Exporting Readwise highlights updated after {}", ts),
            None => tracing::debug!("Exporting all Readwise highlights"),
        }

        let mut books = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self.fetch_page(since, cursor.as_deref()).await?;
            books.extend(page.results);
            match page.next_page_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        let highlights = flatten(books);
        tracing::info!("Fetched {} note-bearing highlights from Readwise", highlights.len());
        Ok(highlights)
    }
}
