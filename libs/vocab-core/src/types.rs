//! Core types for the highlight-to-flashcard sync.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single highlight as seen by the orchestrator.
///
/// Owned by the remote source and read-only here. The source client flattens
/// the book/highlight nesting of the export payload into this shape and
/// attaches the book metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Highlight {
    pub id: i64,
    /// The highlighted passage itself. Not used for card content; kept for
    /// logging context.
    pub text: String,
    /// Free-text note attached to the highlight. This is what gets parsed.
    pub note: String,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_author: Option<String>,
    /// Link back to the highlight on the source service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A dictionary definition extracted from one highlight's note.
///
/// Transient: produced by [`crate::parser::parse_note`] and consumed within
/// the same sync pass, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub term: String,
    pub part_of_speech: String,
    pub definition: String,
}

/// Rendered card ready for the sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardContent {
    pub front: String,
    pub back: String,
    pub tags: Vec<String>,
}

impl CardContent {
    /// Render a card from a parsed definition and its originating highlight.
    ///
    /// The front carries both the term and its part of speech so that two
    /// senses of one word ("fast (adjective)" vs "fast (verb)") stay distinct
    /// under the sink's duplicate check.
    pub fn render(def: &Definition, highlight: &Highlight) -> Self {
        let front = format!("{} ({})", def.term, def.part_of_speech);

        let mut back = def.definition.clone();
        if let Some(title) = &highlight.source_title {
            let author = highlight.source_author.as_deref().unwrap_or("N/A");
            back.push_str(&format!(
                "<hr><small>Source: {} (by {})</small>",
                title, author
            ));
        }
        if let Some(url) = &highlight.url {
            back.push_str(&format!(
                "<br><small><a href='{}'>View highlight</a> (ID: {})</small>",
                url, highlight.id
            ));
        }

        Self {
            front,
            back,
            tags: vec!["readwise_import".to_string(), "vocabulary".to_string()],
        }
    }
}

/// Counters for one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Note-bearing highlights returned by the source.
    pub fetched: usize,
    /// Cards created on the sink.
    pub created: usize,
    /// Highlights skipped: note did not parse, or card already existed.
    pub skipped: usize,
    /// Cards that failed to create (or probe); the run continues past these.
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn highlight(title: Option<&str>, url: Option<&str>) -> Highlight {
        Highlight {
            id: 7,
            text: "…a laconic reply…".to_string(),
            note: "laconic (adjective): using few words".to_string(),
            updated_at: Utc::now(),
            source_title: title.map(String::from),
            source_author: Some("P. G. Wodehouse".to_string()),
            url: url.map(String::from),
        }
    }

    fn definition() -> Definition {
        Definition {
            term: "laconic".to_string(),
            part_of_speech: "adjective".to_string(),
            definition: "using few words".to_string(),
        }
    }

    #[test]
    fn render_front_includes_part_of_speech() {
        let card = CardContent::render(&definition(), &highlight(None, None));
        assert_eq!(card.front, "laconic (adjective)");
    }

    #[test]
    fn render_back_without_metadata_is_just_the_definition() {
        let card = CardContent::render(&definition(), &highlight(None, None));
        assert_eq!(card.back, "using few words");
    }

    #[test]
    fn render_back_appends_source_and_link() {
        let card = CardContent::render(
            &definition(),
            &highlight(Some("Right Ho, Jeeves"), Some("https://example.com/h/7")),
        );
        assert!(card.back.starts_with("using few words<hr>"));
        assert!(card.back.contains("Right Ho, Jeeves"));
        assert!(card.back.contains("P. G. Wodehouse"));
        assert!(card.back.contains("https://example.com/h/7"));
    }

    #[test]
    fn render_tags_are_stable() {
        let card = CardContent::render(&definition(), &highlight(None, None));
        assert_eq!(card.tags, vec!["readwise_import", "vocabulary"]);
    }
}
