//! Parser for dictionary-definition notes.
//!
//! # Format
//! ```text
//! laconic (adjective): using few words
//! ```
//!
//! The note must contain a term, a parenthesized part of speech, and a
//! definition after a colon. Anything else is not a definition note and
//! parses to `None` — highlights carry all kinds of free-text notes, and
//! non-matching ones are simply not vocabulary.

use crate::types::Definition;

/// Extract a `word (type): definition` triple from a highlight note.
///
/// Returns `None` when the note does not have that structure or any of the
/// three components is empty after trimming. Matching is case-preserving.
///
/// Structure rules:
/// - the term is everything before the first `(`;
/// - the part of speech is the text strictly between that `(` and the first
///   `)` after it;
/// - the definition is everything after the first `:` following that `)`,
///   so embedded colons and any later parentheses stay part of it.
pub fn parse_note(note: &str) -> Option<Definition> {
    // Readwise sometimes wraps the note value in straight or curly quotes.
    let text = note
        .trim()
        .trim_matches(|c| c == '"' || c == '\u{201c}' || c == '\u{201d}')
        .trim();

    let open = text.find('(')?;
    let close = open + text[open..].find(')')?;
    let colon = close + text[close..].find(':')?;

    let term = text[..open].trim();
    let part_of_speech = text[open + 1..close].trim();
    let definition = text[colon + 1..].trim();

    if term.is_empty() || part_of_speech.is_empty() || definition.is_empty() {
        return None;
    }

    Some(Definition {
        term: term.to_string(),
        part_of_speech: part_of_speech.to_string(),
        definition: definition.to_string(),
    })
}
