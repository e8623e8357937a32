//! Core library for syncing dictionary highlights into flashcards.
//!
//! Provides:
//! - Note parser for `word (type): definition` highlight notes
//! - File-backed watermark store for incremental runs
//! - Gateway traits for the highlight source and card sink
//! - The sync orchestrator tying them together

pub mod error;
pub mod gateway;
pub mod parser;
pub mod state;
pub mod sync;
pub mod types;

pub use error::{Result, SyncError};
pub use gateway::{CardSink, HighlightSource};
pub use parser::parse_note;
pub use state::{FileStateStore, RunStateStore};
pub use sync::SyncRunner;
pub use types::{CardContent, Definition, Highlight, SyncReport};
