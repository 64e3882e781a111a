//! Error types for logbook operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading reference data or rendering entries.
///
/// Per-entry ambiguities (unparsable rolls, missing captions, unknown
/// markup) never surface here; the normalizer resolves them locally.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to load vocabulary from {path}: {reason}")]
    VocabularyLoad { path: PathBuf, reason: String },

    #[error("Vocabulary contains no terms")]
    EmptyVocabulary,

    #[error("Invalid campaign filter: {0}")]
    InvalidFilter(String),

    #[error("Serializer contract violated: {0}")]
    Contract(String),
}

pub type Result<T> = std::result::Result<T, Error>;
