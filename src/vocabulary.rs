//! Vocabulary index of recognized game terms (moves and assets).
//!
//! The index answers one question: does a piece of action text start with a
//! known term, and if so which one? Matching is case-insensitive and prefers
//! the longest term; among equal-length matches the term added first wins, so
//! construction order must follow the reference dataset's enumeration order.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::util::decode_text;

/// A term as supplied by the reference dataset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VocabularyEntry {
    pub name: String,
    #[serde(default, alias = "canonicalName")]
    pub canonical_name: Option<String>,
}

impl VocabularyEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            canonical_name: None,
        }
    }

    /// The name used for matching: the canonical override when present.
    pub fn effective_name(&self) -> &str {
        self.canonical_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone)]
struct Term {
    name: String,
    key: String,
}

/// Read-only index built once and shared across normalizations.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<Term>,
    /// Term indices bucketed by the first character of their lowercase key,
    /// in insertion order.
    buckets: HashMap<char, Vec<usize>>,
}

impl Vocabulary {
    /// Build an index from terms in a stable order.
    pub fn build<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = VocabularyEntry>,
    {
        let mut vocab = Self::default();
        for entry in entries {
            vocab.insert(entry.effective_name());
        }
        vocab
    }

    fn insert(&mut self, name: &str) {
        let name = name.trim();
        let key = name.to_lowercase();
        let Some(first) = key.chars().next() else {
            return;
        };
        let index = self.terms.len();
        self.terms.push(Term {
            name: name.to_string(),
            key,
        });
        self.buckets.entry(first).or_default().push(index);
    }

    /// Load terms from a JSON file.
    ///
    /// Accepts either a rules package (`moves` and `assets` collections with
    /// `contents` maps) or a flat array of `{name, canonicalName?}` objects.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| Error::VocabularyLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let text = decode_text(&bytes, None);
        Self::from_json(&text).map_err(|e| match e {
            Error::EmptyVocabulary => Error::EmptyVocabulary,
            other => Error::VocabularyLoad {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })
    }

    /// Parse terms from JSON text. See [`Vocabulary::load`] for the formats.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let entries = match value {
            Value::Array(items) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<std::result::Result<Vec<VocabularyEntry>, _>>()?,
            Value::Object(package) => {
                let mut entries = Vec::new();
                for section in ["moves", "assets"] {
                    if let Some(collections) = package.get(section) {
                        collect_package_section(collections, &mut entries)?;
                    }
                }
                entries
            }
            _ => {
                return Err(Error::Contract(
                    "vocabulary JSON must be an array or an object".to_string(),
                ));
            }
        };

        let vocab = Self::build(entries);
        if vocab.is_empty() {
            return Err(Error::EmptyVocabulary);
        }
        tracing::debug!(terms = vocab.len(), "vocabulary loaded");
        Ok(vocab)
    }

    /// Longest term (case-insensitive) that `text` starts with.
    pub fn match_prefix(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        let first = lower.chars().next()?;
        let mut best: Option<&Term> = None;
        for &index in self.buckets.get(&first)? {
            let term = &self.terms[index];
            if lower.starts_with(&term.key) && best.is_none_or(|b| term.key.len() > b.key.len()) {
                best = Some(term);
            }
        }
        best.map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Term names in construction order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|t| t.name.as_str())
    }
}

/// Walk `{collection: {contents: {id: entry}}}` in document order.
fn collect_package_section(collections: &Value, out: &mut Vec<VocabularyEntry>) -> Result<()> {
    let Some(collections) = collections.as_object() else {
        return Ok(());
    };
    for collection in collections.values() {
        let Some(contents) = collection.get("contents").and_then(Value::as_object) else {
            continue;
        };
        for item in contents.values() {
            out.push(VocabularyEntry::deserialize(item)?);
        }
    }
    Ok(())
}
