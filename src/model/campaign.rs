//! Campaign records as exchanged with the campaign-management export.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::node::CanonicalNode;

/// An image reference attached to an entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
}

impl Image {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Self::default()
        }
    }
}

/// A journal entry as stored in the dump: rich-text markup content.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceEntry {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slugline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
}

/// A normalized journal entry.
///
/// Content is replaced wholesale by normalization and never mutated once a
/// serializer has started reading it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JournalEntry {
    pub title: String,
    pub content: Vec<CanonicalNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_image: Option<Image>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slugline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
}

impl JournalEntry {
    pub fn new(title: impl Into<String>, content: Vec<CanonicalNode>) -> Self {
        Self {
            title: title.into(),
            content,
            ..Self::default()
        }
    }
}

/// A lore entry: world notes, faction write-ups and split-off journal pages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoreEntry {
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A faction record from the dump. Every trait is free text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Faction {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub influence: String,
    pub leadership: Option<String>,
    pub sphere: String,
    pub projects: String,
    pub relationships: String,
    pub quirks: String,
    pub rumors: String,
    pub notes: String,
    pub colour: String,
}

/// A campaign from the dump.
///
/// Fields the pipeline does not touch (characters, sectors, ...) are kept in
/// `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Campaign {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub journal: Vec<SourceEntry>,
    #[serde(default)]
    pub lore: Vec<LoreEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub factions: Vec<Faction>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
