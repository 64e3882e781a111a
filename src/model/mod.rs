//! Core data model for journal processing.
//!
//! This module contains:
//! - Raw nodes as read from an entry's rich-text markup
//! - Canonical nodes produced by the normalizer
//! - Roll results and their outcomes
//! - Journal, lore and campaign records exchanged with the export tool

mod campaign;
mod node;

pub use campaign::{Campaign, Faction, Image, JournalEntry, LoreEntry, SourceEntry};
pub use node::{ActionItem, CanonicalNode, Outcome, ProgressRoll, RawNode, RollResult};
