//! Importers for campaign dumps and stored canonical markup.
//!
//! - [`import_campaigns`] turns a raw dump into normalized campaigns whose
//!   entry content is canonical markup.
//! - [`parse_canonical`] reads that markup back so stored entries can be
//!   exported without normalizing them again.

mod campaign;
mod canonical;
mod faction;

pub use campaign::{ImportConfig, import_campaign, import_campaigns, load_campaigns, save_campaigns};
pub use canonical::parse_canonical;
pub use faction::lore_from_faction;

use crate::model::{JournalEntry, SourceEntry};

/// Rebuild a journal entry from an imported entry whose content is
/// canonical markup.
pub fn stored_entry(entry: &SourceEntry) -> JournalEntry {
    JournalEntry {
        title: entry.title.clone(),
        content: parse_canonical(&entry.content),
        lead_image: entry.image.clone(),
        slugline: entry.slugline.clone(),
        pinned: entry.pinned,
    }
}
