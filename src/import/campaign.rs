//! Campaign import pipeline: dump in, normalized campaigns out.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use regex_lite::Regex;

use super::faction::lore_from_faction;
use crate::error::{Error, Result};
use crate::export::render_markup;
use crate::model::{Campaign, LoreEntry, SourceEntry};
use crate::normalize::Normalizer;
use crate::util::decode_text;
use crate::vocabulary::Vocabulary;

/// Configuration for campaign import.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Journal entries whose title starts with this become lore entries.
    pub lore_prefix: String,
    /// Only campaigns whose name matches are imported.
    pub filter: Option<Regex>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            lore_prefix: "00 Lore".to_string(),
            filter: None,
        }
    }
}

impl ImportConfig {
    /// Restrict import to campaigns whose name matches `pattern`.
    pub fn with_filter(mut self, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| Error::InvalidFilter(e.to_string()))?;
        self.filter = Some(regex);
        Ok(self)
    }

    fn accepts(&self, name: &str) -> bool {
        self.filter.as_ref().is_none_or(|re| re.is_match(name))
    }
}

/// Read a campaign dump.
pub fn load_campaigns(path: impl AsRef<Path>) -> Result<Vec<Campaign>> {
    let bytes = std::fs::read(path)?;
    let text = decode_text(&bytes, None);
    Ok(serde_json::from_str(&text)?)
}

/// Write campaigns as compact JSON.
pub fn save_campaigns(path: impl AsRef<Path>, campaigns: &[Campaign]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, campaigns)?;
    writer.flush()?;
    Ok(())
}

/// Normalize every selected campaign.
///
/// Campaigns whose name fails the filter are left out of the result. Each
/// remaining campaign is processed on its own scoped thread against the
/// shared vocabulary; the output keeps input order.
pub fn import_campaigns(
    campaigns: Vec<Campaign>,
    vocabulary: &Vocabulary,
    config: &ImportConfig,
) -> Result<Vec<Campaign>> {
    let selected: Vec<Campaign> = campaigns
        .into_iter()
        .filter(|campaign| {
            let keep = config.accepts(&campaign.name);
            if !keep {
                tracing::debug!(campaign = %campaign.name, "skipped by filter");
            }
            keep
        })
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = selected
            .into_iter()
            .map(|campaign| scope.spawn(move || import_campaign(campaign, vocabulary, config)))
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    })
}

/// Normalize one campaign.
///
/// Faction lore comes first, followed by journal entries carrying the lore
/// prefix. Content of every kept entry is replaced by rendered markup.
pub fn import_campaign(
    mut campaign: Campaign,
    vocabulary: &Vocabulary,
    config: &ImportConfig,
) -> Result<Campaign> {
    let normalizer = Normalizer::new(vocabulary);
    let mut lore: Vec<LoreEntry> = campaign.factions.iter().map(lore_from_faction).collect();
    let mut journal = Vec::with_capacity(campaign.journal.len());

    for entry in std::mem::take(&mut campaign.journal) {
        let normalized = normalizer.normalize_entry(&entry);
        let content = render_markup(&normalized.content)?;

        match entry.title.strip_prefix(config.lore_prefix.as_str()) {
            Some(rest) if !config.lore_prefix.is_empty() => lore.push(LoreEntry {
                title: lore_title(rest),
                tags: Vec::new(),
                image: entry.image,
                content,
                notes: None,
            }),
            _ => journal.push(SourceEntry { content, ..entry }),
        }
    }

    tracing::info!(
        campaign = %campaign.name,
        journal = journal.len(),
        lore = lore.len(),
        "imported campaign"
    );
    campaign.journal = journal;
    campaign.lore = lore;
    Ok(campaign)
}

/// Title left after the lore prefix, minus a ` - ` separator.
fn lore_title(rest: &str) -> String {
    let rest = rest.trim_start();
    rest.strip_prefix('-').unwrap_or(rest).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Faction;
    use crate::vocabulary::VocabularyEntry;

    fn vocabulary() -> Vocabulary {
        Vocabulary::build([VocabularyEntry::new("Face Danger")])
    }

    fn campaign(name: &str) -> Campaign {
        Campaign {
            id: name.to_lowercase(),
            name: name.to_string(),
            journal: vec![
                SourceEntry {
                    title: "Session 1".into(),
                    content: "<p>[Face Danger +edge]</p><p>[Face Danger: Strong Hit: 8 + 2 + 1 = 11 vs 5 | 3]</p>".into(),
                    ..SourceEntry::default()
                },
                SourceEntry {
                    title: "00 Lore - The Forge".into(),
                    content: "<p>A hot place.</p>".into(),
                    ..SourceEntry::default()
                },
            ],
            factions: vec![Faction {
                name: "The Covenant".into(),
                ..Faction::default()
            }],
            ..Campaign::default()
        }
    }

    #[test]
    fn test_lore_title() {
        assert_eq!(lore_title(" - The Forge"), "The Forge");
        assert_eq!(lore_title("-Stars"), "Stars");
        assert_eq!(lore_title(" Index"), "Index");
    }

    #[test]
    fn test_import_splits_lore_and_renders() {
        let out = import_campaign(campaign("Iron Veil"), &vocabulary(), &ImportConfig::default())
            .unwrap();
        assert_eq!(out.journal.len(), 1);
        assert!(out.journal[0].content.contains(r#"<aside class="action">"#));
        assert!(out.journal[0].content.contains(r#"class="roll strong-hit""#));

        let titles: Vec<_> = out.lore.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, ["Faction: The Covenant", "The Forge"]);
        assert_eq!(out.lore[1].content, "<p>A hot place.</p>\n");
    }

    #[test]
    fn test_filter_and_order() {
        let config = ImportConfig::default().with_filter("^(Iron|Star)").unwrap();
        let campaigns = vec![campaign("Iron Veil"), campaign("Ashen"), campaign("Starsmith")];
        let out = import_campaigns(campaigns, &vocabulary(), &config).unwrap();
        let names: Vec<_> = out.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Iron Veil", "Starsmith"]);
    }

    #[test]
    fn test_invalid_filter() {
        let err = ImportConfig::default().with_filter("(unclosed").unwrap_err();
        assert!(matches!(err, Error::InvalidFilter(_)));
    }
}
