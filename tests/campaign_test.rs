//! Campaign import tests against the bundled dump.

use std::fs;

use logbook::export::{Exporter, MechanicsExporter};
use logbook::import::{ImportConfig, import_campaigns, load_campaigns, save_campaigns, stored_entry};
use logbook::model::CanonicalNode;
use logbook::util::{file_stem, slugify};
use logbook::{Error, Vocabulary};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> String {
    format!("{FIXTURES_DIR}/{name}")
}

fn vocabulary() -> Vocabulary {
    Vocabulary::load(fixture_path("rules.json")).expect("Failed to load rules")
}

fn imported() -> Vec<logbook::model::Campaign> {
    let campaigns = load_campaigns(fixture_path("campaigns.json")).expect("Failed to load dump");
    import_campaigns(campaigns, &vocabulary(), &ImportConfig::default()).expect("Import failed")
}

// ============================================================================
// Import
// ============================================================================

#[test]
fn test_import_keeps_campaign_order() {
    let campaigns = imported();
    let names: Vec<_> = campaigns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Iron Veil", "Ashen Drift"]);
}

#[test]
fn test_journal_and_lore_split() {
    let campaigns = imported();
    let veil = &campaigns[0];

    assert_eq!(veil.journal.len(), 1);
    let session = &veil.journal[0];
    assert_eq!(session.title, "Session 1");
    assert_eq!(session.pinned, Some(true));
    assert_eq!(session.slugline.as_deref(), Some("Leaving the station"));

    let titles: Vec<_> = veil.lore.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, ["Faction: The Covenant", "Bleakhold"]);
    assert_eq!(
        veil.lore[1].content,
        "<p>A mining station on the edge of the Expanse.</p>\n"
    );
}

#[test]
fn test_session_content_is_canonical_markup() {
    let campaigns = imported();
    let content = &campaigns[0].journal[0].content;

    assert!(!content.contains("<script"));
    assert!(content.contains(r#"<dl class="roll strong-hit""#));
    assert!(content.contains(r#"<dl class="roll miss match""#));
    assert!(content.contains("<hr>"));
    assert!(content.contains("<cite>Jane Doe</cite>"));

    let nodes = stored_entry(&campaigns[0].journal[0]).content;
    assert_eq!(nodes.len(), 6);
    assert!(matches!(&nodes[2], CanonicalNode::ActionBlock { header, items }
        if header == "Face Danger +edge" && items.len() == 2));
    assert!(matches!(&nodes[4], CanonicalNode::ActionBlock { header, .. }
        if header == "Endure Harm +health"));
}

#[test]
fn test_faction_lore() {
    let campaigns = imported();
    let lore = &campaigns[0].lore[0];
    assert_eq!(lore.tags, ["faction"]);
    assert!(lore.content.contains("<tr><td>Leadership</td><td>Theocracy</td></tr>"));
    assert!(!lore.content.contains("Sphere"));
    let image = lore.image.as_ref().unwrap();
    assert_eq!(image.src, "https://example.com/covenant.png");
    assert_eq!(image.attribution.as_deref(), Some("Sam"));
}

#[test]
fn test_unknown_fields_survive() {
    let campaigns = imported();
    assert_eq!(campaigns[0].extra["characters"][0]["name"], "Kira Vale");
}

#[test]
fn test_filter_selects_campaigns() {
    let campaigns = load_campaigns(fixture_path("campaigns.json")).unwrap();
    let config = ImportConfig::default().with_filter("(?i)^ashen").unwrap();
    let out = import_campaigns(campaigns, &vocabulary(), &config).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].name, "Ashen Drift");
    assert!(out[0].lore.is_empty());
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("campaigns.json");
    let campaigns = imported();
    save_campaigns(&path, &campaigns).unwrap();
    assert_eq!(load_campaigns(&path).unwrap(), campaigns);
}

#[test]
fn test_export_notes_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = MechanicsExporter::new();
    for campaign in imported() {
        let journals = dir.path().join(slugify(&campaign.name)).join("journals");
        fs::create_dir_all(&journals).unwrap();
        for entry in &campaign.journal {
            let mut file = fs::File::create(journals.join(format!("{}.md", file_stem(&entry.title)))).unwrap();
            exporter.export(&stored_entry(entry), &mut file).unwrap();
        }
    }

    let note = fs::read_to_string(dir.path().join("iron-veil/journals/Session 1.md")).unwrap();
    assert!(note.starts_with("---\ntitle: \"Session 1\"\nslugline: \"Leaving the station\"\n---\n\n"));
    assert!(note.contains("![[Images/Campaign/bleakhold.png|source: Jane Doe]]"));
    assert!(note.contains("  roll action=3 stat=1 adds=0 vs1=6 vs2=6\n"));
    assert!(dir.path().join("ashen-drift/journals/Prologue.md").exists());
}

#[test]
fn test_vocabulary_load_failures() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("missing.json");
    assert!(matches!(Vocabulary::load(&missing), Err(Error::VocabularyLoad { .. })));

    let empty = dir.path().join("empty.json");
    fs::write(&empty, r#"{"moves": {}, "assets": {}}"#).unwrap();
    assert!(matches!(Vocabulary::load(&empty), Err(Error::EmptyVocabulary)));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{not json").unwrap();
    assert!(matches!(Vocabulary::load(&broken), Err(Error::VocabularyLoad { .. })));
}
