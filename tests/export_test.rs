//! Serializer tests: markup round trips and mechanics notes.

use logbook::export::{Exporter, MarkupExporter, MechanicsConfig, MechanicsExporter, render_markup, render_mechanics};
use logbook::import::parse_canonical;
use logbook::model::{ActionItem, CanonicalNode, Image, JournalEntry};
use logbook::{Normalizer, Vocabulary};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

const SESSION: &str = concat!(
    "<p>We cast off from <em>Bleakhold</em> at dawn &amp; never looked back.</p>",
    "<p><img src=\"/img/campaigns/bleakhold.png\"></p>",
    "<p>((Credit: https://example.com/jane)) Bleakhold from the docks</p>",
    "<p>[Face Danger +edge]</p>",
    "<p>[Face Danger: Strong Hit: 8 + 2 + 1 = 11 vs 5 | 3]</p>",
    "<p>[Take +1 momentum]</p>",
    "<p>———</p>",
    "<p>[Fulfill Your Vow]</p>",
    "<p>[Fulfill Your Vow: Weak Hit: 9 vs 2 | 10]</p>",
    "<p>It's done.</p>",
);

fn normalized_session() -> Vec<CanonicalNode> {
    let vocab = Vocabulary::load(format!("{FIXTURES_DIR}/rules.json")).expect("Failed to load rules");
    Normalizer::new(&vocab).normalize_markup(SESSION)
}

// ============================================================================
// Markup
// ============================================================================

#[test]
fn test_session_shape() {
    let nodes = normalized_session();
    let kinds: Vec<&str> = nodes
        .iter()
        .map(|n| match n {
            CanonicalNode::Paragraph { .. } => "p",
            CanonicalNode::Separator => "hr",
            CanonicalNode::Figure { .. } => "figure",
            CanonicalNode::ActionBlock { .. } => "action",
        })
        .collect();
    assert_eq!(kinds, ["p", "figure", "action", "hr", "action", "p"]);

    let CanonicalNode::ActionBlock { items, .. } = &nodes[4] else {
        panic!("expected action block");
    };
    assert!(matches!(items[0], ActionItem::Progress(_)));
}

#[test]
fn test_markup_round_trip_is_idempotent() {
    let nodes = normalized_session();
    let first = render_markup(&nodes).unwrap();
    let reparsed = parse_canonical(&first);
    assert_eq!(reparsed, nodes);
    let second = render_markup(&reparsed).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_markup_exporter_writes_rendered_content() {
    let nodes = normalized_session();
    let entry = JournalEntry::new("Session 1", nodes.clone());
    let mut out = Vec::new();
    MarkupExporter::new().export(&entry, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), render_markup(&nodes).unwrap());
}

#[test]
fn test_linked_attribution_in_markup() {
    let html = render_markup(&normalized_session()).unwrap();
    assert!(html.contains(
        r#"<cite><a href="https://example.com/jane">https://example.com/jane</a></cite>"#
    ));
}

// ============================================================================
// Mechanics notes
// ============================================================================

#[test]
fn test_mechanics_note() {
    let mut entry = JournalEntry::new("Session 1", normalized_session());
    entry.slugline = Some("Leaving the station".into());
    let note = render_mechanics(&entry).unwrap();

    assert!(note.starts_with("---\ntitle: \"Session 1\"\nslugline: \"Leaving the station\"\n---\n\n"));
    assert!(note.contains("We cast off from Bleakhold at dawn & never looked back.\n\n"));
    assert!(note.contains(
        "![[Images/Campaign/bleakhold.png|source: https://example.com/jane]]\nBleakhold from the docks\n\n"
    ));
    assert!(note.contains(
        "```mechanics\nmove \"Face Danger +edge\" {\n  roll action=8 stat=2 adds=1 vs1=5 vs2=3\n  - \"Take +1 momentum\"\n}\n```"
    ));
    assert!(note.contains("\n\n***\n\n"));
    assert!(note.contains("  progress-roll score=9 vs1=2 vs2=10\n"));
    assert!(note.ends_with("It's done.\n\n"));
}

#[test]
fn test_mechanics_lead_image_without_rewrite() {
    let mut entry = JournalEntry::new("Art", vec![CanonicalNode::paragraph("x")]);
    entry.lead_image = Some(Image::new("/img/campaigns/cover.png"));
    let exporter = MechanicsExporter::with_config(MechanicsConfig {
        image_prefix: None,
        ..MechanicsConfig::default()
    });
    let note = exporter.render(&entry).unwrap();
    assert!(note.contains("image:\n  src: \"/img/campaigns/cover.png\"\n---\n\n![[/img/campaigns/cover.png]]\n\nx\n\n"));
}

#[test]
fn test_mechanics_from_stored_markup() {
    let nodes = normalized_session();
    let stored = render_markup(&nodes).unwrap();
    let direct = render_mechanics(&JournalEntry::new("S", nodes)).unwrap();
    let via_store = render_mechanics(&JournalEntry::new("S", parse_canonical(&stored))).unwrap();
    assert_eq!(direct, via_store);
}
