//! Faction records to lore entries.

use std::fmt::Write;

use crate::export::escape_xml;
use crate::model::{Faction, Image, LoreEntry};
use crate::normalize::{extract_attribution, extract_image_directive};

/// Build the lore entry for a faction: a trait table followed by the notes.
///
/// Empty traits are left out of the table. Note lines of the form
/// `((Image: uri))` and `((Credit: X))` set the lore image and its
/// attribution instead of becoming paragraphs.
pub fn lore_from_faction(faction: &Faction) -> LoreEntry {
    let mut content = String::from(r#"<table class="faction-traits">"#);
    for (label, value) in trait_rows(faction) {
        if value.trim().is_empty() {
            continue;
        }
        let _ = write!(
            content,
            "<tr><td>{label}</td><td>{}</td></tr>",
            escape_xml(value.trim())
        );
    }
    content.push_str("</table>");

    content.push_str(r#"<article class="faction-notes">"#);
    let mut image_src = None;
    let mut credit = None;
    for line in faction.notes.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(src) = extract_image_directive(line) {
            image_src = Some(src);
        } else if is_credit_line(line) {
            credit = extract_attribution(line);
        } else {
            let _ = write!(content, "<p>{}</p>", escape_xml(line));
        }
    }
    content.push_str("</article>");

    if credit.is_some() && image_src.is_none() {
        tracing::debug!(faction = %faction.name, "credit line without an image");
    }

    LoreEntry {
        title: format!("Faction: {}", faction.name),
        tags: vec!["faction".to_string()],
        image: image_src.map(|src| Image {
            src,
            alt: None,
            attribution: credit,
        }),
        content,
        notes: None,
    }
}

fn trait_rows(faction: &Faction) -> [(&'static str, &str); 8] {
    [
        ("Type", faction.kind.as_str()),
        ("Influence", faction.influence.as_str()),
        ("Leadership", faction.leadership.as_deref().unwrap_or_default()),
        ("Sphere", faction.sphere.as_str()),
        ("Projects", faction.projects.as_str()),
        ("Relationships", faction.relationships.as_str()),
        ("Quirks", faction.quirks.as_str()),
        ("Rumors", faction.rumors.as_str()),
    ]
}

fn is_credit_line(line: &str) -> bool {
    line.get(..9)
        .is_some_and(|head| head.eq_ignore_ascii_case("((credit:"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn covenant() -> Faction {
        Faction {
            name: "The Covenant".into(),
            kind: "Dominion".into(),
            influence: "Established".into(),
            leadership: None,
            rumors: "They hoard <relics>".into(),
            notes: "((Image: https://example.com/covenant.png))\n\n((Credit: Jane))\nZealots of the Ascendancy.\n  \nThey watch.".into(),
            ..Faction::default()
        }
    }

    #[test]
    fn test_title_and_tags() {
        let lore = lore_from_faction(&covenant());
        assert_eq!(lore.title, "Faction: The Covenant");
        assert_eq!(lore.tags, vec!["faction".to_string()]);
    }

    #[test]
    fn test_only_filled_traits_are_listed() {
        let lore = lore_from_faction(&covenant());
        assert!(lore.content.starts_with(
            r#"<table class="faction-traits"><tr><td>Type</td><td>Dominion</td></tr><tr><td>Influence</td><td>Established</td></tr><tr><td>Rumors</td><td>They hoard &lt;relics&gt;</td></tr></table>"#
        ));
        assert!(!lore.content.contains("Leadership"));
    }

    #[test]
    fn test_notes_and_directives() {
        let lore = lore_from_faction(&covenant());
        assert!(lore.content.ends_with(
            r#"<article class="faction-notes"><p>Zealots of the Ascendancy.</p><p>They watch.</p></article>"#
        ));
        let image = lore.image.unwrap();
        assert_eq!(image.src, "https://example.com/covenant.png");
        assert_eq!(image.attribution.as_deref(), Some("Jane"));
    }

    #[test]
    fn test_credit_without_image_is_ignored() {
        let faction = Faction {
            name: "Drifters".into(),
            notes: "((Credit: Nobody))".into(),
            ..Faction::default()
        };
        let lore = lore_from_faction(&faction);
        assert!(lore.image.is_none());
        assert!(lore.content.contains(r#"<article class="faction-notes"></article>"#));
    }
}
