//! Canonical markup reader.
//!
//! Reads markup written by [`crate::export::render_markup`] back into
//! canonical nodes, so stored entries can be re-exported without being
//! normalized again. Outcome and match are taken from the data attributes
//! as written; nothing is reclassified here.

use crate::dom::{Dom, NodeId, inner_html, is_safe_url, parse_markup};
use crate::export::escape_xml;
use crate::model::{ActionItem, CanonicalNode, Outcome, ProgressRoll, RollResult};

/// Parse canonical markup into nodes, in document order.
///
/// Elements the markup serializer never writes are kept as paragraphs of
/// their inner markup. Malformed roll lists degrade to plain items.
pub fn parse_canonical(markup: &str) -> Vec<CanonicalNode> {
    let dom = parse_markup(markup);
    let Some(body) = dom.find_by_tag("body") else {
        return Vec::new();
    };

    let mut nodes = Vec::new();
    for child in dom.children(body) {
        if let Some(text) = dom.text_content(child) {
            let text = text.trim();
            if !text.is_empty() {
                nodes.push(CanonicalNode::paragraph(escape_xml(text)));
            }
            continue;
        }
        let Some(tag) = dom.element_name(child) else {
            continue;
        };
        match tag.as_ref() {
            "p" => nodes.push(CanonicalNode::paragraph(inner_html(&dom, child))),
            "hr" => nodes.push(CanonicalNode::Separator),
            "figure" => {
                if let Some(figure) = read_figure(&dom, child) {
                    nodes.push(figure);
                }
            }
            "aside" if dom.has_class(child, "action") => nodes.push(read_action(&dom, child)),
            other => {
                tracing::warn!(tag = other, "unexpected element in canonical markup");
                nodes.push(CanonicalNode::paragraph(inner_html(&dom, child)));
            }
        }
    }
    nodes
}

fn read_figure(dom: &Dom, figure: NodeId) -> Option<CanonicalNode> {
    let img = dom.descendants_by_tag(figure, "img").into_iter().next();
    let Some(uri) = img.and_then(|img| dom.get_attr(img, "src")) else {
        tracing::warn!("figure without an image, dropping it");
        return None;
    };
    if !is_safe_url(uri) {
        tracing::warn!(uri, "figure with a script URL, dropping it");
        return None;
    }

    let mut caption = None;
    let mut attribution = None;
    if let Some(figcaption) = dom.descendants_by_tag(figure, "figcaption").into_iter().next() {
        let mut text = String::new();
        for child in dom.children(figcaption) {
            if dom.element_name(child).is_some_and(|n| n.as_ref() == "cite") {
                attribution = non_empty(&dom.text_of(child));
            } else {
                text.push_str(&dom.text_of(child));
            }
        }
        caption = non_empty(&text);
    }

    Some(CanonicalNode::Figure {
        uri: uri.to_string(),
        caption,
        attribution,
    })
}

fn read_action(dom: &Dom, aside: NodeId) -> CanonicalNode {
    let mut header = String::new();
    let mut items = Vec::new();
    for child in dom.children(aside) {
        let Some(tag) = dom.element_name(child) else {
            continue;
        };
        match tag.as_ref() {
            "header" => header = dom.text_of(child),
            "dl" if dom.has_class(child, "roll") => items.push(
                read_roll(dom, child)
                    .map(ActionItem::Roll)
                    .unwrap_or_else(|| malformed(dom, child)),
            ),
            "dl" if dom.has_class(child, "progress") => items.push(
                read_progress(dom, child)
                    .map(ActionItem::Progress)
                    .unwrap_or_else(|| malformed(dom, child)),
            ),
            _ => items.push(ActionItem::Plain(dom.text_of(child))),
        }
    }
    CanonicalNode::ActionBlock { header, items }
}

fn read_roll(dom: &Dom, dl: NodeId) -> Option<RollResult> {
    let [challenge1, challenge2] = challenge_dice(dom, dl)?;
    Some(RollResult {
        action: dd_value(dom, dl, "action-die")?,
        stat: dd_value(dom, dl, "stat")?,
        add: dd_value(dom, dl, "add")?,
        total: dd_value(dom, dl, "total")?,
        reported_total: dd_with_class(dom, dl, "total")
            .and_then(|dd| dom.get_attr(dd, "data-reported"))
            .and_then(|v| v.trim().parse().ok()),
        challenge1,
        challenge2,
        outcome: outcome(dom, dl)?,
        matched: matched(dom, dl),
    })
}

fn read_progress(dom: &Dom, dl: NodeId) -> Option<ProgressRoll> {
    let [challenge1, challenge2] = challenge_dice(dom, dl)?;
    Some(ProgressRoll {
        score: dd_value(dom, dl, "progress-score")?,
        challenge1,
        challenge2,
        outcome: outcome(dom, dl)?,
        matched: matched(dom, dl),
    })
}

fn malformed(dom: &Dom, dl: NodeId) -> ActionItem {
    tracing::warn!("malformed roll markup, keeping its text");
    let text = dom.text_of(dl);
    ActionItem::Plain(text.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn challenge_dice(dom: &Dom, dl: NodeId) -> Option<[i32; 2]> {
    let dice: Vec<i32> = dom
        .descendants_by_tag(dl, "dd")
        .into_iter()
        .filter(|&dd| dom.has_class(dd, "challenge-die"))
        .map(|dd| data_value(dom, dd))
        .collect::<Option<_>>()?;
    match dice.as_slice() {
        [c1, c2] => Some([*c1, *c2]),
        _ => None,
    }
}

fn outcome(dom: &Dom, dl: NodeId) -> Option<Outcome> {
    dom.get_attr(dl, "data-outcome")
        .and_then(Outcome::from_class_name)
}

fn matched(dom: &Dom, dl: NodeId) -> bool {
    dom.get_attr(dl, "data-match") == Some("true")
}

fn dd_with_class(dom: &Dom, dl: NodeId, class: &str) -> Option<NodeId> {
    dom.descendants_by_tag(dl, "dd")
        .into_iter()
        .find(|&dd| dom.has_class(dd, class))
}

fn dd_value(dom: &Dom, dl: NodeId, class: &str) -> Option<i32> {
    data_value(dom, dd_with_class(dom, dl, class)?)
}

fn data_value(dom: &Dom, dd: NodeId) -> Option<i32> {
    dom.get_attr(dd, "data-value")?.trim().parse().ok()
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::render_markup;

    #[test]
    fn test_reads_rendered_blocks() {
        let nodes = vec![
            CanonicalNode::paragraph("We <em>ran</em>."),
            CanonicalNode::Separator,
            CanonicalNode::Figure {
                uri: "a.png".into(),
                caption: Some("Dawn".into()),
                attribution: Some("https://example.com/jane".into()),
            },
            CanonicalNode::ActionBlock {
                header: "Face Danger & flee".into(),
                items: vec![
                    ActionItem::Roll(RollResult::new(8, 2, 1, 5, 5).unwrap().with_reported_total(12)),
                    ActionItem::Progress(ProgressRoll::new(9, 2, 10)),
                    ActionItem::Plain("Take +1 momentum".into()),
                ],
            },
        ];
        let markup = render_markup(&nodes).unwrap();
        assert_eq!(parse_canonical(&markup), nodes);
    }

    #[test]
    fn test_data_attributes_are_authoritative() {
        let markup = r#"<aside class="action"><header>Strike</header>
            <dl class="roll" data-outcome="miss" data-match="false">
              <dd class="action-die" data-value="6">6</dd>
              <dd class="stat" data-value="3">3</dd>
              <dd class="add" data-value="0">0</dd>
              <dd class="total" data-value="9">9</dd>
              <dd class="challenge-die" data-value="1">1</dd>
              <dd class="challenge-die" data-value="2">2</dd>
            </dl></aside>"#;
        let nodes = parse_canonical(markup);
        let CanonicalNode::ActionBlock { items, .. } = &nodes[0] else {
            panic!("expected an action block");
        };
        let ActionItem::Roll(roll) = items[0] else {
            panic!("expected a roll");
        };
        assert_eq!(roll.outcome, Outcome::Miss);
        assert_eq!(roll.total, 9);
    }

    #[test]
    fn test_malformed_roll_becomes_plain() {
        let markup = r#"<aside class="action"><header>Strike</header><dl class="roll" data-outcome="bogus"><dd class="stat">two</dd></dl></aside>"#;
        let nodes = parse_canonical(markup);
        assert_eq!(
            nodes,
            vec![CanonicalNode::ActionBlock {
                header: "Strike".into(),
                items: vec![ActionItem::Plain("two".into())],
            }]
        );
    }

    #[test]
    fn test_unknown_elements_become_paragraphs() {
        let nodes = parse_canonical("<h2>Day <b>two</b></h2> loose text");
        assert_eq!(
            nodes,
            vec![
                CanonicalNode::paragraph("Day <b>two</b>"),
                CanonicalNode::paragraph("loose text"),
            ]
        );
    }

    #[test]
    fn test_script_url_figure_is_dropped() {
        let nodes = parse_canonical(r#"<figure><img src="javascript:alert(1)"></figure><p>After.</p>"#);
        assert_eq!(nodes, vec![CanonicalNode::paragraph("After.")]);
    }
}
