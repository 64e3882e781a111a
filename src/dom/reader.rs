//! Raw node reader: entry markup to a flat sequence of [`RawNode`]s.
//!
//! This is the only place that knows about html5ever; the normalizer only
//! ever sees the closed [`RawNode`] union.

use super::arena::{Dom, NodeData, NodeId};
use super::serialize::{inner_html, is_dropped_element, is_safe_url};
use super::parse_markup;
use crate::model::RawNode;

/// Read the children of the entry's root container, in document order.
pub fn read_raw_nodes(markup: &str) -> Vec<RawNode> {
    let dom = parse_markup(markup);
    let Some(body) = dom.find_by_tag("body") else {
        return Vec::new();
    };
    read_children(&dom, body)
}

fn read_children(dom: &Dom, parent: NodeId) -> Vec<RawNode> {
    let mut out = Vec::new();
    for child in dom.children(parent) {
        read_node(dom, child, &mut out);
    }
    out
}

fn read_node(dom: &Dom, id: NodeId, out: &mut Vec<RawNode>) {
    let Some(node) = dom.get(id) else {
        return;
    };
    match &node.data {
        NodeData::Text(text) => out.push(RawNode::Text(text.clone())),
        NodeData::Comment | NodeData::Document => {}
        NodeData::Element { name, .. } => {
            let tag = name.local.as_ref();
            if dom.is_foreign(id) {
                tracing::warn!(tag, "unrecognized markup, keeping its text");
                out.push(RawNode::Text(dom.text_of(id)));
                return;
            }
            if is_dropped_element(tag) {
                tracing::debug!(tag, "dropping unsafe element");
                return;
            }
            if tag == "img" {
                out.extend(image_node(dom, id));
                return;
            }
            let images = wrapped_images(dom, id);
            if !images.is_empty() {
                out.extend(images.into_iter().filter_map(|img| image_node(dom, img)));
                return;
            }
            out.push(RawNode::Element {
                tag: tag.to_string(),
                markup: inner_html(dom, id),
                children: read_children(dom, id),
            });
        }
    }
}

fn image_node(dom: &Dom, img: NodeId) -> Option<RawNode> {
    match dom.get_attr(img, "src").map(str::trim) {
        Some(src) if src.is_empty() => {
            tracing::warn!("image without src, dropping it");
            None
        }
        Some(src) if !is_safe_url(src) => {
            tracing::warn!(src, "image with a script URL, dropping it");
            None
        }
        Some(src) => Some(RawNode::Image(src.to_string())),
        None => {
            tracing::warn!("image without src, dropping it");
            None
        }
    }
}

/// The images inside a wrapper element that has no text of its own, such
/// as `<p><img></p>`, `<figure><img></figure>` or a gallery paragraph.
fn wrapped_images(dom: &Dom, id: NodeId) -> Vec<NodeId> {
    if !dom.text_of(id).trim().is_empty() {
        return Vec::new();
    }
    dom.descendants_by_tag(id, "img")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawNode {
        RawNode::Text(s.to_string())
    }

    #[test]
    fn test_reads_paragraphs_in_order() {
        let nodes = read_raw_nodes("<p>One</p>two<p>Three <em>3</em></p>");
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].tag(), Some("p"));
        assert_eq!(nodes[1], text("two"));
        match &nodes[2] {
            RawNode::Element { tag, markup, children } => {
                assert_eq!(tag, "p");
                assert_eq!(markup, "Three <em>3</em>");
                assert_eq!(children.len(), 2);
            }
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn test_images_become_image_nodes() {
        let nodes = read_raw_nodes(
            r#"<img src="/img/a.png"><p><img src="/img/b.png"></p><figure> <img src="c.jpg"> </figure>"#,
        );
        assert_eq!(
            nodes,
            vec![
                RawNode::Image("/img/a.png".into()),
                RawNode::Image("/img/b.png".into()),
                RawNode::Image("c.jpg".into()),
            ]
        );
    }

    #[test]
    fn test_every_image_in_a_textless_wrapper_is_kept() {
        let nodes = read_raw_nodes(r#"<p><img src="a.png"><br><img src="b.png"></p>"#);
        assert_eq!(
            nodes,
            vec![RawNode::Image("a.png".into()), RawNode::Image("b.png".into())]
        );
    }

    #[test]
    fn test_script_url_image_is_dropped() {
        let nodes = read_raw_nodes(
            r#"<img src="javascript:alert(1)"><p><img src=" JavaScript:x"></p><img src="ok.png">"#,
        );
        assert_eq!(nodes, vec![RawNode::Image("ok.png".into())]);
    }

    #[test]
    fn test_image_with_text_stays_element() {
        let nodes = read_raw_nodes(r#"<p><img src="a.png"> The wreck</p>"#);
        assert_eq!(nodes[0].tag(), Some("p"));
    }

    #[test]
    fn test_image_without_src_is_dropped() {
        assert!(read_raw_nodes("<img alt=\"nothing\">").is_empty());
    }

    #[test]
    fn test_foreign_markup_degrades_to_text() {
        let nodes = read_raw_nodes("<svg><text>Sector map</text></svg>");
        assert_eq!(nodes, vec![text("Sector map")]);
    }

    #[test]
    fn test_scripts_and_comments_are_skipped() {
        let nodes = read_raw_nodes("<!-- x --><script>bad()</script><p>ok</p>");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].text_content(), "ok");
    }

    #[test]
    fn test_empty_markup() {
        assert!(read_raw_nodes("").is_empty());
    }
}
