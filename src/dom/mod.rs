//! Markup parsing and the raw node reader.
//!
//! Entry markup is parsed with html5ever into an arena DOM ([`Dom`]), from
//! which [`read_raw_nodes`] produces the flat [`crate::model::RawNode`]
//! sequence the normalizer consumes. The same DOM backs the canonical
//! markup reader in [`crate::import`].

mod arena;
mod reader;
mod serialize;
mod tree_sink;

pub use arena::{Attribute, Children, Dom, Node, NodeData, NodeId};
pub use reader::read_raw_nodes;
pub use serialize::{inner_html, is_safe_url, outer_html};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::DomSink;

/// Parse a markup string (fragment or full document) into a [`Dom`].
///
/// Fragments end up under `<body>`, the way a browser would place them.
pub fn parse_markup(markup: &str) -> Dom {
    let sink = DomSink::new();
    parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(markup.as_bytes())
        .into_dom()
}

/// Plain text of a markup fragment, line breaks and whitespace runs
/// collapsed to single spaces.
pub fn markup_text(markup: &str) -> String {
    let dom = parse_markup(markup);
    let mut text = String::new();
    if let Some(body) = dom.find_by_tag("body") {
        collect_text(&dom, body, &mut text);
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(dom: &Dom, id: NodeId, out: &mut String) {
    for child in dom.children(id) {
        if let Some(text) = dom.text_content(child) {
            out.push_str(text);
        } else if dom.element_name(child).is_some_and(|n| n.as_ref() == "br") {
            out.push(' ');
        } else {
            collect_text(dom, child, out);
        }
    }
}
