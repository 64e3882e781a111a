//! Sanitizing markup serializer for arena nodes.
//!
//! Only the constructs seen in exported journals need to survive: inline
//! formatting, links, line breaks, images and simple block wrappers.
//! Scripts, embedded frames, event handlers and `javascript:` URLs are
//! dropped on the way out.

use std::fmt::Write;

use super::arena::{Dom, NodeData, NodeId};
use crate::export::escape_xml;

/// Elements removed together with their content.
const DROPPED_ELEMENTS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "template", "noscript",
];

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

/// Attributes whose values are URLs.
const URL_ATTRIBUTES: &[&str] = &["href", "src", "action", "formaction", "xlink:href"];

pub fn is_dropped_element(tag: &str) -> bool {
    DROPPED_ELEMENTS.contains(&tag)
}

/// Serialize the children of `id`.
pub fn inner_html(dom: &Dom, id: NodeId) -> String {
    let mut out = String::new();
    for child in dom.children(id) {
        write_node(dom, child, &mut out);
    }
    out
}

/// Serialize `id` itself, including its own tag.
pub fn outer_html(dom: &Dom, id: NodeId) -> String {
    let mut out = String::new();
    write_node(dom, id, &mut out);
    out
}

fn write_node(dom: &Dom, id: NodeId, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };
    match &node.data {
        NodeData::Text(text) => out.push_str(&escape_xml(text)),
        NodeData::Comment | NodeData::Document => {}
        NodeData::Element { name, attrs, .. } => {
            let tag = name.local.as_ref();
            if is_dropped_element(tag) {
                return;
            }
            out.push('<');
            out.push_str(tag);
            for attr in attrs {
                let attr_name = attr.name.local.as_ref();
                if !is_safe_attribute(attr_name, &attr.value) {
                    continue;
                }
                // Writing to a String cannot fail.
                let _ = write!(out, " {}=\"{}\"", attr_name, escape_xml(&attr.value));
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&tag) {
                return;
            }
            for child in dom.children(id) {
                write_node(dom, child, out);
            }
            let _ = write!(out, "</{}>", tag);
        }
    }
}

fn is_safe_attribute(name: &str, value: &str) -> bool {
    if name.len() > 2 && name.as_bytes()[..2].eq_ignore_ascii_case(b"on") {
        return false;
    }
    !URL_ATTRIBUTES.contains(&name) || is_safe_url(value)
}

/// False for `javascript:` and `vbscript:` URLs, ignoring case and the
/// whitespace or control characters browsers skip.
pub fn is_safe_url(value: &str) -> bool {
    let scheme: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take(11)
        .collect::<String>()
        .to_ascii_lowercase();
    !(scheme.starts_with("javascript:") || scheme.starts_with("vbscript:"))
}
