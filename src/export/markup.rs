//! Markup serializer - renders canonical nodes as sanitized markup.
//!
//! The element and class names are a contract with the site's stylesheet:
//! `aside.action`, `dl.roll`, `dl.progress`, `dd.action-die`, `dd.stat`,
//! `dd.add`, `dd.total`, `dd.challenge-die`, `dd.outcome`,
//! `p.action-item`. Outcome and match styling hang off the `dl`'s classes
//! and data attributes, so nothing downstream needs to re-derive them.
//!
//! # Example
//!
//! ```
//! use logbook::export::render_markup;
//! use logbook::model::CanonicalNode;
//!
//! let html = render_markup(&[CanonicalNode::paragraph("Hello"), CanonicalNode::Separator]).unwrap();
//! assert_eq!(html, "<p>Hello</p>\n<hr>\n");
//! ```

use std::fmt::Write;

use crate::error::{Error, Result};
use crate::model::{ActionItem, CanonicalNode, ProgressRoll, RollResult};

/// Render a canonical node sequence as markup.
///
/// Fails only on nodes that cannot come out of the normalizer: an action
/// block with neither header nor items, or a figure without an image.
pub fn render_markup(nodes: &[CanonicalNode]) -> Result<String> {
    let mut ctx = MarkupContext::default();
    for node in nodes {
        ctx.node(node)?;
    }
    Ok(ctx.out)
}

#[derive(Default)]
struct MarkupContext {
    out: String,
    indent_level: usize,
}

impl MarkupContext {
    fn indent(&mut self) {
        for _ in 0..self.indent_level {
            self.out.push_str("  ");
        }
    }

    /// Write one indented line.
    fn line(&mut self, content: &str) {
        self.indent();
        self.out.push_str(content);
        self.out.push('\n');
    }

    fn node(&mut self, node: &CanonicalNode) -> Result<()> {
        match node {
            CanonicalNode::Paragraph { markup } => self.line(&format!("<p>{markup}</p>")),
            CanonicalNode::Separator => self.line("<hr>"),
            CanonicalNode::Figure {
                uri,
                caption,
                attribution,
            } => {
                if uri.trim().is_empty() {
                    return Err(Error::Contract("figure without an image".to_string()));
                }
                self.figure(uri, caption.as_deref(), attribution.as_deref());
            }
            CanonicalNode::ActionBlock { header, items } => {
                if header.trim().is_empty() && items.is_empty() {
                    return Err(Error::Contract(
                        "action block with neither header nor items".to_string(),
                    ));
                }
                self.line(r#"<aside class="action">"#);
                self.indent_level += 1;
                self.line(&format!("<header>{}</header>", escape_xml(header)));
                for item in items {
                    self.item(item);
                }
                self.indent_level -= 1;
                self.line("</aside>");
            }
        }
        Ok(())
    }

    fn figure(&mut self, uri: &str, caption: Option<&str>, attribution: Option<&str>) {
        self.line("<figure>");
        self.indent_level += 1;
        self.line(&format!(
            r#"<img src="{}" alt="{}">"#,
            escape_xml(uri),
            escape_xml(caption.unwrap_or_default())
        ));
        if caption.is_some() || attribution.is_some() {
            let mut figcaption = String::from("<figcaption>");
            if let Some(caption) = caption {
                figcaption.push_str(&escape_xml(caption));
            }
            if let Some(attribution) = attribution {
                if caption.is_some() {
                    figcaption.push(' ');
                }
                figcaption.push_str("<cite>");
                figcaption.push_str(&attribution_markup(attribution));
                figcaption.push_str("</cite>");
            }
            figcaption.push_str("</figcaption>");
            self.line(&figcaption);
        }
        self.indent_level -= 1;
        self.line("</figure>");
    }

    fn item(&mut self, item: &ActionItem) {
        match item {
            ActionItem::Plain(text) => {
                self.line(&format!(r#"<p class="action-item">{}</p>"#, escape_xml(text)));
            }
            ActionItem::Roll(roll) => self.roll(roll),
            ActionItem::Progress(progress) => self.progress(progress),
        }
    }

    fn roll(&mut self, roll: &RollResult) {
        self.open_dl("roll", roll.outcome.class_name(), roll.matched);
        self.value_pair("Action", "action-die", roll.action);
        self.value_pair("Stat", "stat", roll.stat);
        self.value_pair("Add", "add", roll.add);
        self.line("<dt>Total</dt>");
        let mut total = format!(r#"<dd class="total" data-value="{}""#, roll.total);
        if let Some(reported) = roll.reported_total {
            let _ = write!(total, r#" data-reported="{reported}""#);
        }
        let _ = write!(total, ">{}</dd>", roll.total);
        self.line(&total);
        self.challenge_dice(roll.challenge1, roll.challenge2);
        self.outcome(roll.outcome.class_name(), &roll.outcome_text(), roll.matched);
        self.close_dl();
    }

    fn progress(&mut self, progress: &ProgressRoll) {
        self.open_dl("progress", progress.outcome.class_name(), progress.matched);
        self.value_pair("Progress Score", "progress-score", progress.score);
        self.challenge_dice(progress.challenge1, progress.challenge2);
        self.outcome(
            progress.outcome.class_name(),
            &progress.outcome_text(),
            progress.matched,
        );
        self.close_dl();
    }

    fn open_dl(&mut self, kind: &str, outcome: &str, matched: bool) {
        let match_class = if matched { " match" } else { "" };
        self.line(&format!(
            r#"<dl class="{kind} {outcome}{match_class}" data-outcome="{outcome}" data-match="{matched}">"#
        ));
        self.indent_level += 1;
    }

    fn close_dl(&mut self) {
        self.indent_level -= 1;
        self.line("</dl>");
    }

    fn value_pair(&mut self, label: &str, class: &str, value: i32) {
        self.line(&format!("<dt>{label}</dt>"));
        self.line(&format!(
            r#"<dd class="{class}" data-value="{value}">{value}</dd>"#
        ));
    }

    fn challenge_dice(&mut self, challenge1: i32, challenge2: i32) {
        self.value_pair("Challenge Die 1", "challenge-die", challenge1);
        self.value_pair("Challenge Die 2", "challenge-die", challenge2);
    }

    fn outcome(&mut self, class: &str, text: &str, matched: bool) {
        self.line("<dt>Outcome</dt>");
        self.line(&format!(
            r#"<dd class="outcome" data-value="{class}">{}</dd>"#,
            escape_xml(text)
        ));
        self.line("<dt>Match</dt>");
        self.line(&format!(
            r#"<dd class="match" data-value="{matched}">{}</dd>"#,
            if matched { "Yes" } else { "No" }
        ));
    }
}

/// Attribution text, linked when it is a web address.
fn attribution_markup(attribution: &str) -> String {
    let escaped = escape_xml(attribution);
    if attribution.starts_with("http://") || attribution.starts_with("https://") {
        format!(r#"<a href="{escaped}">{escaped}</a>"#)
    } else {
        escaped
    }
}

/// Escape special XML characters.
pub fn escape_xml(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
