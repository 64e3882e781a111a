//! Journal normalization: raw nodes to canonical nodes.
//!
//! The normalizer makes one pass over an entry's [`RawNode`]s, carrying an
//! explicit `State` from node to node:
//!
//! - **Action lines** (`[...]`) open an action block or continue the open
//!   one. A line whose text starts with a vocabulary term that the open
//!   block's term does not start with opens a fresh block; other bracketed
//!   lines are items of the open block, parsed as rolls where possible.
//! - **Images** wait for a `((Credit: ...))` line to complete their figure.
//! - **Separators** (`<hr>` or a run of rule glyphs) and ordinary content
//!   close whatever is open before being emitted.
//!
//! Nothing is ever revisited: at most one block or figure is open at a time,
//! and whatever is still open at the end of input is flushed as-is.

mod caption;
mod patterns;
mod roll;

pub use caption::{
    CAPTION_DELIMITER, CaptionLine, extract_attribution, extract_image_directive,
    parse_caption_line,
};
pub use patterns::clean_line;
pub use roll::{
    RollError, classify, parse_action_item, parse_progress, parse_roll, try_parse_progress,
    try_parse_roll,
};

use patterns::ACTION_BRACKET_RE;

use crate::dom::read_raw_nodes;
use crate::export::escape_xml;
use crate::model::{ActionItem, CanonicalNode, JournalEntry, RawNode, SourceEntry};
use crate::util::{count_byte, strip_prefix_ignore_case};
use crate::vocabulary::Vocabulary;

/// Configuration for normalization.
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    /// Characters that, repeated, form a section-break line.
    pub separator_glyphs: Vec<char>,
    /// Minimum glyph count for a separator line.
    pub min_separator_len: usize,
    /// Process the children of an element holding several `[` in place of
    /// the element itself, so `<br>`-joined action lines are seen one by one.
    pub expand_multi_action_elements: bool,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            separator_glyphs: vec!['—', '―', '─', '━', '-', '*', '_'],
            min_separator_len: 3,
            expand_multi_action_elements: true,
        }
    }
}

/// State carried between raw nodes.
#[derive(Debug)]
enum State {
    Idle,
    InAction {
        header: String,
        /// Vocabulary term recognized on the opening line, if any.
        open_name: Option<String>,
        items: Vec<ActionItem>,
    },
    InFigure {
        uri: String,
    },
}

impl State {
    /// Emit whatever is open and go back to idle.
    fn flush(self, out: &mut Vec<CanonicalNode>) {
        match self {
            State::Idle => {}
            State::InAction { header, items, .. } => {
                out.push(CanonicalNode::ActionBlock { header, items });
            }
            State::InFigure { uri } => out.push(CanonicalNode::figure(uri)),
        }
    }
}

/// Converts raw nodes into canonical nodes against a shared vocabulary.
#[derive(Debug, Clone)]
pub struct Normalizer<'v> {
    vocabulary: &'v Vocabulary,
    config: NormalizeConfig,
}

impl<'v> Normalizer<'v> {
    pub fn new(vocabulary: &'v Vocabulary) -> Self {
        Self::with_config(vocabulary, NormalizeConfig::default())
    }

    pub fn with_config(vocabulary: &'v Vocabulary, config: NormalizeConfig) -> Self {
        Self { vocabulary, config }
    }

    /// Normalize a raw node sequence.
    pub fn normalize(&self, nodes: Vec<RawNode>) -> Vec<CanonicalNode> {
        let mut out = Vec::new();
        let state = nodes
            .into_iter()
            .fold(State::Idle, |state, node| self.step(state, node, &mut out));
        state.flush(&mut out);
        out
    }

    /// Read and normalize an entry's markup.
    pub fn normalize_markup(&self, markup: &str) -> Vec<CanonicalNode> {
        self.normalize(read_raw_nodes(markup))
    }

    /// Normalize a stored entry, carrying its metadata across.
    pub fn normalize_entry(&self, entry: &SourceEntry) -> JournalEntry {
        let content = self.normalize_markup(&entry.content);
        tracing::debug!(title = %entry.title, nodes = content.len(), "normalized entry");
        JournalEntry {
            title: entry.title.clone(),
            content,
            lead_image: entry.image.clone(),
            slugline: entry.slugline.clone(),
            pinned: entry.pinned,
        }
    }

    fn step(&self, state: State, node: RawNode, out: &mut Vec<CanonicalNode>) -> State {
        match node {
            RawNode::Image(uri) => {
                state.flush(out);
                State::InFigure { uri }
            }
            RawNode::Element { ref tag, .. } if tag == "hr" => {
                state.flush(out);
                out.push(CanonicalNode::Separator);
                State::Idle
            }
            RawNode::Element { children, .. }
                if self.config.expand_multi_action_elements
                    && children.iter().map(|c| count_byte(&c.text_content(), b'[')).sum::<usize>() > 1 =>
            {
                children
                    .into_iter()
                    .fold(state, |state, child| self.step(state, child, out))
            }
            node => self.step_text(state, node, out),
        }
    }

    fn step_text(&self, state: State, node: RawNode, out: &mut Vec<CanonicalNode>) -> State {
        let raw_text = node.text_content();
        let text = clean_line(&raw_text);
        if text.is_empty() {
            return state;
        }

        let state = match state {
            State::InFigure { uri } if text.starts_with(CAPTION_DELIMITER) => {
                let line = parse_caption_line(&text).unwrap_or_default();
                out.push(CanonicalNode::Figure {
                    uri,
                    caption: line.caption,
                    attribution: line.attribution,
                });
                return State::Idle;
            }
            State::InFigure { uri } => {
                out.push(CanonicalNode::figure(uri));
                State::Idle
            }
            other => other,
        };

        if self.is_separator(&text) {
            state.flush(out);
            out.push(CanonicalNode::Separator);
            return State::Idle;
        }

        if text.starts_with('[')
            && let Some(action_text) = action_text(&text)
        {
            return self.step_action(state, action_text, out);
        }

        state.flush(out);
        let markup = match node {
            RawNode::Element { markup, .. } => markup,
            _ => escape_xml(raw_text.trim()),
        };
        out.push(CanonicalNode::Paragraph { markup });
        State::Idle
    }

    fn step_action(&self, state: State, action_text: &str, out: &mut Vec<CanonicalNode>) -> State {
        let detected = self.vocabulary.match_prefix(action_text);

        match state {
            State::InAction {
                header,
                open_name,
                mut items,
            } if !starts_new_block(detected, open_name.as_deref()) => {
                let remainder = match open_name.as_deref() {
                    Some(name) => strip_term(action_text, name),
                    None => action_text,
                };
                items.push(parse_action_item(remainder));
                State::InAction {
                    header,
                    open_name,
                    items,
                }
            }
            other => {
                other.flush(out);
                tracing::debug!(header = action_text, term = detected, "opening action block");
                State::InAction {
                    header: action_text.to_string(),
                    open_name: detected.map(str::to_string),
                    items: Vec::new(),
                }
            }
        }
    }

    fn is_separator(&self, text: &str) -> bool {
        let mut count = 0;
        for c in text.chars().filter(|c| !c.is_whitespace()) {
            if !self.config.separator_glyphs.contains(&c) {
                return false;
            }
            count += 1;
        }
        count >= self.config.min_separator_len
    }
}

/// The text of an action line: the content of its leading bracket pair.
///
/// Text after the closing bracket is not part of the action. Returns `None`
/// for an empty bracket pair.
fn action_text(line: &str) -> Option<&str> {
    let inner = match ACTION_BRACKET_RE.captures(line) {
        Some(caps) => {
            let (inner, trailer) = match (caps.get(1), caps.get(2)) {
                (Some(inner), Some(trailer)) => (inner.as_str(), trailer.as_str()),
                _ => return None,
            };
            if !trailer.trim().is_empty() {
                tracing::debug!(trailer, "ignoring text after action bracket");
            }
            inner
        }
        None => &line[1..],
    };
    let inner = inner.trim();
    (!inner.is_empty()).then_some(inner)
}

/// A recognized term opens a new block unless the open block's own term
/// starts with it. Unrecognized lines always continue.
fn starts_new_block(detected: Option<&str>, open_name: Option<&str>) -> bool {
    match detected {
        None => false,
        Some(term) => !open_name.is_some_and(|open| strip_prefix_ignore_case(open, term).is_some()),
    }
}

/// Remove a repeated term (and a following colon) from a continuation line.
fn strip_term<'a>(text: &'a str, term: &str) -> &'a str {
    let Some(rest) = strip_prefix_ignore_case(text, term) else {
        return text;
    };
    let rest = rest.trim_start();
    let rest = rest.strip_prefix(':').unwrap_or(rest).trim_start();
    if rest.is_empty() { text } else { rest }
}
