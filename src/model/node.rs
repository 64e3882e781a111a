//! Raw and canonical node types.

use serde::{Deserialize, Serialize};

/// One child of an entry's root content container, in document order.
///
/// Produced fresh per entry by [`crate::dom::read_raw_nodes`] and consumed
/// once by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawNode {
    /// A bare text run.
    Text(String),
    /// An inline image, by URI.
    Image(String),
    /// A block or inline element with its sanitized inner markup.
    Element {
        /// Lowercase local tag name (`p`, `div`, `hr`, ...).
        tag: String,
        /// Inner markup, re-serialized and sanitized.
        markup: String,
        children: Vec<RawNode>,
    },
}

impl RawNode {
    /// Concatenated text of this node and all its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            RawNode::Text(text) => out.push_str(text),
            RawNode::Image(_) => {}
            RawNode::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Tag name for element nodes.
    pub fn tag(&self) -> Option<&str> {
        match self {
            RawNode::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }
}

/// Outcome of an action or progress roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Miss,
    WeakHit,
    StrongHit,
}

impl Outcome {
    /// Resolve a score against two challenge dice.
    ///
    /// Beating both dice is a strong hit, beating exactly one is a weak hit,
    /// and ties go to the dice.
    pub fn classify(score: i32, challenge1: i32, challenge2: i32) -> Self {
        match (score > challenge1, score > challenge2) {
            (true, true) => Outcome::StrongHit,
            (true, false) | (false, true) => Outcome::WeakHit,
            (false, false) => Outcome::Miss,
        }
    }

    /// Human-readable label, as printed in session logs.
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Miss => "Miss",
            Outcome::WeakHit => "Weak Hit",
            Outcome::StrongHit => "Strong Hit",
        }
    }

    /// Class name used by the markup serializer.
    pub fn class_name(self) -> &'static str {
        match self {
            Outcome::Miss => "miss",
            Outcome::WeakHit => "weak-hit",
            Outcome::StrongHit => "strong-hit",
        }
    }

    /// Inverse of [`Outcome::class_name`].
    pub fn from_class_name(name: &str) -> Option<Self> {
        match name {
            "miss" => Some(Outcome::Miss),
            "weak-hit" => Some(Outcome::WeakHit),
            "strong-hit" => Some(Outcome::StrongHit),
            _ => None,
        }
    }
}

/// A parsed action roll: action die plus stat plus adds against two
/// challenge dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    pub action: i32,
    pub stat: i32,
    pub add: i32,
    /// Always `action + stat + add`.
    pub total: i32,
    /// The total as written in the source line, kept for audit only.
    pub reported_total: Option<i32>,
    pub challenge1: i32,
    pub challenge2: i32,
    pub outcome: Outcome,
    pub matched: bool,
}

impl RollResult {
    /// Build a roll from its components, computing total, outcome and match.
    ///
    /// Returns `None` if the total overflows.
    pub fn new(action: i32, stat: i32, add: i32, challenge1: i32, challenge2: i32) -> Option<Self> {
        let total = action.checked_add(stat)?.checked_add(add)?;
        Some(Self {
            action,
            stat,
            add,
            total,
            reported_total: None,
            challenge1,
            challenge2,
            outcome: Outcome::classify(total, challenge1, challenge2),
            matched: challenge1 == challenge2,
        })
    }

    /// Attach the literal total from the source text.
    pub fn with_reported_total(mut self, reported: i32) -> Self {
        self.reported_total = Some(reported);
        self
    }

    /// True when the source's literal total disagrees with the computed one.
    pub fn total_diverges(&self) -> bool {
        self.reported_total.is_some_and(|t| t != self.total)
    }

    /// Outcome label with the match suffix, e.g. `Strong Hit With a Match`.
    pub fn outcome_text(&self) -> String {
        outcome_text(self.outcome, self.matched)
    }
}

/// A progress roll: a fixed progress score against two challenge dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRoll {
    pub score: i32,
    pub challenge1: i32,
    pub challenge2: i32,
    pub outcome: Outcome,
    pub matched: bool,
}

impl ProgressRoll {
    pub fn new(score: i32, challenge1: i32, challenge2: i32) -> Self {
        Self {
            score,
            challenge1,
            challenge2,
            outcome: Outcome::classify(score, challenge1, challenge2),
            matched: challenge1 == challenge2,
        }
    }

    pub fn outcome_text(&self) -> String {
        outcome_text(self.outcome, self.matched)
    }
}

fn outcome_text(outcome: Outcome, matched: bool) -> String {
    if matched {
        format!("{} With a Match", outcome.label())
    } else {
        outcome.label().to_string()
    }
}

/// One line inside an action block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum ActionItem {
    Plain(String),
    Roll(RollResult),
    Progress(ProgressRoll),
}

/// Normalized, order-preserving content element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CanonicalNode {
    /// A paragraph block holding inner markup.
    Paragraph { markup: String },
    /// A horizontal rule.
    Separator,
    /// An image with optional caption and attribution.
    Figure {
        uri: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attribution: Option<String>,
    },
    /// A group of consecutive action lines under one header.
    ActionBlock {
        header: String,
        items: Vec<ActionItem>,
    },
}

impl CanonicalNode {
    /// Paragraph carrying already-escaped markup.
    pub fn paragraph(markup: impl Into<String>) -> Self {
        CanonicalNode::Paragraph {
            markup: markup.into(),
        }
    }

    /// Figure without caption or attribution.
    pub fn figure(uri: impl Into<String>) -> Self {
        CanonicalNode::Figure {
            uri: uri.into(),
            caption: None,
            attribution: None,
        }
    }

    /// Action block with no items yet.
    pub fn action_block(header: impl Into<String>) -> Self {
        CanonicalNode::ActionBlock {
            header: header.into(),
            items: Vec::new(),
        }
    }
}
