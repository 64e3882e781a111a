//! Roll parser and outcome classifier.
//!
//! Rolls arrive as free text inside action lines, e.g.
//! `Strong Hit: 8 + 2 + 1 = 11 vs 5 | 3`. The literal total in the text is
//! never trusted: the outcome is classified from `action + stat + add`.

use regex_lite::Captures;
use thiserror::Error;

use super::patterns::{PROGRESS_RE, ROLL_RE};
use crate::model::{ActionItem, Outcome, ProgressRoll, RollResult};

/// Why a line did not yield a roll.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RollError {
    #[error("text does not have the shape of a roll")]
    NoMatch,

    #[error("malformed roll: {field} {value:?} is not a usable integer")]
    Malformed { field: &'static str, value: String },
}

/// Parse an action roll line. See [`try_parse_roll`] for the failure cases.
pub fn parse_roll(text: &str) -> Option<RollResult> {
    try_parse_roll(text).ok()
}

/// Parse an action roll line, reporting whether it was no roll at all or a
/// roll with unusable numbers.
pub fn try_parse_roll(text: &str) -> Result<RollResult, RollError> {
    let caps = ROLL_RE.captures(text).ok_or(RollError::NoMatch)?;
    let action = field(&caps, 1, "action")?;
    let stat = field(&caps, 2, "stat")?;
    let add = field(&caps, 3, "add")?;
    let reported = field(&caps, 4, "total")?;
    let challenge1 = field(&caps, 5, "challenge1")?;
    let challenge2 = field(&caps, 6, "challenge2")?;

    let roll = RollResult::new(action, stat, add, challenge1, challenge2).ok_or_else(|| {
        RollError::Malformed {
            field: "total",
            value: format!("{action} + {stat} + {add}"),
        }
    })?;
    Ok(roll.with_reported_total(reported))
}

/// Parse a progress roll line (`<score> vs <c1> | <c2>`).
pub fn parse_progress(text: &str) -> Option<ProgressRoll> {
    try_parse_progress(text).ok()
}

pub fn try_parse_progress(text: &str) -> Result<ProgressRoll, RollError> {
    let caps = PROGRESS_RE.captures(text).ok_or(RollError::NoMatch)?;
    Ok(ProgressRoll::new(
        field(&caps, 1, "score")?,
        field(&caps, 2, "challenge1")?,
        field(&caps, 3, "challenge2")?,
    ))
}

/// Resolve a score against two challenge dice.
pub fn classify(score: i32, challenge1: i32, challenge2: i32) -> Outcome {
    Outcome::classify(score, challenge1, challenge2)
}

/// Turn one continuation line of an action block into an item.
///
/// Action rolls are tried first, then progress rolls; anything else,
/// including malformed rolls, stays a plain item holding the text.
pub fn parse_action_item(text: &str) -> ActionItem {
    match try_parse_roll(text) {
        Ok(roll) => {
            if roll.total_diverges() {
                tracing::warn!(
                    computed = roll.total,
                    reported = roll.reported_total,
                    line = text,
                    "roll total disagrees with its dice, classifying by the computed total"
                );
            }
            return ActionItem::Roll(roll);
        }
        Err(err @ RollError::Malformed { .. }) => {
            tracing::warn!(line = text, "{err}");
            return ActionItem::Plain(text.to_string());
        }
        Err(RollError::NoMatch) => {}
    }

    match try_parse_progress(text) {
        Ok(progress) => ActionItem::Progress(progress),
        Err(err) => {
            if let RollError::Malformed { .. } = err {
                tracing::warn!(line = text, "{err}");
            }
            ActionItem::Plain(text.to_string())
        }
    }
}

fn field(caps: &Captures<'_>, index: usize, name: &'static str) -> Result<i32, RollError> {
    let raw = caps.get(index).map(|m| m.as_str()).unwrap_or_default();
    raw.parse().map_err(|_| RollError::Malformed {
        field: name,
        value: raw.to_string(),
    })
}
