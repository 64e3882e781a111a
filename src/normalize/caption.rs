//! Attribution and caption extraction for `((...))` delimited lines.
//!
//! Journal images are followed by a credit line such as
//! `((Credit: Jane Doe))`; faction notes use the same delimiters for
//! `((Image: uri))` and `((Credit: ...))` lines.

use super::patterns::{ATTRIBUTION_RE, IMAGE_DIRECTIVE_RE};

/// Opening delimiter of a caption line.
pub const CAPTION_DELIMITER: &str = "((";

/// The parts of a caption line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CaptionLine {
    /// Text inside the delimiters, minus an optional `Credit:` label.
    pub attribution: Option<String>,
    /// Text following the closing delimiter.
    pub caption: Option<String>,
}

/// Split a caption line into attribution and trailing caption.
///
/// Returns `None` when `text` does not start with `((`.
pub fn parse_caption_line(text: &str) -> Option<CaptionLine> {
    let text = text.trim();
    if !text.starts_with(CAPTION_DELIMITER) {
        return None;
    }

    if let Some(caps) = ATTRIBUTION_RE.captures(text) {
        return Some(CaptionLine {
            attribution: non_empty(&caps[1]),
            caption: non_empty(&caps[2]),
        });
    }

    // Unterminated or nested delimiters: take everything inside.
    let inner = text[CAPTION_DELIMITER.len()..].trim_end_matches(')');
    let inner = strip_credit_label(inner);
    Some(CaptionLine {
        attribution: non_empty(inner),
        caption: None,
    })
}

/// Attribution from a `((Credit: X))` line.
///
/// `None` when the line does not start with `((` or the delimiters are empty.
pub fn extract_attribution(text: &str) -> Option<String> {
    parse_caption_line(text).and_then(|line| line.attribution)
}

/// Image URI from a `((Image: uri))` line.
pub fn extract_image_directive(text: &str) -> Option<String> {
    IMAGE_DIRECTIVE_RE
        .captures(text.trim())
        .and_then(|caps| non_empty(&caps[1]))
}

fn strip_credit_label(text: &str) -> &str {
    let trimmed = text.trim_start();
    match trimmed.get(..7) {
        Some(label) if label.eq_ignore_ascii_case("credit:") => &trimmed[7..],
        _ => trimmed,
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
