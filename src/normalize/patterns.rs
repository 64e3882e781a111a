//! Cached text-classification patterns.
//!
//! Uses LazyLock to compile each pattern once on first use.

use regex_lite::Regex;
use std::sync::LazyLock;

/// Line-break markup and entities stripped before classifying a text run.
pub static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)&nbsp;|\r|\n|<br\s*/?>|</br>").unwrap());

/// Leading bracket pair of an action line, with whatever follows it.
pub static ACTION_BRACKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]*)\](.*)$").unwrap());

/// `[<outcome>:] <action> + <stat> + <add> = <total> vs <c1> | <c2>`
pub static ROLL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:(?:miss|weak hit|strong hit)[^:]*:\s*)?(\d+)\s*\+\s*(\d+)\s*\+\s*(\d+)\s*=\s*(\d+)\s*vs\.?\s*(\d+)\s*\|\s*(\d+)\s*$",
    )
    .unwrap()
});

/// `[<outcome>:] [progress [roll]:] <score> vs <c1> | <c2>`
pub static PROGRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:(?:miss|weak hit|strong hit)[^:]*:\s*)?(?:progress(?:\s+roll)?\s*:?\s*)?(\d+)\s*vs\.?\s*(\d+)\s*\|\s*(\d+)\s*$",
    )
    .unwrap()
});

/// `((Credit: <attribution>)) <caption>`; the label is optional and the
/// attribution may hold one level of parentheses.
pub static ATTRIBUTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\(\((?:credit:\s*)?((?:[^()]|\([^()]*\))+?)\s*\)\)(.*)$").unwrap()
});

/// `((Image: <uri>))`, used in faction notes.
pub static IMAGE_DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\(\(image:\s*([^)]+?)\s*\)\)").unwrap());

/// Strip line-break markup and surrounding whitespace from a text run.
pub fn clean_line(text: &str) -> String {
    LINE_BREAK_RE.replace_all(text, "").trim().to_string()
}
