//! Small text helpers shared across the pipeline.

use std::borrow::Cow;

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding
/// 3. Falls back to Windows-1252 (common in hand-edited exports)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    tracing::warn!("input is not valid UTF-8, decoding as Windows-1252");
    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Count occurrences of an ASCII byte in a string.
pub fn count_byte(text: &str, needle: u8) -> usize {
    memchr::memchr_iter(needle, text.as_bytes()).count()
}

/// Strip `prefix` from the start of `text`, comparing case-insensitively.
///
/// Compares character by character so the returned slice always starts on
/// a character boundary of `text`, even where lowercasing changes byte length.
pub fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut rest = text.char_indices();
    for p in prefix.chars() {
        let (_, t) = rest.next()?;
        if !t.to_lowercase().eq(p.to_lowercase()) {
            return None;
        }
    }
    let offset = rest.next().map(|(i, _)| i).unwrap_or(text.len());
    Some(&text[offset..])
}

/// Generate a GitHub-style slug from text.
///
/// Converts text to lowercase, replaces spaces and separators with hyphens,
/// and removes consecutive/leading/trailing hyphens.
///
/// # Examples
///
/// ```
/// use logbook::util::slugify;
///
/// assert_eq!(slugify("Iron Veil"), "iron-veil");
/// assert_eq!(slugify("Session 12: The Drift!"), "session-12-the-drift");
/// ```
pub fn slugify(text: &str) -> String {
    text.chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c.is_whitespace() || c == '-' || c == '_' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Make a title usable as a file name by replacing path separators and
/// characters most filesystems reject.
pub fn file_stem(title: &str) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8_with_bom() {
        let bytes = b"\xEF\xBB\xBF[{\"name\":\"Heal\"}]";
        assert_eq!(decode_text(bytes, None), "[{\"name\":\"Heal\"}]");
    }

    #[test]
    fn test_decode_windows_1252_fallback() {
        // 0x97 is an em dash in Windows-1252
        let bytes = b"a \x97 b";
        assert_eq!(decode_text(bytes, None), "a \u{2014} b");
    }

    #[test]
    fn test_count_byte() {
        assert_eq!(count_byte("[a] [b] c", b'['), 2);
        assert_eq!(count_byte("none", b'['), 0);
    }

    #[test]
    fn test_strip_prefix_ignore_case() {
        assert_eq!(strip_prefix_ignore_case("FACE DANGER: hit", "face danger"), Some(": hit"));
        assert_eq!(strip_prefix_ignore_case("Face", "Face"), Some(""));
        assert_eq!(strip_prefix_ignore_case("Fac", "Face"), None);
        assert_eq!(strip_prefix_ignore_case("Ébranler x", "ébranler"), Some(" x"));
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
        assert_eq!(slugify("a_b-c"), "a-b-c");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Session 3: Into/Out"), "Session 3- Into-Out");
        assert_eq!(file_stem("   "), "untitled");
    }
}
