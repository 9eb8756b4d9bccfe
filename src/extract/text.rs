//! Whitespace normalization and bounded truncation

use once_cell::sync::Lazy;
use regex::Regex;

// Horizontal whitespace touching a newline collapses into the newline.
// `[^\S\n]` is "whitespace except newline" so runs never eat line breaks.
static SPACE_BEFORE_NEWLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\S\n]+\n").unwrap());
static SPACE_AFTER_NEWLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[^\S\n]+").unwrap());
static BLANK_LINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Collapses whitespace noise left over from markup conversion
///
/// Idempotent: running it on already-normalized text changes nothing.
pub fn normalize(text: &str) -> String {
    let text = text.replace('\r', "");
    let text = SPACE_BEFORE_NEWLINE.replace_all(&text, "\n");
    let text = SPACE_AFTER_NEWLINE.replace_all(&text, "\n");
    let text = BLANK_LINE_RUNS.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Cuts text to at most `max` bytes at a char boundary, appending an
/// ellipsis when anything was removed
///
/// The ellipsis itself may push the result up to three bytes past `max`.
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut cut = max;
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    let mut out = text[..cut].to_string();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_space_around_newlines() {
        assert_eq!(normalize("a  \nb"), "a\nb");
        assert_eq!(normalize("a\n   b"), "a\nb");
        assert_eq!(normalize("a \n \n \n b"), "a\n\nb");
    }

    #[test]
    fn test_normalize_caps_blank_lines_at_one() {
        assert_eq!(normalize("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize("  line one   \n\n\n\n  line two  ");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_normalize_strips_carriage_returns() {
        assert_eq!(normalize("a\r\n\r\n\r\n\r\nb"), "a\n\nb");
    }

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
        assert_eq!(truncate_with_ellipsis("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_appends_ellipsis() {
        assert_eq!(truncate_with_ellipsis("hello world", 5), "hello…");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        // 'é' is two bytes; a cut at 1 would split it
        let out = truncate_with_ellipsis("été", 3);
        assert!(out.starts_with("ét") || out.starts_with("é"));
        assert!(out.ends_with('…'));
    }
}
