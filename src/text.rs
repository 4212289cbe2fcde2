//! Small text helpers shared by the dispatcher and log lines.

use regex::Regex;
use std::sync::OnceLock;

/// Prefix of `s` holding at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Collapse runs of blank lines and horizontal whitespace the way
/// rendered page text reads, and trim both ends.
pub fn collapse_whitespace(s: &str) -> String {
    static BLANK_LINES: OnceLock<Regex> = OnceLock::new();
    static SPACES: OnceLock<Regex> = OnceLock::new();
    let spaces = SPACES.get_or_init(|| Regex::new(r"[ \t\u{a0}]+").expect("static regex"));
    let blank_lines =
        BLANK_LINES.get_or_init(|| Regex::new(r"\s*\n\s*\n\s*").expect("static regex"));

    let single_spaced = spaces.replace_all(s, " ");
    blank_lines
        .replace_all(&single_spaced, "\n\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("你好世界", 3), "你好世");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("", 0), "");
    }

    #[test]
    fn collapse_keeps_paragraphs() {
        let raw = "  Title \t\t here\n\n\n\n  Body   text\n next line  ";
        assert_eq!(collapse_whitespace(raw), "Title here\n\nBody text\n next line");
    }

    #[test]
    fn collapse_folds_tabs_and_nbsp() {
        assert_eq!(collapse_whitespace("a\u{a0}\u{a0}b\t\tc"), "a b c");
        assert_eq!(collapse_whitespace(" \n\n\t "), "");
    }
}
