//! Whitespace and punctuation helpers for block text.

use regex::Regex;
use std::sync::LazyLock;

/// Leading run of closing or neutral punctuation. Letters, digits, marks,
/// whitespace and opening punctuation (`(`, `“`, `¿`, ...) end the run.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LEADING_PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\p{L}\p{N}\p{M}\p{Ps}\p{Pi}\s¿¡]+").expect("valid regex")
});

/// Whitespace that collapses to a single space.
///
/// No-break spaces are content, not layout, and are kept as written.
#[must_use]
pub fn is_collapsible(c: char) -> bool {
    c.is_whitespace() && c != '\u{00A0}' && c != '\u{202F}' && c != '\u{2007}'
}

/// Collapse runs of collapsible whitespace to a single space.
///
/// # Arguments
/// * `text` - Text to normalize
/// * `after_space` - Whether the text continues something that already ends
///   in whitespace (or starts a block); leading whitespace is then dropped
///
/// # Examples
/// ```
/// use scripture_blocks::text::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("a \n\t b ", false), "a b ");
/// assert_eq!(collapse_whitespace("  a", true), "a");
/// assert_eq!(collapse_whitespace("  a", false), " a");
/// ```
#[must_use]
pub fn collapse_whitespace(text: &str, after_space: bool) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_space = after_space;
    for c in text.chars() {
        if is_collapsible(c) {
            if !in_space {
                result.push(' ');
                in_space = true;
            }
        } else {
            result.push(c);
            in_space = false;
        }
    }
    result
}

/// Remove trailing collapsible whitespace in place.
pub fn trim_end_collapsible(text: &mut String) {
    let trimmed_len = text.trim_end_matches(is_collapsible).len();
    text.truncate(trimmed_len);
}

/// Whether the text has anything besides collapsible whitespace.
#[must_use]
pub fn has_content(text: &str) -> bool {
    text.chars().any(|c| !is_collapsible(c))
}

/// Split off the punctuation (and the whitespace right after it) that clings
/// to the start of a text.
///
/// Returns `(attached, rest)`. Leading whitespace alone is also attached, so
/// the rest never starts with whitespace.
///
/// # Examples
/// ```
/// use scripture_blocks::text::split_attached_prefix;
///
/// assert_eq!(split_attached_prefix("”, he said"), ("”, ", "he said"));
/// assert_eq!(split_attached_prefix(" and"), (" ", "and"));
/// assert_eq!(split_attached_prefix("and"), ("", "and"));
/// ```
#[must_use]
pub fn split_attached_prefix(text: &str) -> (&str, &str) {
    let punctuation_len = LEADING_PUNCTUATION
        .find(text)
        .map(|m| m.end())
        .unwrap_or(0);
    let after_punctuation = &text[punctuation_len..];
    let space_len = after_punctuation.len() - after_punctuation.trim_start_matches(is_collapsible).len();
    text.split_at(punctuation_len + space_len)
}
