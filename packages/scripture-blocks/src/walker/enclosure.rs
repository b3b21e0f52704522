//! Enclosure punctuation around elided verses.
//!
//! Some translations print an omitted verse as a bracketed verse number with
//! nothing inside ("those days. [{16}] And"). When the verse is elided the
//! brackets would be left hanging, so both halves are removed too.

use crate::text::is_collapsible;

/// Matching open/close bracket pairs.
pub(crate) const BRACKET_PAIRS: [(char, char); 15] = [
    ('[', ']'),
    ('{', '}'),
    ('(', ')'),
    ('\u{FF08}', '\u{FF09}'),
    ('\u{FF3B}', '\u{FF3D}'),
    ('\u{FF5B}', '\u{FF5D}'),
    ('\u{3010}', '\u{3011}'),
    ('\u{3014}', '\u{3015}'),
    ('\u{3016}', '\u{3017}'),
    ('\u{3018}', '\u{3019}'),
    ('\u{301A}', '\u{301B}'),
    ('\u{300C}', '\u{300D}'),
    ('\u{300E}', '\u{300F}'),
    ('\u{3008}', '\u{3009}'),
    ('\u{300A}', '\u{300B}'),
];

#[must_use]
pub(crate) fn is_opener(c: char) -> bool {
    BRACKET_PAIRS.iter().any(|(open, _)| *open == c)
}

#[must_use]
pub(crate) fn closer_for(open: char) -> Option<char> {
    BRACKET_PAIRS
        .iter()
        .find(|(o, _)| *o == open)
        .map(|(_, close)| *close)
}

#[must_use]
fn opener_for(close: char) -> Option<char> {
    BRACKET_PAIRS
        .iter()
        .find(|(_, c)| *c == close)
        .map(|(open, _)| *open)
}

/// What the text of a verse consists of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum VerseContent {
    /// Nothing but whitespace.
    Empty,
    /// Only brackets and whitespace. `closers` lists the closing brackets
    /// whose openers precede the verse, in reading order.
    Enclosure { closers: Vec<char> },
    /// Real text.
    Text,
}

impl VerseContent {
    /// Classify the text between a verse marker and the next one.
    pub(crate) fn classify(content: &str) -> Self {
        let mut open: Vec<char> = Vec::new();
        let mut closers = Vec::new();
        let mut saw_bracket = false;

        for c in content.chars().filter(|c| !is_collapsible(*c)) {
            if is_opener(c) {
                open.push(c);
            } else if let Some(opener) = opener_for(c) {
                if open.last() == Some(&opener) {
                    open.pop();
                } else if open.is_empty() {
                    closers.push(c);
                } else {
                    return Self::Text;
                }
            } else {
                return Self::Text;
            }
            saw_bracket = true;
        }

        match (saw_bracket, open.is_empty()) {
            (false, _) => Self::Empty,
            (true, true) => Self::Enclosure { closers },
            // An opener whose closer lies beyond the verse; the bracket
            // belongs to whatever follows.
            (true, false) => Self::Text,
        }
    }
}

/// Pair the closing brackets of an elided verse with the openers trailing
/// the block.
///
/// # Arguments
/// * `trailing_openers` - Openers at the end of the current block, in reading order
/// * `closers` - Unmatched closers inside the verse, in reading order
///
/// # Returns
/// How many trailing openers to remove, or `None` if the closers cannot all
/// be paired.
pub(crate) fn match_closers(trailing_openers: &[char], closers: &[char]) -> Option<usize> {
    if closers.len() > trailing_openers.len() {
        return None;
    }
    let paired = trailing_openers
        .iter()
        .rev()
        .zip(closers.iter())
        .all(|(open, close)| closer_for(*open) == Some(*close));
    paired.then_some(closers.len())
}
