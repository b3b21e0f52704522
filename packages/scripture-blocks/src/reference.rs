//! Chapter and verse tracking.
//!
//! Verse markers carry free text ("12", "12-14", "12 – 14", "-"). The
//! tracker turns that text into verse numbers and bridges, keeping the
//! current chapter and the verse (or bridge) last accepted.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Characters stripped from verse tokens before parsing.
const INVISIBLE_MARKS: [char; 5] = ['\u{200B}', '\u{200E}', '\u{200F}', '\u{2060}', '\u{FEFF}'];

/// Single verse number with an optional segment letter ("12", "12a").
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SINGLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\p{L}?$").expect("valid regex"));

/// Two verse numbers joined by a dash-like character.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static BRIDGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\p{L}?[-\u{2010}-\u{2015}\u{2212}\u{FE63}\u{FF0D}](\d+)\p{L}?$")
        .expect("valid regex")
});

/// Token consisting of dashes only.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DASH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-\u{2010}-\u{2015}\u{2212}\u{FE63}\u{FF0D}]+$").expect("valid regex")
});

/// Lexical reading of a verse-marker token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerseToken {
    /// A single verse number.
    Single(u32),
    /// Two numbers joined by a dash, not yet checked for ordering.
    Bridge { start: u32, end: u32 },
    /// Only dash (and whitespace) characters.
    Dash,
    /// Anything else.
    Malformed,
}

impl VerseToken {
    /// Parse the text attached to a verse marker.
    ///
    /// # Examples
    /// ```
    /// use scripture_blocks::reference::VerseToken;
    ///
    /// assert_eq!(VerseToken::parse("7"), VerseToken::Single(7));
    /// assert_eq!(VerseToken::parse("12 – 14"), VerseToken::Bridge { start: 12, end: 14 });
    /// assert_eq!(VerseToken::parse(" - "), VerseToken::Dash);
    /// assert_eq!(VerseToken::parse("seven"), VerseToken::Malformed);
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let compact: String = text
            .chars()
            .filter(|c| !c.is_whitespace() && !INVISIBLE_MARKS.contains(c))
            .collect();

        if let Some(caps) = SINGLE_PATTERN.captures(&compact) {
            return match caps[1].parse::<u32>() {
                Ok(0) | Err(_) => Self::Malformed,
                Ok(number) => Self::Single(number),
            };
        }
        if let Some(caps) = BRIDGE_PATTERN.captures(&compact) {
            return match (caps[1].parse::<u32>(), caps[2].parse::<u32>()) {
                (Ok(start), Ok(end)) if start > 0 => Self::Bridge { start, end },
                _ => Self::Malformed,
            };
        }
        if DASH_PATTERN.is_match(&compact) {
            return Self::Dash;
        }
        Self::Malformed
    }

    /// Whether the token would be accepted as a verse marker on its own.
    #[must_use]
    pub fn is_marker(&self) -> bool {
        match self {
            Self::Single(_) => true,
            Self::Bridge { start, end } => end > start,
            Self::Dash | Self::Malformed => false,
        }
    }

    /// First verse number of the token, if it has one.
    #[must_use]
    pub fn start(&self) -> Option<u32> {
        match self {
            Self::Single(n) | Self::Bridge { start: n, .. } => Some(*n),
            Self::Dash | Self::Malformed => None,
        }
    }
}

/// A verse or verse bridge. `end` is 0 for a single verse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VerseRef {
    pub start: u32,
    pub end: u32,
}

impl VerseRef {
    /// The "no verse yet" state at the start of a chapter.
    pub const NONE: Self = Self { start: 0, end: 0 };

    #[must_use]
    pub fn single(verse: u32) -> Self {
        Self { start: verse, end: 0 }
    }

    /// Create a bridge; collapses to a single verse unless `end > start`.
    #[must_use]
    pub fn bridge(start: u32, end: u32) -> Self {
        if end > start {
            Self { start, end }
        } else {
            Self::single(start)
        }
    }

    #[must_use]
    pub fn is_bridge(&self) -> bool {
        self.end > self.start
    }

    /// Last verse covered.
    #[must_use]
    pub fn last(&self) -> u32 {
        self.end.max(self.start)
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bridge() {
            write!(f, "{}-{}", self.start, self.end)
        } else {
            write!(f, "{}", self.start)
        }
    }
}

/// Why a verse token produced no marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Bare dash after a bridge: an empty continuation.
    DashAfterBridge,
    /// Bare dash whose following marker does not increase the verse.
    DashBeforeNonIncreasing,
    /// Bare dash that will be joined with the following marker into a bridge.
    /// The bridge starts at the current verse, so its marker widens the
    /// current verse's marker when both end up in the same block.
    DashJoinsNext,
    /// Bare dash before any verse of the chapter.
    DashWithoutVerse,
    /// Bridge whose end is not greater than its start ("3-2").
    ImpossibleBridge,
    /// Not a verse number at all.
    Malformed,
}

impl DiscardReason {
    /// Whether the discard indicates bad source data worth reporting.
    #[must_use]
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::ImpossibleBridge | Self::Malformed)
    }
}

/// Outcome of resolving a verse token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerseResolution {
    Accepted(VerseRef),
    Discarded(DiscardReason),
}

/// Current book position while walking markup.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTracker {
    chapter: u32,
    verse: VerseRef,
    bridge_from: Option<u32>,
}

impl ReferenceTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current chapter (0 before the first chapter).
    #[must_use]
    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    /// Verse or bridge last accepted ([`VerseRef::NONE`] if none yet).
    #[must_use]
    pub fn verse(&self) -> VerseRef {
        self.verse
    }

    /// Enter a new chapter, resetting verse state.
    pub fn start_chapter(&mut self, chapter: u32) {
        self.chapter = chapter;
        self.verse = VerseRef::NONE;
        self.bridge_from = None;
    }

    /// Resolve a verse token.
    ///
    /// # Arguments
    /// * `token` - Text attached to the verse marker
    /// * `next_marker` - Text of the next verse marker in the same paragraph,
    ///   used only to decide what a bare dash means
    ///
    /// # Returns
    /// The accepted verse (tracker state updated) or the reason the token was
    /// discarded (tracker state unchanged).
    pub fn resolve(&mut self, token: &str, next_marker: Option<&str>) -> VerseResolution {
        match VerseToken::parse(token) {
            VerseToken::Single(number) => self.accept(number, None),
            VerseToken::Bridge { start, end } if end > start => self.accept(start, Some(end)),
            VerseToken::Bridge { .. } => VerseResolution::Discarded(DiscardReason::ImpossibleBridge),
            VerseToken::Dash => self.resolve_dash(next_marker),
            VerseToken::Malformed => VerseResolution::Discarded(DiscardReason::Malformed),
        }
    }

    fn accept(&mut self, start: u32, end: Option<u32>) -> VerseResolution {
        let last = end.unwrap_or(start);
        let verse = match self.bridge_from.take() {
            Some(from) => VerseRef::bridge(from, last),
            None => VerseRef::bridge(start, last),
        };
        self.verse = verse;
        VerseResolution::Accepted(verse)
    }

    fn resolve_dash(&mut self, next_marker: Option<&str>) -> VerseResolution {
        if self.verse == VerseRef::NONE {
            return VerseResolution::Discarded(DiscardReason::DashWithoutVerse);
        }
        if self.verse.is_bridge() {
            return VerseResolution::Discarded(DiscardReason::DashAfterBridge);
        }
        let current = self.verse.start;
        match next_marker.map(VerseToken::parse).and_then(|t| t.start()) {
            Some(next) if next > current => {
                self.bridge_from = Some(current);
                VerseResolution::Discarded(DiscardReason::DashJoinsNext)
            }
            _ => VerseResolution::Discarded(DiscardReason::DashBeforeNonIncreasing),
        }
    }
}
