//! Style registry mapping style tags to their classification.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// What a paragraph of a given style means to the walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleRole {
    /// Ordinary scripture paragraph (p, q1, m, ...).
    Paragraph,
    /// Running page header (h).
    PageHeader,
    /// Book name or abbreviation for tables of contents (toc1-3).
    BookName,
    /// Secondary part of the main title (mt2, mt3, ...).
    MainTitle,
    /// Primary part of the main title (mt, mt1).
    PrimaryMainTitle,
    /// Introduction material (ip, is1, imt, ...).
    Introduction,
    /// Section head (s1, ms, mr, ...).
    SectionHead,
    /// Parallel passage reference (r).
    ParallelPassageReference,
    /// Alternate display string for a chapter number (cl).
    ChapterLabel,
}

impl StyleRole {
    /// Whether paragraphs of this role carry verse text by default.
    #[must_use]
    pub fn carries_verse_text(&self) -> bool {
        matches!(self, Self::Paragraph)
    }

    /// Whether this role is one of the main title parts.
    #[must_use]
    pub fn is_main_title(&self) -> bool {
        matches!(self, Self::MainTitle | Self::PrimaryMainTitle)
    }
}

/// Classification of a single style tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleInfo {
    /// Whether content in this style is part of the published text.
    pub publishable: bool,
    /// Whether content in this style is scripture text (as opposed to titles,
    /// headers, numbering, ...).
    pub verse_text: bool,
    /// How a paragraph in this style is treated.
    pub role: StyleRole,
}

impl StyleInfo {
    /// Create a publishable style with the verse-text flag implied by its role.
    #[must_use]
    pub fn new(role: StyleRole) -> Self {
        Self {
            publishable: true,
            verse_text: role.carries_verse_text(),
            role,
        }
    }

    /// Mark the style as not publishable.
    #[must_use]
    pub fn non_publishable(mut self) -> Self {
        self.publishable = false;
        self
    }

    /// Mark the style as not carrying verse text.
    #[must_use]
    pub fn without_verse_text(mut self) -> Self {
        self.verse_text = false;
        self
    }

    /// Reduce to the two flags exposed by [`StyleRegistry::classify`].
    #[must_use]
    pub fn class(&self) -> StyleClass {
        StyleClass {
            is_publishable: self.publishable,
            is_verse_text: self.verse_text,
        }
    }
}

impl Default for StyleInfo {
    /// Unknown tags are publishable verse-text paragraphs.
    fn default() -> Self {
        Self::new(StyleRole::Paragraph)
    }
}

/// Result of classifying a style tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleClass {
    pub is_publishable: bool,
    pub is_verse_text: bool,
}

/// Registry mapping style tags to their classification.
///
/// Lookups never fail: a tag that was never registered gets
/// [`StyleInfo::default`].
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    styles: HashMap<String, StyleInfo>,
}

impl StyleRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the classification for a style tag.
    pub fn register(&mut self, tag: impl Into<String>, info: StyleInfo) {
        self.styles.insert(tag.into(), info);
    }

    /// Register the same classification for several tags.
    pub fn register_all(&mut self, tags: impl IntoIterator<Item = impl Into<String>>, info: StyleInfo) {
        for tag in tags {
            self.register(tag, info);
        }
    }

    /// Get the classification for a tag, falling back to the default.
    #[must_use]
    pub fn info(&self, tag: &str) -> StyleInfo {
        self.styles.get(tag).copied().unwrap_or_default()
    }

    /// Report whether a tag is publishable and whether it carries verse text.
    #[must_use]
    pub fn classify(&self, tag: &str) -> StyleClass {
        self.info(tag).class()
    }

    /// Check if a tag has an explicit registration.
    #[must_use]
    pub fn is_registered(&self, tag: &str) -> bool {
        self.styles.contains_key(tag)
    }
}
