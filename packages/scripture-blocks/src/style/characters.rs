//! Style-to-character mappings for structurally forced speakers.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ParserError, Result};

/// Reserved pseudo-characters whose ids are derived from the book code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardCharacter {
    /// The narrator of the book.
    Narrator,
    /// Book titles and chapter announcements.
    BookOrChapter,
    /// Section heads and other material that is not scripture text.
    ExtraBiblical,
    /// Introduction material.
    Intro,
}

impl StandardCharacter {
    /// Prefix placed before the book code.
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Narrator => "narrator-",
            Self::BookOrChapter => "BC-",
            Self::ExtraBiblical => "extra-",
            Self::Intro => "intro-",
        }
    }

    /// Character id for this pseudo-character in the given book.
    ///
    /// # Examples
    /// ```
    /// use scripture_blocks::style::StandardCharacter;
    ///
    /// assert_eq!(StandardCharacter::BookOrChapter.id("MRK"), "BC-MRK");
    /// assert_eq!(StandardCharacter::Narrator.id("GEN"), "narrator-GEN");
    /// ```
    #[must_use]
    pub fn id(&self, book_code: &str) -> String {
        format!("{}{book_code}", self.prefix())
    }
}

impl fmt::Display for StandardCharacter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix().trim_end_matches('-'))
    }
}

/// One style-to-character mapping entry.
///
/// Exactly one of `character` (a named speaker such as "Jesus") or
/// `standard` (a pseudo-character resolved per book) must be set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterMapping {
    /// Style tag the mapping applies to.
    pub style: String,

    /// Whether the mapping applies to paragraph styles rather than inline runs.
    #[serde(default)]
    pub paragraph: bool,

    /// Named speaker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,

    /// Standard pseudo-character.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<StandardCharacter>,

    /// Books in which the mapping does not apply.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_books: Vec<String>,
}

impl CharacterMapping {
    /// Map an inline style to a named speaker.
    #[must_use]
    pub fn inline(style: impl Into<String>, character: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            paragraph: false,
            character: Some(character.into()),
            standard: None,
            excluded_books: Vec::new(),
        }
    }

    /// Map a paragraph style to a standard pseudo-character.
    #[must_use]
    pub fn paragraph_standard(style: impl Into<String>, standard: StandardCharacter) -> Self {
        Self {
            style: style.into(),
            paragraph: true,
            character: None,
            standard: Some(standard),
            excluded_books: Vec::new(),
        }
    }

    /// Set the books in which this mapping is ignored.
    #[must_use]
    pub fn with_excluded_books(
        mut self,
        books: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.excluded_books = books.into_iter().map(Into::into).collect();
        self
    }

    /// Resolve the character id for a book, if the mapping applies there.
    #[must_use]
    pub fn resolve(&self, book_code: &str) -> Option<String> {
        if self.excluded_books.iter().any(|b| b == book_code) {
            return None;
        }
        match (&self.character, self.standard) {
            (_, Some(standard)) => Some(standard.id(book_code)),
            (Some(character), None) => Some(character.clone()),
            (None, None) => None,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.style.trim().is_empty() {
            return Err(ParserError::InvalidConfig(
                "character mapping with empty style".to_string(),
            ));
        }
        match (&self.character, self.standard) {
            (Some(_), Some(_)) => Err(ParserError::InvalidConfig(format!(
                "mapping for '{}' sets both character and standard",
                self.style
            ))),
            (None, None) => Err(ParserError::InvalidConfig(format!(
                "mapping for '{}' sets neither character nor standard",
                self.style
            ))),
            (Some(character), None) if character.trim().is_empty() => Err(
                ParserError::InvalidConfig(format!("mapping for '{}' has an empty character", self.style)),
            ),
            _ => Ok(()),
        }
    }
}

/// Immutable lookup from style tags to forced characters.
///
/// Built once (from the defaults or from YAML) and passed by reference
/// into the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterStyleMap {
    inline: HashMap<String, CharacterMapping>,
    paragraph: HashMap<String, CharacterMapping>,
}

impl CharacterStyleMap {
    /// Create a map with no mappings at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            inline: HashMap::new(),
            paragraph: HashMap::new(),
        }
    }

    /// Build a map from mapping entries.
    ///
    /// # Errors
    /// Returns `InvalidConfig` for malformed entries or a style mapped twice
    /// at the same level.
    pub fn from_mappings(mappings: impl IntoIterator<Item = CharacterMapping>) -> Result<Self> {
        let mut map = Self::empty();
        for mapping in mappings {
            mapping.validate()?;
            let table = if mapping.paragraph {
                &mut map.paragraph
            } else {
                &mut map.inline
            };
            if table.contains_key(&mapping.style) {
                return Err(ParserError::InvalidConfig(format!(
                    "style '{}' is mapped more than once",
                    mapping.style
                )));
            }
            table.insert(mapping.style.clone(), mapping);
        }
        Ok(map)
    }

    /// Load mappings from a YAML sequence of [`CharacterMapping`] entries.
    ///
    /// # Examples
    /// ```
    /// use scripture_blocks::style::CharacterStyleMap;
    ///
    /// let map = CharacterStyleMap::from_yaml_str("- style: wj\n  character: Jesus\n").unwrap();
    /// assert_eq!(map.character_for_inline_style("wj", "MAT").as_deref(), Some("Jesus"));
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mappings: Vec<CharacterMapping> = serde_yaml_ng::from_str(yaml)?;
        Self::from_mappings(mappings)
    }

    /// Forced speaker for an inline style run, if any.
    #[must_use]
    pub fn character_for_inline_style(&self, style: &str, book_code: &str) -> Option<String> {
        self.inline.get(style)?.resolve(book_code)
    }

    /// Forced speaker for a paragraph style in the given book, if any.
    #[must_use]
    pub fn character_for_paragraph_style(&self, style: &str, book_code: &str) -> Option<String> {
        self.paragraph.get(style)?.resolve(book_code)
    }

    /// All mappings, inline entries first, sorted by style.
    #[must_use]
    pub fn mappings(&self) -> Vec<&CharacterMapping> {
        let mut inline: Vec<_> = self.inline.values().collect();
        inline.sort_by(|a, b| a.style.cmp(&b.style));
        let mut paragraph: Vec<_> = self.paragraph.values().collect();
        paragraph.sort_by(|a, b| a.style.cmp(&b.style));
        inline.into_iter().chain(paragraph).collect()
    }
}

impl Default for CharacterStyleMap {
    /// Words of Jesus, quoted scripture and descriptive titles outside the Psalms.
    fn default() -> Self {
        let mut map = Self::empty();
        for mapping in [
            CharacterMapping::inline("wj", "Jesus"),
            CharacterMapping::inline("qt", "scripture"),
            CharacterMapping::paragraph_standard("d", StandardCharacter::Narrator)
                .with_excluded_books(["PSA"]),
        ] {
            let table = if mapping.paragraph {
                &mut map.paragraph
            } else {
                &mut map.inline
            };
            table.insert(mapping.style.clone(), mapping);
        }
        map
    }
}
