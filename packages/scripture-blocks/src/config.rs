//! Configuration constants, validation, and the parser configuration.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

use crate::error::{ParserError, Result};
use crate::style::{
    create_default_style_registry, CharacterMapping, CharacterStyleMap, StyleInfo, StyleRegistry,
    StyleRole,
};

/// Separator printed after a verse number when rendering with verse numbers.
pub const VERSE_NUMBER_SEPARATOR: char = '\u{00A0}';

/// Book code pattern: three uppercase letters or digits (GEN, MRK, 1JN).
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static BOOK_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{3}$").expect("valid regex"));

/// Validate book code format.
///
/// # Examples
/// ```
/// use scripture_blocks::config::validate_book_code;
///
/// assert!(validate_book_code("MRK").is_ok());
/// assert!(validate_book_code("1JN").is_ok());
/// assert!(validate_book_code("Mark").is_err());
/// ```
pub fn validate_book_code(book_code: &str) -> Result<()> {
    if BOOK_CODE_PATTERN.is_match(book_code) {
        Ok(())
    } else {
        Err(ParserError::InvalidBookCode(book_code.to_string()))
    }
}

/// Lookup tables consulted while walking markup.
///
/// Construct once and share by reference; the walker never mutates it.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Style tag classification.
    pub styles: StyleRegistry,
    /// Style-to-character mappings.
    pub characters: CharacterStyleMap,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            styles: create_default_style_registry(),
            characters: CharacterStyleMap::default(),
        }
    }
}

/// Per-tag override in a configuration file.
///
/// Omitted fields keep the value the tag already had.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct StyleOverride {
    tag: String,
    #[serde(default)]
    role: Option<StyleRole>,
    #[serde(default)]
    publishable: Option<bool>,
    #[serde(default)]
    verse_text: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    styles: Vec<StyleOverride>,
    #[serde(default)]
    characters: Option<Vec<CharacterMapping>>,
}

impl ParserConfig {
    /// Load a configuration from YAML, layered over the defaults.
    ///
    /// `styles` entries override individual tags of the built-in table;
    /// a `characters` list replaces the built-in character mappings.
    ///
    /// # Examples
    /// ```
    /// use scripture_blocks::config::ParserConfig;
    ///
    /// let config = ParserConfig::from_yaml_str("styles:\n  - tag: zz\n    publishable: false\n").unwrap();
    /// assert!(!config.styles.classify("zz").is_publishable);
    /// assert!(config.styles.classify("p").is_publishable);
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: ConfigFile = if yaml.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml_ng::from_str(yaml)?
        };

        let mut config = Self::default();

        for style in file.styles {
            if style.tag.trim().is_empty() {
                return Err(ParserError::InvalidConfig(
                    "style override with empty tag".to_string(),
                ));
            }
            let current = config.styles.info(&style.tag);
            let role = style.role.unwrap_or(current.role);
            let base = if style.role.is_some() {
                StyleInfo::new(role)
            } else {
                current
            };
            let info = StyleInfo {
                publishable: style.publishable.unwrap_or(base.publishable),
                verse_text: style.verse_text.unwrap_or(base.verse_text),
                role,
            };
            tracing::debug!(
                tag = %style.tag,
                ?info,
                replaces_builtin = config.styles.is_registered(&style.tag),
                "Style override"
            );
            config.styles.register(style.tag, info);
        }

        if let Some(characters) = file.characters {
            config.characters = CharacterStyleMap::from_mappings(characters)?;
        }

        Ok(config)
    }
}
