//! Style classification and forced-speaker lookup.
//!
//! Every style tag in the markup is looked up here: whether it is published
//! at all, whether it carries verse text, what a paragraph in that style
//! means to the walker, and whether the style implies a fixed speaker.

mod characters;
mod registry;
mod table;

pub use characters::{CharacterMapping, CharacterStyleMap, StandardCharacter};
pub use registry::{StyleClass, StyleInfo, StyleRegistry, StyleRole};
pub use table::{create_default_style_registry, CHAPTER_STYLE, MAIN_TITLE_STYLE};
