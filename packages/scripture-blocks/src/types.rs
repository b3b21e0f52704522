//! Block model: the attributed text units produced by the walker.

use serde::Serialize;

use crate::config::VERSE_NUMBER_SEPARATOR;
use crate::reference::VerseRef;
use crate::style::{StandardCharacter, CHAPTER_STYLE};
use crate::text::{collapse_whitespace, has_content, is_collapsible, trim_end_collapsible};

/// One piece of a block: text or a verse marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockElement {
    /// Text content.
    Text { content: String },
    /// Verse marker. `end_verse` is 0 unless the marker is a bridge.
    Verse {
        start_verse: u32,
        end_verse: u32,
        number_text: String,
    },
}

impl BlockElement {
    /// Create a text element.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Create a verse element.
    #[must_use]
    pub fn verse(verse: VerseRef) -> Self {
        Self::Verse {
            start_verse: verse.start,
            end_verse: verse.end,
            number_text: verse.to_string(),
        }
    }
}

/// The unit of output: contiguous text with one style and (usually) one speaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub book_code: String,
    /// Chapter the block belongs to (0 for material before the first chapter).
    pub chapter_number: u32,
    pub initial_start_verse: u32,
    /// End of the initial verse bridge, 0 for a single verse.
    pub initial_end_verse: u32,
    pub style_tag: String,
    /// Speaker when structurally forced; `None` when attribution is left to
    /// later stages.
    pub character_id: Option<String>,
    pub is_paragraph_start: bool,
    /// Whether the first element is the marker of `initial_start_verse`.
    pub starts_at_verse_start: bool,
    pub elements: Vec<BlockElement>,
}

impl Block {
    /// Create an empty block positioned at the given verse.
    #[must_use]
    pub fn new(
        book_code: impl Into<String>,
        style_tag: impl Into<String>,
        chapter_number: u32,
        verse: VerseRef,
    ) -> Self {
        Self {
            book_code: book_code.into(),
            chapter_number,
            initial_start_verse: verse.start,
            initial_end_verse: verse.end,
            style_tag: style_tag.into(),
            character_id: None,
            is_paragraph_start: false,
            starts_at_verse_start: false,
            elements: Vec::new(),
        }
    }

    /// Create a chapter-announcement block.
    #[must_use]
    pub fn chapter_announcement(book_code: &str, chapter_number: u32, text: &str) -> Self {
        let mut block = Self::new(book_code, CHAPTER_STYLE, chapter_number, VerseRef::NONE)
            .with_character(Some(StandardCharacter::BookOrChapter.id(book_code)));
        block.is_paragraph_start = true;
        block.push_text(text);
        block
    }

    /// Set the character id.
    #[must_use]
    pub fn with_character(mut self, character_id: Option<String>) -> Self {
        self.character_id = character_id;
        self
    }

    /// Whether this block announces a chapter.
    #[must_use]
    pub fn is_chapter_announcement(&self) -> bool {
        self.style_tag == CHAPTER_STYLE
            && self.character_id.as_deref()
                == Some(StandardCharacter::BookOrChapter.id(&self.book_code).as_str())
    }

    /// Block text without verse numbers.
    #[must_use]
    pub fn text(&self) -> String {
        self.elements
            .iter()
            .filter_map(|element| match element {
                BlockElement::Text { content } => Some(content.as_str()),
                BlockElement::Verse { .. } => None,
            })
            .collect()
    }

    /// Block text with verse markers rendered as `{N}` or `{N-M}` followed by
    /// a no-break space.
    #[must_use]
    pub fn text_with_verse_numbers(&self) -> String {
        let mut result = String::new();
        for element in &self.elements {
            match element {
                BlockElement::Text { content } => result.push_str(content),
                BlockElement::Verse { number_text, .. } => {
                    result.push('{');
                    result.push_str(number_text);
                    result.push('}');
                    result.push(VERSE_NUMBER_SEPARATOR);
                }
            }
        }
        result
    }

    /// Whether the block has any text besides whitespace.
    #[must_use]
    pub fn has_text(&self) -> bool {
        self.elements.iter().any(|element| match element {
            BlockElement::Text { content } => has_content(content),
            BlockElement::Verse { .. } => false,
        })
    }

    /// Whether appended text should drop its leading whitespace.
    pub(crate) fn ends_in_space(&self) -> bool {
        match self.elements.last() {
            None | Some(BlockElement::Verse { .. }) => true,
            Some(BlockElement::Text { content }) => {
                content.chars().next_back().map_or(true, is_collapsible)
            }
        }
    }

    /// Append text, collapsing whitespace and merging into the last text element.
    pub(crate) fn push_text(&mut self, text: &str) {
        let collapsed = collapse_whitespace(text, self.ends_in_space());
        if collapsed.is_empty() {
            return;
        }
        if let Some(BlockElement::Text { content }) = self.elements.last_mut() {
            content.push_str(&collapsed);
        } else {
            self.elements.push(BlockElement::text(collapsed));
        }
    }

    /// Append a verse marker. The first element of an empty block also sets
    /// the block's initial verse.
    pub(crate) fn push_verse(&mut self, verse: VerseRef) {
        if self.elements.is_empty() {
            self.initial_start_verse = verse.start;
            self.initial_end_verse = verse.end;
            self.starts_at_verse_start = true;
        }
        self.elements.push(BlockElement::verse(verse));
    }

    /// Widen the last marker of `bridge.start` into `bridge`. Returns false
    /// if the block has no such single-verse marker.
    pub(crate) fn extend_verse(&mut self, bridge: VerseRef) -> bool {
        let Some(position) = self.elements.iter().rposition(|element| {
            matches!(
                element,
                BlockElement::Verse { start_verse, end_verse: 0, .. } if *start_verse == bridge.start
            )
        }) else {
            return false;
        };
        self.elements[position] = BlockElement::verse(bridge);
        if position == 0 && self.starts_at_verse_start {
            self.initial_end_verse = bridge.end;
        }
        true
    }

    /// Remove trailing whitespace from the final text element.
    pub(crate) fn trim_end(&mut self) {
        if let Some(BlockElement::Text { content }) = self.elements.last_mut() {
            trim_end_collapsible(content);
            if content.is_empty() {
                self.elements.pop();
            }
        }
    }

    /// Detach verse markers that have no text after them.
    pub(crate) fn take_trailing_verses(&mut self) -> Vec<VerseRef> {
        let mut verses = Vec::new();
        while let Some(BlockElement::Verse {
            start_verse,
            end_verse,
            ..
        }) = self.elements.last()
        {
            verses.push(VerseRef {
                start: *start_verse,
                end: *end_verse,
            });
            self.elements.pop();
        }
        verses.reverse();
        verses
    }

    /// Characters matching `predicate` at the very end of the text, ignoring
    /// whitespace, in reading order.
    pub(crate) fn trailing_chars_matching(&self, predicate: impl Fn(char) -> bool) -> Vec<char> {
        let Some(BlockElement::Text { content }) = self.elements.last() else {
            return Vec::new();
        };
        let mut found: Vec<char> = content
            .chars()
            .rev()
            .filter(|c| !is_collapsible(*c))
            .take_while(|c| predicate(*c))
            .collect();
        found.reverse();
        found
    }

    /// Remove the last `count` non-whitespace characters of the final text
    /// element, keeping whitespace that preceded them.
    pub(crate) fn remove_trailing_chars(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let Some(BlockElement::Text { content }) = self.elements.last_mut() else {
            return;
        };
        let mut removed = 0;
        let mut kept: Vec<char> = Vec::new();
        let mut chars: Vec<char> = content.chars().collect();
        while let Some(c) = chars.pop() {
            if removed == count {
                chars.push(c);
                break;
            }
            if is_collapsible(c) {
                kept.push(c);
            } else {
                removed += 1;
            }
        }
        let mut rebuilt: String = chars.into_iter().collect();
        if !kept.is_empty() && !rebuilt.ends_with(is_collapsible) && !rebuilt.is_empty() {
            rebuilt.push(' ');
        }
        *content = rebuilt;
        if content.is_empty() {
            self.elements.pop();
        }
    }
}

/// Result of walking one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedBook {
    pub book_code: String,
    pub blocks: Vec<Block>,
    /// Running page header, first occurrence.
    pub page_header: Option<String>,
    /// Main title (the primary title part).
    pub main_title: Option<String>,
    /// Non-fatal problems found in the markup.
    pub warnings: Vec<String>,
}

impl ParsedBook {
    /// Blocks other than chapter announcements.
    pub fn content_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| !b.is_chapter_announcement())
    }

    /// Blocks belonging to a chapter, including its announcement.
    pub fn chapter_blocks(&self, chapter: u32) -> impl Iterator<Item = &Block> {
        self.blocks
            .iter()
            .filter(move |b| b.chapter_number == chapter)
    }
}
