//! Block builder: the block under construction and the flush/reopen rules.

use crate::reference::VerseRef;
use crate::types::Block;

/// Holds the block under construction and the blocks already completed.
///
/// Blocks of the current paragraph are buffered until the paragraph ends,
/// so the paragraph-start flag and the final trim can be applied to the
/// blocks that actually survive.
#[derive(Debug)]
pub(crate) struct BlockBuilder {
    book_code: String,
    emitted: Vec<Block>,
    paragraph: Vec<Block>,
    current: Option<Block>,
}

impl BlockBuilder {
    pub(crate) fn new(book_code: &str) -> Self {
        Self {
            book_code: book_code.to_string(),
            emitted: Vec::new(),
            paragraph: Vec::new(),
            current: None,
        }
    }

    /// Append a finished block (chapter announcement, title) to the output.
    pub(crate) fn emit(&mut self, block: Block) {
        self.emitted.push(block);
    }

    /// Open the first block of a paragraph.
    pub(crate) fn begin_paragraph(
        &mut self,
        style: &str,
        character: Option<String>,
        chapter: u32,
        verse: VerseRef,
    ) {
        self.end_paragraph();
        self.current = Some(
            Block::new(self.book_code.as_str(), style, chapter, verse).with_character(character),
        );
    }

    pub(crate) fn current(&self) -> Option<&Block> {
        self.current.as_ref()
    }

    pub(crate) fn current_mut(&mut self) -> Option<&mut Block> {
        self.current.as_mut()
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        if let Some(block) = self.current.as_mut() {
            block.push_text(text);
        }
    }

    pub(crate) fn push_verse(&mut self, verse: VerseRef) {
        if let Some(block) = self.current.as_mut() {
            block.push_verse(verse);
        }
    }

    /// Close the current block mid-paragraph and open the next one.
    ///
    /// Trailing whitespace stays with the closed block. Verse markers left
    /// dangling at its end move to the start of the new block, which
    /// otherwise starts mid-verse at `verse`.
    pub(crate) fn split(
        &mut self,
        style: &str,
        character: Option<String>,
        chapter: u32,
        verse: VerseRef,
    ) {
        let mut next =
            Block::new(self.book_code.as_str(), style, chapter, verse).with_character(character);
        if let Some(mut closed) = self.current.take() {
            for moved in closed.take_trailing_verses() {
                next.push_verse(moved);
            }
            if closed.has_text() {
                self.paragraph.push(closed);
            }
        }
        self.current = Some(next);
    }

    /// Close the paragraph: trim its last block, flag its first block and
    /// move the surviving blocks to the output.
    pub(crate) fn end_paragraph(&mut self) {
        if let Some(closed) = self.current.take() {
            if closed.has_text() {
                self.paragraph.push(closed);
            }
        }
        if let Some(last) = self.paragraph.last_mut() {
            last.trim_end();
        }
        if let Some(first) = self.paragraph.first_mut() {
            first.is_paragraph_start = true;
        }
        self.emitted.append(&mut self.paragraph);
    }

    /// Finish and return every completed block.
    pub(crate) fn into_blocks(mut self) -> Vec<Block> {
        self.end_paragraph();
        self.emitted
    }
}
