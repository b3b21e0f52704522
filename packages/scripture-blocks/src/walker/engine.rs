//! Book walker that turns paragraph-level nodes into blocks.

use std::borrow::Cow;

use super::builder::BlockBuilder;
use super::enclosure::{closer_for, is_opener, match_closers, VerseContent};
use super::milestones::MilestonePairs;
use super::tokens::{FlatNode, FlatParagraph, Token, TokenCursor};
use crate::config::ParserConfig;
use crate::error::{ParserError, Result};
use crate::reference::{ReferenceTracker, VerseRef, VerseResolution, VerseToken};
use crate::style::{StandardCharacter, StyleRole, MAIN_TITLE_STYLE};
use crate::text::{
    collapse_whitespace, is_collapsible, split_attached_prefix, trim_end_collapsible,
};
use crate::title::TitleAssembler;
use crate::types::{Block, ParsedBook};

/// Where the walk is in the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
    /// Title and introduction material.
    BeforeFirstChapter,
    InChapter,
}

/// An open quotation span.
#[derive(Debug)]
struct QuoteFrame {
    /// Ordinal of the milestone that closes the span.
    end: usize,
    speaker: Option<String>,
}

/// How the blocks of one paragraph are attributed and split.
#[derive(Debug)]
struct ParagraphContext<'w> {
    style: &'w str,
    /// Speaker when no forced run or quote applies.
    base_character: Option<String>,
    /// Structural paragraphs keep `base_character` throughout.
    structural: bool,
    /// Whether forced runs and quotes open blocks of their own.
    splits: bool,
}

/// State while walking the tokens of one paragraph.
#[derive(Debug)]
struct ParagraphState<'w> {
    ctx: ParagraphContext<'w>,
    /// Open forced-speaker run: style and character.
    run: Option<(&'w str, String)>,
    /// A run or quote just closed; the split waits for the punctuation
    /// that clings to the closing boundary.
    pending_split: bool,
    /// Inside an elided bracketed verse; only whitespace gets through.
    suppress_text: bool,
}

/// Walks one book's flattened nodes in document order.
pub(crate) struct BookWalker<'w> {
    config: &'w ParserConfig,
    book_code: &'w str,
    nodes: &'w [FlatNode<'w>],
    pairs: MilestonePairs,
    tracker: ReferenceTracker,
    builder: BlockBuilder,
    titles: TitleAssembler,
    state: WalkState,
    quotes: Vec<QuoteFrame>,
    /// Announcement of the latest chapter, held until the next node so a
    /// chapter label can still replace its text.
    pending_chapter: Option<Block>,
    /// A chapter label seen before the first chapter: `(style, text)`.
    pending_label: Option<(String, String)>,
    /// Label applied to every chapter number of the book.
    book_label: Option<String>,
    after_section_head: bool,
    /// Closing bracket to drop from the next text, its opener having been
    /// removed along with an elided verse.
    pending_skip: Option<char>,
    /// Verse marker that ended a paragraph; its text opens the next one.
    carried_verse: Option<VerseRef>,
    warnings: Vec<String>,
}

impl<'w> BookWalker<'w> {
    pub(crate) fn new(config: &'w ParserConfig, book_code: &'w str, nodes: &'w [FlatNode<'w>]) -> Self {
        let mut pairs = MilestonePairs::collect(nodes);
        let warnings = pairs.take_warnings();
        Self {
            config,
            book_code,
            nodes,
            pairs,
            tracker: ReferenceTracker::new(),
            builder: BlockBuilder::new(book_code),
            titles: TitleAssembler::new(),
            state: WalkState::BeforeFirstChapter,
            quotes: Vec::new(),
            pending_chapter: None,
            pending_label: None,
            book_label: None,
            after_section_head: false,
            pending_skip: None,
            carried_verse: None,
            warnings,
        }
    }

    /// Walk every node.
    ///
    /// # Arguments
    /// * `is_cancelled` - Checked before each paragraph-level node
    ///
    /// # Errors
    /// Returns `Cancelled` if the predicate returns true.
    pub(crate) fn walk(mut self, is_cancelled: &dyn Fn() -> bool) -> Result<ParsedBook> {
        let nodes = self.nodes;
        for (index, node) in nodes.iter().enumerate() {
            if is_cancelled() {
                return Err(ParserError::Cancelled {
                    chapter: self.tracker.chapter(),
                    node: index,
                });
            }
            match node {
                FlatNode::Chapter(number) => self.chapter(*number),
                FlatNode::Paragraph(paragraph) => self.paragraph(index, paragraph),
            }
        }
        Ok(self.finish())
    }

    fn finish(mut self) -> ParsedBook {
        self.drain_title();
        self.flush_misplaced_label();
        self.flush_pending_chapter();
        let (page_header, main_title) = self.titles.into_parts();
        ParsedBook {
            book_code: self.book_code.to_string(),
            blocks: self.builder.into_blocks(),
            page_header,
            main_title,
            warnings: self.warnings,
        }
    }

    fn chapter(&mut self, number: u32) {
        self.drain_title();
        if let Some((_, label)) = self.pending_label.take() {
            tracing::debug!(label = %label, "Using chapter label for the whole book");
            self.book_label = Some(label);
        }
        self.flush_pending_chapter();

        self.tracker.start_chapter(number);
        self.state = WalkState::InChapter;
        self.after_section_head = false;
        self.pending_skip = None;
        self.carried_verse = None;

        let text = match &self.book_label {
            Some(label) => format!("{label} {number}"),
            None => number.to_string(),
        };
        self.pending_chapter = Some(Block::chapter_announcement(self.book_code, number, &text));
    }

    fn paragraph(&mut self, index: usize, paragraph: &'w FlatParagraph<'w>) {
        let info = paragraph.info;
        if !info.publishable || paragraph.is_bare {
            return self.pass_over(paragraph);
        }

        match info.role {
            StyleRole::PageHeader => {
                self.titles.record_page_header(&paragraph.plain_text());
                return self.pass_over(paragraph);
            }
            StyleRole::BookName => return self.pass_over(paragraph),
            role if role.is_main_title() => {
                self.flush_pending_chapter();
                self.flush_misplaced_label();
                self.after_section_head = false;
                self.titles.add_part(
                    &paragraph.plain_text(),
                    info.role == StyleRole::PrimaryMainTitle,
                );
                return self.pass_over(paragraph);
            }
            StyleRole::ChapterLabel if self.chapter_label(paragraph) => {
                return self.pass_over(paragraph);
            }
            _ => {}
        }

        self.flush_pending_chapter();
        self.drain_title();
        self.flush_misplaced_label();

        let book = self.book_code;
        let (base_character, structural) = match info.role {
            StyleRole::Introduction => (Some(StandardCharacter::Intro.id(book)), true),
            StyleRole::SectionHead => (Some(StandardCharacter::ExtraBiblical.id(book)), true),
            StyleRole::ParallelPassageReference if self.after_section_head => {
                tracing::debug!(
                    chapter = self.tracker.chapter(),
                    "Skipping parallel passage reference after section head"
                );
                return self.pass_over(paragraph);
            }
            StyleRole::ParallelPassageReference => {
                (Some(StandardCharacter::ExtraBiblical.id(book)), true)
            }
            StyleRole::ChapterLabel => (None, true),
            StyleRole::Paragraph => (
                self.config
                    .characters
                    .character_for_paragraph_style(paragraph.style, book),
                false,
            ),
            StyleRole::PageHeader
            | StyleRole::BookName
            | StyleRole::MainTitle
            | StyleRole::PrimaryMainTitle => return,
        };
        self.after_section_head = info.role == StyleRole::SectionHead;

        let ctx = ParagraphContext {
            style: paragraph.style,
            base_character,
            structural,
            splits: !structural && info.verse_text,
        };
        self.walk_paragraph(index, paragraph, ctx);
    }

    /// Handle a chapter label paragraph. Returns false if the label is out
    /// of place and should be kept as ordinary text.
    fn chapter_label(&mut self, paragraph: &FlatParagraph<'_>) -> bool {
        let mut text = collapse_whitespace(&paragraph.plain_text(), true);
        trim_end_collapsible(&mut text);
        if text.is_empty() {
            return true;
        }

        if let Some(chapter) = self.pending_chapter.take() {
            self.builder.emit(Block::chapter_announcement(
                self.book_code,
                chapter.chapter_number,
                &text,
            ));
            return true;
        }

        if self.state == WalkState::BeforeFirstChapter {
            self.drain_title();
            self.flush_misplaced_label();
            self.pending_label = Some((paragraph.style.to_string(), text));
            return true;
        }

        tracing::debug!(
            chapter = self.tracker.chapter(),
            label = %text,
            "Chapter label away from its chapter, keeping as text"
        );
        false
    }

    fn walk_paragraph(&mut self, index: usize, paragraph: &'w FlatParagraph<'w>, ctx: ParagraphContext<'w>) {
        let character = self.segment_character(&ctx);
        self.builder.begin_paragraph(
            ctx.style,
            character,
            self.tracker.chapter(),
            self.tracker.verse(),
        );
        if let Some(verse) = self.carried_verse.take() {
            self.builder.push_verse(verse);
        }

        let mut state = ParagraphState {
            ctx,
            run: None,
            pending_split: false,
            suppress_text: false,
        };
        let mut cursor = TokenCursor::new(&paragraph.tokens);
        while let Some(token) = cursor.advance() {
            match token {
                Token::Text(text) => self.text(&mut state, text),
                Token::Verse(number) => {
                    self.settle_split(&mut state);
                    state.suppress_text = false;
                    self.verse(&mut state, number, index, &cursor);
                }
                Token::RunStart { style, character } => {
                    self.settle_split(&mut state);
                    state.run = Some((*style, character.clone()));
                    self.split(&state);
                }
                Token::RunEnd => {
                    state.run = None;
                    state.pending_split = true;
                }
                Token::MilestoneStart {
                    ordinal, speaker, ..
                } => {
                    if self.pairs.end_for(*ordinal).is_none() {
                        continue;
                    }
                    self.settle_split(&mut state);
                    self.open_quote(*ordinal, *speaker);
                    if state.ctx.splits && state.run.is_none() {
                        self.split(&state);
                    }
                }
                Token::MilestoneEnd { ordinal, .. } => {
                    if !self.pairs.is_matched_end(*ordinal) {
                        continue;
                    }
                    self.settle_split(&mut state);
                    self.close_quote(*ordinal);
                    if state.ctx.splits && state.run.is_none() {
                        state.pending_split = true;
                    }
                }
            }
        }
        self.builder.end_paragraph();
    }

    fn text(&mut self, state: &mut ParagraphState<'w>, text: &str) {
        if state.suppress_text {
            if text.chars().any(is_collapsible) {
                self.builder.push_text(" ");
            }
            return;
        }

        let text = self.skip_pending_closer(text);
        if !state.pending_split {
            self.builder.push_text(&text);
            return;
        }

        let (attached, rest) = split_attached_prefix(&text);
        self.builder.push_text(attached);
        if !rest.is_empty() {
            self.settle_split(state);
            self.builder.push_text(rest);
        }
    }

    fn verse(
        &mut self,
        state: &mut ParagraphState<'w>,
        number: &str,
        index: usize,
        cursor: &TokenCursor<'_, '_>,
    ) {
        let chapter = self.tracker.chapter();
        let verse = match self.tracker.resolve(number, cursor.next_numbered_verse()) {
            VerseResolution::Accepted(verse) => verse,
            VerseResolution::Discarded(reason) if reason.is_defect() => {
                tracing::warn!(chapter, token = %number, ?reason, "Discarding verse number");
                self.warnings.push(format!(
                    "Chapter {chapter}: discarded verse number '{number}' ({reason:?})"
                ));
                return;
            }
            VerseResolution::Discarded(reason) => {
                tracing::debug!(chapter, token = %number, ?reason, "Discarding dash verse token");
                return;
            }
        };

        if self.extend_into_bridge(number, verse) {
            return;
        }

        match VerseContent::classify(&cursor.text_until_next_verse()) {
            VerseContent::Text => self.builder.push_verse(verse),
            VerseContent::Empty
                if cursor.at_last_marker() && self.text_opens_next_paragraph(index) =>
            {
                tracing::debug!(chapter, verse = %verse, "Carrying verse into next paragraph");
                self.carried_verse = Some(verse);
            }
            VerseContent::Empty => {
                tracing::debug!(chapter, verse = %verse, "Eliding empty verse");
                self.elide_open_enclosure(index, cursor);
            }
            VerseContent::Enclosure { closers } => {
                let trailing = self
                    .builder
                    .current()
                    .map(|block| block.trailing_chars_matching(is_opener))
                    .unwrap_or_default();
                match match_closers(&trailing, &closers) {
                    Some(count) => {
                        tracing::debug!(chapter, verse = %verse, "Eliding bracketed empty verse");
                        if let Some(block) = self.builder.current_mut() {
                            block.remove_trailing_chars(count);
                        }
                        state.suppress_text = true;
                    }
                    None => self.builder.push_verse(verse),
                }
            }
        }
    }

    /// A dash joined this marker to an earlier one: turn that earlier marker
    /// into the bridge if it is still in the open block.
    fn extend_into_bridge(&mut self, number: &str, verse: VerseRef) -> bool {
        if VerseToken::parse(number).start() == Some(verse.start) {
            return false;
        }
        self.builder
            .current_mut()
            .is_some_and(|block| block.extend_verse(verse))
    }

    /// Whether the next paragraph with text belongs to the same chapter,
    /// carries verse text and opens with text rather than a verse marker.
    fn text_opens_next_paragraph(&self, index: usize) -> bool {
        for node in self.nodes.get(index + 1..).unwrap_or_default() {
            let FlatNode::Paragraph(paragraph) = node else {
                return false;
            };
            if !paragraph.info.publishable
                || first_significant(&paragraph.plain_text()).is_none()
            {
                continue;
            }
            let opening = TokenCursor::new(&paragraph.tokens).text_until_next_verse();
            return is_verse_paragraph(paragraph)
                && VerseContent::classify(&opening) == VerseContent::Text;
        }
        false
    }

    /// After eliding an empty verse, drop an opening bracket left at the end
    /// of the block if the next text starts with its closer.
    fn elide_open_enclosure(&mut self, index: usize, cursor: &TokenCursor<'_, '_>) {
        let Some(opener) = self
            .builder
            .current()
            .and_then(|block| block.trailing_chars_matching(is_opener).last().copied())
        else {
            return;
        };
        let Some(closer) = closer_for(opener) else {
            return;
        };
        if self.next_significant_char(index, cursor) == Some(closer) {
            if let Some(block) = self.builder.current_mut() {
                block.remove_trailing_chars(1);
            }
            self.pending_skip = Some(closer);
        }
    }

    /// First non-whitespace character of the text that follows, looking
    /// into later verse paragraphs of the same chapter.
    fn next_significant_char(&self, index: usize, cursor: &TokenCursor<'_, '_>) -> Option<char> {
        if let Some(c) = cursor.remaining_text().find_map(first_significant) {
            return Some(c);
        }
        for node in self.nodes.get(index + 1..).unwrap_or_default() {
            let FlatNode::Paragraph(paragraph) = node else {
                return None;
            };
            let Some(c) = first_significant(&paragraph.plain_text()) else {
                continue;
            };
            return is_verse_paragraph(paragraph).then_some(c);
        }
        None
    }

    fn skip_pending_closer<'t>(&mut self, text: &'t str) -> Cow<'t, str> {
        let Some(closer) = self.pending_skip else {
            return Cow::Borrowed(text);
        };
        let Some((at, found)) = text.char_indices().find(|(_, c)| !is_collapsible(*c)) else {
            return Cow::Borrowed(text);
        };
        self.pending_skip = None;
        if found != closer {
            return Cow::Borrowed(text);
        }
        let mut stripped = String::with_capacity(text.len());
        stripped.push_str(&text[..at]);
        stripped.push_str(&text[at + found.len_utf8()..]);
        Cow::Owned(stripped)
    }

    fn split(&mut self, state: &ParagraphState<'w>) {
        let (style, character) = match &state.run {
            Some((style, character)) => (*style, Some(character.clone())),
            None => (state.ctx.style, self.segment_character(&state.ctx)),
        };
        self.builder.split(
            style,
            character,
            self.tracker.chapter(),
            self.tracker.verse(),
        );
    }

    fn settle_split(&mut self, state: &mut ParagraphState<'w>) {
        if std::mem::take(&mut state.pending_split) {
            self.split(state);
        }
    }

    fn segment_character(&self, ctx: &ParagraphContext<'_>) -> Option<String> {
        if !ctx.structural {
            if let Some(frame) = self.quotes.last() {
                return frame.speaker.clone();
            }
        }
        ctx.base_character.clone()
    }

    fn open_quote(&mut self, ordinal: usize, speaker: Option<&str>) {
        if let Some(end) = self.pairs.end_for(ordinal) {
            self.quotes.push(QuoteFrame {
                end,
                speaker: speaker.map(str::to_string),
            });
        }
    }

    fn close_quote(&mut self, ordinal: usize) {
        self.quotes.retain(|frame| frame.end != ordinal);
    }

    /// Keep the quote stack in step for a paragraph that yields no blocks.
    fn pass_over(&mut self, paragraph: &FlatParagraph<'_>) {
        for token in &paragraph.tokens {
            match token {
                Token::MilestoneStart {
                    ordinal, speaker, ..
                } => self.open_quote(*ordinal, *speaker),
                Token::MilestoneEnd { ordinal, .. } => self.close_quote(*ordinal),
                _ => {}
            }
        }
    }

    fn flush_pending_chapter(&mut self) {
        if let Some(block) = self.pending_chapter.take() {
            self.builder.emit(block);
        }
    }

    fn drain_title(&mut self) {
        if let Some(title) = self.titles.take_title() {
            let mut block = Block::new(
                self.book_code,
                MAIN_TITLE_STYLE,
                self.tracker.chapter(),
                VerseRef::NONE,
            )
            .with_character(Some(StandardCharacter::BookOrChapter.id(self.book_code)));
            block.is_paragraph_start = true;
            block.push_text(&title);
            self.builder.emit(block);
        }
    }

    /// A label before the first chapter that was not followed by a chapter.
    fn flush_misplaced_label(&mut self) {
        if let Some((style, text)) = self.pending_label.take() {
            tracing::debug!(label = %text, "Chapter label not followed by a chapter, keeping as text");
            let mut block = Block::new(
                self.book_code,
                style,
                self.tracker.chapter(),
                self.tracker.verse(),
            );
            block.is_paragraph_start = true;
            block.push_text(&text);
            self.builder.emit(block);
        }
    }
}

fn first_significant(text: &str) -> Option<char> {
    text.chars().find(|c| !is_collapsible(*c))
}

fn is_verse_paragraph(paragraph: &FlatParagraph<'_>) -> bool {
    let info = paragraph.info;
    info.publishable && info.verse_text && info.role == StyleRole::Paragraph
}
