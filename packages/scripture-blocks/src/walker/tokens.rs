//! Flattening of paragraph children into a linear token stream.
//!
//! Nested runs, notes and figures are resolved here so the walker only sees
//! text, verse markers, forced-speaker run boundaries and milestones. The
//! cursor over a paragraph's tokens gives the walker the lookahead it needs
//! for dash verses and empty-verse detection.

use crate::config::ParserConfig;
use crate::markup::{InlineNode, MarkupNode, MilestoneBoundary, Paragraph};
use crate::reference::VerseToken;
use crate::style::{StyleInfo, StyleRole};

/// One unit of paragraph content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    Text(&'a str),
    Verse(&'a str),
    /// Start of a run whose style forces a speaker.
    RunStart {
        style: &'a str,
        character: String,
    },
    RunEnd,
    MilestoneStart {
        ordinal: usize,
        id: Option<&'a str>,
        speaker: Option<&'a str>,
    },
    MilestoneEnd {
        ordinal: usize,
        id: Option<&'a str>,
    },
}

/// A paragraph with its classification and flattened content.
#[derive(Debug, Clone)]
pub(crate) struct FlatParagraph<'a> {
    pub(crate) style: &'a str,
    pub(crate) info: StyleInfo,
    pub(crate) tokens: Vec<Token<'a>>,
    /// The source paragraph had no children at all.
    pub(crate) is_bare: bool,
}

impl FlatParagraph<'_> {
    /// Concatenated text tokens, as written.
    pub(crate) fn plain_text(&self) -> String {
        self.tokens
            .iter()
            .filter_map(|token| match token {
                Token::Text(text) => Some(*text),
                _ => None,
            })
            .collect()
    }
}

/// A paragraph-level node after flattening.
#[derive(Debug, Clone)]
pub(crate) enum FlatNode<'a> {
    Chapter(u32),
    Paragraph(FlatParagraph<'a>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunMode {
    /// Forced-speaker runs open their own segment.
    Split,
    /// Content flows into the surrounding segment.
    Inline,
    /// Content is dropped; milestones are still numbered.
    Dropped,
}

struct Flattener<'c> {
    config: &'c ParserConfig,
    book_code: &'c str,
    milestone_count: usize,
}

/// Flatten a whole book.
///
/// Milestones are numbered in document order across the book, so the
/// ordinals can be used to pair starts with ends before walking.
pub(crate) fn flatten_book<'a>(
    nodes: &'a [MarkupNode],
    config: &ParserConfig,
    book_code: &str,
) -> Vec<FlatNode<'a>> {
    let mut flattener = Flattener {
        config,
        book_code,
        milestone_count: 0,
    };
    nodes
        .iter()
        .map(|node| match node {
            MarkupNode::Chapter { number } => FlatNode::Chapter(*number),
            MarkupNode::Paragraph(paragraph) => {
                FlatNode::Paragraph(flattener.paragraph(paragraph))
            }
        })
        .collect()
}

impl<'c> Flattener<'c> {
    fn paragraph<'a>(&mut self, paragraph: &'a Paragraph) -> FlatParagraph<'a> {
        let info = self.config.styles.info(&paragraph.style);
        let mode = if !info.publishable {
            RunMode::Dropped
        } else if info.role == StyleRole::Paragraph && info.verse_text {
            RunMode::Split
        } else {
            RunMode::Inline
        };

        let mut tokens = Vec::new();
        self.inline(&paragraph.children, mode, &mut tokens);

        FlatParagraph {
            style: &paragraph.style,
            info,
            tokens,
            is_bare: paragraph.children.is_empty(),
        }
    }

    fn inline<'a>(&mut self, nodes: &'a [InlineNode], mode: RunMode, out: &mut Vec<Token<'a>>) {
        for node in nodes {
            match node {
                InlineNode::Text(text) => {
                    if mode != RunMode::Dropped {
                        out.push(Token::Text(text));
                    }
                }
                InlineNode::Verse { number } => {
                    if mode != RunMode::Dropped {
                        out.push(Token::Verse(number));
                    }
                }
                InlineNode::Note | InlineNode::Figure => {}
                InlineNode::Milestone(milestone) => {
                    let ordinal = self.milestone_count;
                    self.milestone_count += 1;
                    out.push(match milestone.boundary {
                        MilestoneBoundary::Start => Token::MilestoneStart {
                            ordinal,
                            id: milestone.id.as_deref(),
                            speaker: milestone.speaker.as_deref(),
                        },
                        MilestoneBoundary::End => Token::MilestoneEnd {
                            ordinal,
                            id: milestone.id.as_deref(),
                        },
                    });
                }
                InlineNode::Run { style, children } => self.run(style, children, mode, out),
            }
        }
    }

    fn run<'a>(
        &mut self,
        style: &'a str,
        children: &'a [InlineNode],
        mode: RunMode,
        out: &mut Vec<Token<'a>>,
    ) {
        let class = self.config.styles.classify(style);
        if mode == RunMode::Dropped || !class.is_publishable || !class.is_verse_text {
            self.inline(children, RunMode::Dropped, out);
            return;
        }

        let forced = match mode {
            RunMode::Split => self
                .config
                .characters
                .character_for_inline_style(style, self.book_code),
            RunMode::Inline | RunMode::Dropped => None,
        };

        match forced {
            Some(character) => {
                out.push(Token::RunStart { style, character });
                self.inline(children, RunMode::Inline, out);
                out.push(Token::RunEnd);
            }
            None => self.inline(children, mode, out),
        }
    }
}

/// Cursor over a paragraph's tokens with lookahead.
#[derive(Debug)]
pub(crate) struct TokenCursor<'t, 'a> {
    tokens: &'t [Token<'a>],
    position: usize,
}

impl<'t, 'a> TokenCursor<'t, 'a> {
    pub(crate) fn new(tokens: &'t [Token<'a>]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub(crate) fn advance(&mut self) -> Option<&'t Token<'a>> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    /// Text of the next verse marker that carries a number.
    pub(crate) fn next_numbered_verse(&self) -> Option<&'a str> {
        self.tokens[self.position..].iter().find_map(|token| match token {
            Token::Verse(number) if VerseToken::parse(number).start().is_some() => Some(*number),
            _ => None,
        })
    }

    /// Text from here up to the next verse marker that would be accepted on
    /// its own (or the end of the paragraph).
    pub(crate) fn text_until_next_verse(&self) -> String {
        let mut text = String::new();
        for token in &self.tokens[self.position..] {
            match token {
                Token::Text(t) => text.push_str(t),
                Token::Verse(number) if VerseToken::parse(number).is_marker() => break,
                _ => {}
            }
        }
        text
    }

    /// Whether no verse marker that would be accepted on its own follows.
    pub(crate) fn at_last_marker(&self) -> bool {
        !self.tokens[self.position..]
            .iter()
            .any(|token| matches!(token, Token::Verse(number) if VerseToken::parse(number).is_marker()))
    }

    /// Text from here to the end of the paragraph, skipping everything else.
    pub(crate) fn remaining_text(&self) -> impl Iterator<Item = &'a str> + 't {
        self.tokens[self.position..].iter().filter_map(|token| match token {
            Token::Text(t) => Some(*t),
            _ => None,
        })
    }
}
