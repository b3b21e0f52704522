//! Main entry points that tie the components together.

use crate::config::{validate_book_code, ParserConfig};
use crate::error::Result;
use crate::markup::MarkupNode;
use crate::types::ParsedBook;
use crate::walker::walk_book;

/// Parses books with a fixed configuration.
///
/// The parser holds no state between calls, so one instance can be shared
/// by threads parsing different books.
#[derive(Debug, Clone, Copy)]
pub struct BookParser<'c> {
    config: &'c ParserConfig,
}

impl<'c> BookParser<'c> {
    /// Create a parser using the given style and character tables.
    #[must_use]
    pub fn new(config: &'c ParserConfig) -> Self {
        Self { config }
    }

    /// Get the configuration this parser uses.
    #[must_use]
    pub fn config(&self) -> &'c ParserConfig {
        self.config
    }

    /// Parse one book.
    ///
    /// # Arguments
    /// * `book_code` - Three-character book code (e.g., "MRK")
    /// * `nodes` - The book's paragraph-level nodes in document order
    ///
    /// # Returns
    /// A `ParsedBook` with the blocks, page header, main title and any
    /// warnings encountered while walking
    ///
    /// # Errors
    /// Returns `InvalidBookCode` if the book code is malformed.
    pub fn parse(&self, book_code: &str, nodes: &[MarkupNode]) -> Result<ParsedBook> {
        self.parse_cancellable(book_code, nodes, || false)
    }

    /// Parse one book, stopping early when `is_cancelled` returns true.
    ///
    /// The predicate is checked before each paragraph-level node, never in
    /// the middle of one, so no half-built block is ever produced.
    ///
    /// # Errors
    /// Returns `InvalidBookCode` if the book code is malformed, or
    /// `Cancelled` if the walk was stopped.
    pub fn parse_cancellable(
        &self,
        book_code: &str,
        nodes: &[MarkupNode],
        is_cancelled: impl Fn() -> bool,
    ) -> Result<ParsedBook> {
        validate_book_code(book_code)?;
        let book = walk_book(self.config, book_code, nodes, &is_cancelled)?;
        tracing::debug!(
            book = %book_code,
            blocks = book.blocks.len(),
            warnings = book.warnings.len(),
            "Parsed book"
        );
        Ok(book)
    }
}

/// Parse one book with the default configuration.
///
/// # Examples
/// ```
/// use scripture_blocks::{parse_book, InlineNode, MarkupNode};
///
/// let nodes = vec![
///     MarkupNode::chapter(1),
///     MarkupNode::paragraph("p", vec![InlineNode::verse("1"), InlineNode::text("The beginning.")]),
/// ];
/// let book = parse_book("MRK", &nodes).unwrap();
/// assert_eq!(book.blocks.len(), 2);
/// assert_eq!(book.blocks[1].text_with_verse_numbers(), "{1}\u{00A0}The beginning.");
/// ```
///
/// # Errors
/// Returns `InvalidBookCode` if the book code is malformed.
pub fn parse_book(book_code: &str, nodes: &[MarkupNode]) -> Result<ParsedBook> {
    let config = ParserConfig::default();
    BookParser::new(&config).parse(book_code, nodes)
}
