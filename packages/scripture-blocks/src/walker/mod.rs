//! Markup walker.
//!
//! The walk runs in three steps:
//! 1. Paragraph children are flattened into tokens (`tokens`)
//! 2. Quotation milestones are paired across the book (`milestones`)
//! 3. `BookWalker` dispatches each paragraph-level node and drives the
//!    `BlockBuilder`

mod builder;
mod enclosure;
mod engine;
mod milestones;
mod tokens;

use crate::config::ParserConfig;
use crate::error::Result;
use crate::markup::MarkupNode;
use crate::types::ParsedBook;

use engine::BookWalker;
use tokens::flatten_book;

/// Walk one book's nodes into blocks.
///
/// # Arguments
/// * `config` - Style and character tables
/// * `book_code` - Book code used for block attribution (already validated)
/// * `nodes` - Paragraph-level nodes in document order
/// * `is_cancelled` - Checked before each paragraph-level node
///
/// # Errors
/// Returns `Cancelled` if `is_cancelled` returns true.
pub(crate) fn walk_book(
    config: &ParserConfig,
    book_code: &str,
    nodes: &[MarkupNode],
    is_cancelled: &dyn Fn() -> bool,
) -> Result<ParsedBook> {
    let flat = flatten_book(nodes, config, book_code);
    BookWalker::new(config, book_code, &flat).walk(is_cancelled)
}
