//! Scripture Blocks - Turn normalized scripture markup into attributed text blocks.
//!
//! This crate walks a book's paragraph-level markup (chapters, paragraphs,
//! verse markers, character-styled runs, notes, figures and quotation
//! milestones) and produces an ordered sequence of blocks for downstream
//! speaker attribution and script generation.
//!
//! # Example
//!
//! ```
//! use scripture_blocks::{parse_book, InlineNode, MarkupNode};
//!
//! let nodes = vec![
//!     MarkupNode::chapter(1),
//!     MarkupNode::paragraph(
//!         "p",
//!         vec![
//!             InlineNode::verse("15"),
//!             InlineNode::text("He said, "),
//!             InlineNode::run("wj", vec![InlineNode::text("The time is fulfilled.")]),
//!         ],
//!     ),
//! ];
//!
//! let book = parse_book("MRK", &nodes).unwrap();
//! assert_eq!(book.blocks[2].character_id.as_deref(), Some("Jesus"));
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`config`]: Constants, book code validation and `ParserConfig`
//! - [`error`]: Error types and Result alias
//! - [`markup`]: Input node model
//! - [`style`]: Style classification and style-to-character tables
//! - [`reference`]: Verse token parsing and chapter/verse tracking
//! - [`text`]: Whitespace and punctuation helpers
//! - [`types`]: Block model (Block, BlockElement, ParsedBook)
//! - [`title`]: Page header and main title assembly
//! - [`parser`]: Main entry points

pub mod config;
pub mod error;
pub mod markup;
pub mod parser;
pub mod reference;
pub mod style;
pub mod text;
pub mod title;
pub mod types;
mod walker;

// Re-export main functions
pub use parser::{parse_book, BookParser};

// Re-export commonly used items
pub use config::{validate_book_code, ParserConfig};
pub use error::{ParserError, Result};
pub use markup::{InlineNode, MarkupNode, Milestone, MilestoneBoundary, Paragraph};
pub use types::{Block, BlockElement, ParsedBook};
