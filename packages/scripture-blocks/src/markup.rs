//! Input node model: the normalized markup tree of one book.
//!
//! A book is a flat sequence of paragraph-level nodes. Each node is either a
//! chapter marker or a paragraph holding an ordered list of inline children.

use serde::{Deserialize, Serialize};

/// A paragraph-level node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkupNode {
    /// Chapter marker.
    Chapter { number: u32 },
    /// Paragraph of any style (including titles, headings and labels).
    Paragraph(Paragraph),
}

impl MarkupNode {
    /// Create a chapter node.
    #[must_use]
    pub fn chapter(number: u32) -> Self {
        Self::Chapter { number }
    }

    /// Create a paragraph node.
    #[must_use]
    pub fn paragraph(style: impl Into<String>, children: Vec<InlineNode>) -> Self {
        Self::Paragraph(Paragraph::new(style, children))
    }
}

/// A paragraph with its style tag and inline content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub style: String,
    #[serde(default)]
    pub children: Vec<InlineNode>,
}

impl Paragraph {
    #[must_use]
    pub fn new(style: impl Into<String>, children: Vec<InlineNode>) -> Self {
        Self {
            style: style.into(),
            children,
        }
    }
}

/// Which end of a milestone pair a marker is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneBoundary {
    Start,
    End,
}

/// A quotation milestone marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub boundary: MilestoneBoundary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

/// Content inside a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineNode {
    /// Plain text.
    Text(String),
    /// Verse marker with its number text as written ("12", "12-14", "-").
    Verse { number: String },
    /// Character-styled run (wj, nd, add, ...), possibly nested.
    Run {
        style: String,
        children: Vec<InlineNode>,
    },
    /// Footnote or cross reference. Never part of the output text.
    Note,
    /// Figure. Never part of the output text.
    Figure,
    /// Start or end of a milestone span.
    Milestone(Milestone),
}

impl InlineNode {
    /// Create a text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a verse marker.
    #[must_use]
    pub fn verse(number: impl Into<String>) -> Self {
        Self::Verse {
            number: number.into(),
        }
    }

    /// Create a styled run.
    #[must_use]
    pub fn run(style: impl Into<String>, children: Vec<InlineNode>) -> Self {
        Self::Run {
            style: style.into(),
            children,
        }
    }

    /// Create a milestone start marker.
    #[must_use]
    pub fn milestone_start(id: Option<&str>, speaker: Option<&str>) -> Self {
        Self::Milestone(Milestone {
            boundary: MilestoneBoundary::Start,
            id: id.map(str::to_string),
            speaker: speaker.map(str::to_string),
        })
    }

    /// Create a milestone end marker.
    #[must_use]
    pub fn milestone_end(id: Option<&str>) -> Self {
        Self::Milestone(Milestone {
            boundary: MilestoneBoundary::End,
            id: id.map(str::to_string),
            speaker: None,
        })
    }
}
