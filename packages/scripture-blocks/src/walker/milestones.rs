//! Pairing of quotation milestones across a whole book.
//!
//! Milestones are empty start/end markers, so a quote may open in one
//! paragraph and close several paragraphs (or chapters) later. Pairing them
//! up front lets the walker know, at a start marker, whether a matching end
//! exists at all.

use std::collections::HashMap;

use super::tokens::{FlatNode, Token};

#[derive(Debug)]
struct OpenStart<'a> {
    ordinal: usize,
    id: Option<&'a str>,
    chapter: u32,
}

/// Matched milestone pairs, keyed by ordinal.
#[derive(Debug, Default)]
pub(crate) struct MilestonePairs {
    end_for_start: HashMap<usize, usize>,
    start_for_end: HashMap<usize, usize>,
    warnings: Vec<String>,
}

impl MilestonePairs {
    /// Pair every milestone of the book.
    ///
    /// An end with an id closes the innermost open start carrying the same
    /// id; an end without an id closes the innermost open start without one.
    /// Starts and ends left over are reported as warnings.
    pub(crate) fn collect(nodes: &[FlatNode<'_>]) -> Self {
        let mut pairs = Self::default();
        let mut open: Vec<OpenStart<'_>> = Vec::new();
        let mut chapter = 0;

        for node in nodes {
            let paragraph = match node {
                FlatNode::Chapter(number) => {
                    chapter = *number;
                    continue;
                }
                FlatNode::Paragraph(paragraph) => paragraph,
            };
            for token in &paragraph.tokens {
                match token {
                    Token::MilestoneStart { ordinal, id, .. } => open.push(OpenStart {
                        ordinal: *ordinal,
                        id: *id,
                        chapter,
                    }),
                    Token::MilestoneEnd { ordinal, id } => {
                        match open.iter().rposition(|start| start.id == *id) {
                            Some(position) => {
                                let start = open.remove(position);
                                pairs.end_for_start.insert(start.ordinal, *ordinal);
                                pairs.start_for_end.insert(*ordinal, start.ordinal);
                            }
                            None => {
                                tracing::warn!(chapter, id = ?id, "Unmatched milestone end");
                                pairs.warnings.push(format!(
                                    "Chapter {chapter}: milestone end{} has no matching start",
                                    describe_id(*id)
                                ));
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        for start in open {
            tracing::warn!(chapter = start.chapter, id = ?start.id, "Unclosed milestone start");
            pairs.warnings.push(format!(
                "Chapter {}: milestone start{} is never closed",
                start.chapter,
                describe_id(start.id)
            ));
        }
        pairs
    }

    /// Ordinal of the end that closes the given start, if any.
    pub(crate) fn end_for(&self, start: usize) -> Option<usize> {
        self.end_for_start.get(&start).copied()
    }

    /// Whether the given end closes some start.
    pub(crate) fn is_matched_end(&self, end: usize) -> bool {
        self.start_for_end.contains_key(&end)
    }

    pub(crate) fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}

fn describe_id(id: Option<&str>) -> String {
    id.map(|id| format!(" '{id}'")).unwrap_or_default()
}
