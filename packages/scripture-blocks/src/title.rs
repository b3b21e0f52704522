//! Running header and main title assembly.

use crate::text::collapse_whitespace;

/// Accumulates the page header and the parts of the main title.
///
/// Consecutive title parts are joined into one title; the walker drains the
/// pending title when the run of parts ends.
#[derive(Debug, Clone, Default)]
pub struct TitleAssembler {
    page_header: Option<String>,
    main_title: Option<String>,
    parts: Vec<String>,
    primary: Option<String>,
}

impl TitleAssembler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the running header. The first non-empty one wins.
    pub fn record_page_header(&mut self, text: &str) {
        if self.page_header.is_none() && !text.trim().is_empty() {
            self.page_header = Some(text.to_string());
        }
    }

    /// Add one part of the main title.
    ///
    /// # Arguments
    /// * `text` - Text of the title paragraph
    /// * `primary` - Whether this is the primary part (mt/mt1)
    pub fn add_part(&mut self, text: &str, primary: bool) {
        let text = normalize(text);
        if text.is_empty() {
            return;
        }
        if primary && self.primary.is_none() {
            self.primary = Some(text.clone());
        }
        self.parts.push(text);
    }

    /// Drain the pending parts into the simplified title text.
    ///
    /// The first drained title also fixes the book's main title: the primary
    /// part if there was one, otherwise the whole joined title.
    pub fn take_title(&mut self) -> Option<String> {
        if self.parts.is_empty() {
            return None;
        }
        let joined = self.parts.join(" ");
        self.parts.clear();
        let primary = self.primary.take();
        if self.main_title.is_none() {
            self.main_title = Some(primary.unwrap_or_else(|| joined.clone()));
        }
        Some(joined)
    }

    /// Consume the assembler, returning `(page_header, main_title)`.
    #[must_use]
    pub fn into_parts(self) -> (Option<String>, Option<String>) {
        (self.page_header, self.main_title)
    }
}

fn normalize(text: &str) -> String {
    collapse_whitespace(text, true).trim_end().to_string()
}
