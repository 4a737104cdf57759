//! Rope-backed [`DocumentStore`].

use crate::line_ending::LineEnding;
use crate::line_index::LineIndex;
use crate::store::{DocumentError, DocumentStore, check_range};

/// An in-memory text document.
///
/// Text is stored verbatim (no newline normalization), so coordinates received from a server
/// line up with the bytes it was sent. The preferred [`LineEnding`] is detected on load.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Line table over the current text.
    line_index: LineIndex,
    line_ending: LineEnding,
    version: u64,
    read_only: bool,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document holding `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            line_index: LineIndex::from_text(text),
            line_ending: LineEnding::detect_in_text(text),
            version: 0,
            read_only: false,
        }
    }

    /// Number of successful [`DocumentStore::replace`] calls since load.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether writes are rejected.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Reject (or accept again) writes.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }
}

impl DocumentStore for Document {
    fn len_chars(&self) -> usize {
        self.line_index.char_count()
    }

    fn line_count(&self) -> usize {
        self.line_index.line_count()
    }

    fn line_start_offset(&self, line: usize) -> Option<usize> {
        self.line_index.line_start(line)
    }

    fn line_end_offset(&self, line: usize) -> Option<usize> {
        self.line_index.line_end(line)
    }

    fn line_of_offset(&self, offset: usize) -> usize {
        self.line_index.char_to_line(offset)
    }

    fn substring(&self, start: usize, end: usize) -> Result<String, DocumentError> {
        check_range(start, end, self.len_chars())?;
        Ok(self.line_index.slice(start, end))
    }

    fn replace(&mut self, start: usize, end: usize, text: &str) -> Result<(), DocumentError> {
        if self.read_only {
            return Err(DocumentError::ReadOnly);
        }
        check_range(start, end, self.len_chars())?;

        self.line_index.replace(start, end, text);
        self.version += 1;
        Ok(())
    }

    fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    fn line_text(&self, line: usize) -> Option<String> {
        self.line_index.get_line_text(line)
    }

    fn text(&self) -> String {
        self.line_index.get_text()
    }
}
