//! Document store abstraction.
//!
//! Coordinate mapping and edit application only need a line table, substring access and a
//! replace primitive. [`DocumentStore`] is that seam: [`crate::Document`] implements it on a
//! rope, and hosts with their own buffer type can implement it directly.

use crate::line_ending::LineEnding;
use thiserror::Error;

/// Failure reported by a document's read or write primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// `start` is after `end`.
    #[error("invalid range: {start}..{end}")]
    InvalidRange {
        /// Start character offset.
        start: usize,
        /// End character offset.
        end: usize,
    },
    /// An offset lies past the end of the document.
    #[error("offset {offset} is out of bounds (document length {len})")]
    OffsetOutOfBounds {
        /// The rejected character offset.
        offset: usize,
        /// Document length in characters.
        len: usize,
    },
    /// The document does not accept writes.
    #[error("document is read-only")]
    ReadOnly,
}

/// Validate a half-open character range against a document of `len` characters.
pub fn check_range(start: usize, end: usize, len: usize) -> Result<(), DocumentError> {
    if start > end {
        return Err(DocumentError::InvalidRange { start, end });
    }
    if end > len {
        return Err(DocumentError::OffsetOutOfBounds { offset: end, len });
    }
    Ok(())
}

/// A text buffer exposing an LSP-compatible line table.
///
/// Offsets are character offsets. Implementations must keep the line table consistent with the
/// current text after every [`DocumentStore::replace`]:
/// - `line_count() >= 1`
/// - `line_start_offset(l) <= line_end_offset(l) <= line_start_offset(l + 1)`
/// - `line_of_offset` returns a line in `0..line_count()` for any input
pub trait DocumentStore {
    /// Document length in characters.
    fn len_chars(&self) -> usize;

    /// Number of lines (N line breaks give N+1 lines).
    fn line_count(&self) -> usize;

    /// Offset of the first character of `line`, `None` if the line does not exist.
    fn line_start_offset(&self, line: usize) -> Option<usize>;

    /// Offset just past the last content character of `line` (terminator excluded), `None` if
    /// the line does not exist.
    fn line_end_offset(&self, line: usize) -> Option<usize>;

    /// Line containing `offset`. Offsets past the end resolve to the last line.
    fn line_of_offset(&self, offset: usize) -> usize;

    /// Text in `start..end`.
    fn substring(&self, start: usize, end: usize) -> Result<String, DocumentError>;

    /// Replace `start..end` with `text` as one mutation.
    fn replace(&mut self, start: usize, end: usize, text: &str) -> Result<(), DocumentError>;

    /// The document's preferred line ending.
    fn line_ending(&self) -> LineEnding {
        LineEnding::Lf
    }

    /// Text of `line` without its terminator.
    fn line_text(&self, line: usize) -> Option<String> {
        let start = self.line_start_offset(line)?;
        let end = self.line_end_offset(line)?;
        self.substring(start, end).ok()
    }

    /// Full document text.
    fn text(&self) -> String {
        self.substring(0, self.len_chars()).unwrap_or_default()
    }
}
