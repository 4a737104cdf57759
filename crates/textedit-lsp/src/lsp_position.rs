//! LSP coordinate mapping.
//!
//! Converts between flat document character offsets and LSP `{line, character}` positions.
//! Every conversion is clamped: a server's view of a document routinely lags the live buffer, so
//! out-of-range coordinates are pulled back to the nearest valid location instead of failing.
//! The only unrecoverable input is a line that does not exist, reported as
//! [`PositionError::LineOutOfRange`].

use serde::{Deserialize, Serialize};
use textedit_core::{DocumentError, DocumentStore};
use thiserror::Error;

/// LSP Position. `character` counts code units of the negotiated [`PositionEncoding`].
///
/// Ordering is lexicographic: line first, then character.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct LspPosition {
    /// Line number (0-based)
    pub line: u32,
    /// Character offset within the line (0-based)
    pub character: u32,
}

impl LspPosition {
    /// Create a new LSP position.
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// LSP Range.
///
/// Ordering is lexicographic: start first, then end.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct LspRange {
    /// Range start position (inclusive).
    pub start: LspPosition,
    /// Range end position (exclusive).
    pub end: LspPosition,
}

impl LspRange {
    /// Create a new LSP range.
    pub fn new(start: LspPosition, end: LspPosition) -> Self {
        Self { start, end }
    }

    /// Whether `start` is ordered after `end`.
    pub fn is_reversed(&self) -> bool {
        self.start > self.end
    }

    /// Whether the range is empty (an insertion point).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Unit in which [`LspPosition::character`] is counted (LSP `positionEncoding`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PositionEncoding {
    /// UTF-8 code units (bytes).
    #[serde(rename = "utf-8")]
    Utf8,
    /// UTF-16 code units. Mandatory for every LSP implementation.
    #[default]
    #[serde(rename = "utf-16")]
    Utf16,
    /// Unicode scalar values, which is what documents count natively.
    #[serde(rename = "utf-32")]
    Utf32,
}

impl PositionEncoding {
    fn char_len(self, ch: char) -> usize {
        match self {
            Self::Utf8 => ch.len_utf8(),
            Self::Utf16 => ch.len_utf16(),
            Self::Utf32 => 1,
        }
    }
}

/// What to do with a position whose line is past the last line of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineOverflow {
    /// Report [`PositionError::LineOutOfRange`].
    #[default]
    Reject,
    /// Resolve to the end of the document.
    ClampToDocumentEnd,
}

/// A position that cannot be mapped onto the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    /// The line does not exist.
    #[error("line {line} is out of range (document has {line_count} lines)")]
    LineOutOfRange {
        /// Requested line.
        line: u32,
        /// Lines in the document.
        line_count: usize,
    },
    /// The document refused to expose the line's text.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// LSP coordinate converter
///
/// Handles conversions between character offsets and encoded code unit offsets within a line.
pub struct LspCoordinateConverter;

impl LspCoordinateConverter {
    /// Convert UTF-8 string to UTF-16 code unit count
    pub fn utf16_len(text: &str) -> usize {
        text.encode_utf16().count()
    }

    /// Length of `text` in `encoding` code units.
    pub fn encoded_len(text: &str, encoding: PositionEncoding) -> usize {
        match encoding {
            PositionEncoding::Utf8 => text.len(),
            PositionEncoding::Utf16 => Self::utf16_len(text),
            PositionEncoding::Utf32 => text.chars().count(),
        }
    }

    /// Convert a character offset to a code unit offset.
    pub fn char_offset_to_units(
        text: &str,
        char_offset: usize,
        encoding: PositionEncoding,
    ) -> usize {
        text.chars()
            .take(char_offset)
            .map(|c| encoding.char_len(c))
            .sum()
    }

    /// Convert a code unit offset to a character offset.
    ///
    /// An offset inside a multi-unit character (half of a surrogate pair, the middle of a UTF-8
    /// sequence) rounds forward to the next character boundary. Offsets past the end of `text`
    /// clamp to its character count.
    pub fn units_to_char_offset(text: &str, units: usize, encoding: PositionEncoding) -> usize {
        let mut current_units = 0;
        let mut char_count = 0;

        for ch in text.chars() {
            if current_units >= units {
                break;
            }
            current_units += encoding.char_len(ch);
            char_count += 1;
        }

        char_count
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn line_bounds<D: DocumentStore + ?Sized>(doc: &D, line: usize) -> Option<(usize, usize)> {
    Some((doc.line_start_offset(line)?, doc.line_end_offset(line)?))
}

/// Convert a document offset to an LSP position.
///
/// Never fails: offsets past the end of the document clamp to its end, and offsets past the end
/// of their line's content (inside a `\r\n` terminator) clamp to the line end. The result always
/// references an existing line.
pub fn offset_to_position<D: DocumentStore + ?Sized>(
    doc: &D,
    offset: usize,
    encoding: PositionEncoding,
) -> LspPosition {
    let offset = offset.min(doc.len_chars());
    let line = doc.line_of_offset(offset);
    let Some((line_start, line_end)) = line_bounds(doc, line) else {
        return LspPosition::new(saturating_u32(line), 0);
    };

    let column = offset.min(line_end).max(line_start) - line_start;
    let character = match encoding {
        PositionEncoding::Utf32 => column,
        _ => match doc.substring(line_start, line_end) {
            Ok(line_text) => {
                LspCoordinateConverter::char_offset_to_units(&line_text, column, encoding)
            }
            Err(_) => column,
        },
    };

    LspPosition::new(saturating_u32(line), saturating_u32(character))
}

/// Convert an LSP position to a document offset.
///
/// A `character` past the end of the line clamps to the line end; it never spills into the next
/// line. A line past the last line is an error the caller must handle.
pub fn position_to_offset<D: DocumentStore + ?Sized>(
    doc: &D,
    position: LspPosition,
    encoding: PositionEncoding,
) -> Result<usize, PositionError> {
    let line = position.line as usize;
    let (line_start, line_end) =
        line_bounds(doc, line).ok_or_else(|| PositionError::LineOutOfRange {
            line: position.line,
            line_count: doc.line_count(),
        })?;

    let column = match encoding {
        PositionEncoding::Utf32 => position.character as usize,
        _ => {
            let line_text = doc.substring(line_start, line_end)?;
            LspCoordinateConverter::units_to_char_offset(
                &line_text,
                position.character as usize,
                encoding,
            )
        }
    };

    Ok(line_start.saturating_add(column).min(line_end))
}

/// [`position_to_offset`], except a line past the last line resolves to the end of the document.
pub fn position_to_offset_clamped<D: DocumentStore + ?Sized>(
    doc: &D,
    position: LspPosition,
    encoding: PositionEncoding,
) -> usize {
    match position_to_offset(doc, position, encoding) {
        Ok(offset) => offset,
        Err(_) => doc.len_chars(),
    }
}

/// Resolve both ends of `range` to document offsets.
pub fn range_to_offsets<D: DocumentStore + ?Sized>(
    doc: &D,
    range: &LspRange,
    encoding: PositionEncoding,
    overflow: LineOverflow,
) -> Result<(usize, usize), PositionError> {
    let resolve = |position| match overflow {
        LineOverflow::Reject => position_to_offset(doc, position, encoding),
        LineOverflow::ClampToDocumentEnd => Ok(position_to_offset_clamped(doc, position, encoding)),
    };

    Ok((resolve(range.start)?, resolve(range.end)?))
}

/// Convert a pair of document offsets to an LSP range.
pub fn offsets_to_range<D: DocumentStore + ?Sized>(
    doc: &D,
    start: usize,
    end: usize,
    encoding: PositionEncoding,
) -> LspRange {
    LspRange::new(
        offset_to_position(doc, start, encoding),
        offset_to_position(doc, end, encoding),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use textedit_core::Document;

    const UTF16: PositionEncoding = PositionEncoding::Utf16;

    #[test]
    fn test_utf16_len() {
        assert_eq!(LspCoordinateConverter::utf16_len("hello"), 5);
        assert_eq!(LspCoordinateConverter::utf16_len("你好"), 2);
        assert_eq!(LspCoordinateConverter::utf16_len("👋"), 2);
    }

    #[test]
    fn test_char_offset_to_units() {
        let text = "hello你好👋";

        assert_eq!(LspCoordinateConverter::char_offset_to_units(text, 5, UTF16), 5);
        assert_eq!(LspCoordinateConverter::char_offset_to_units(text, 7, UTF16), 7);
        assert_eq!(LspCoordinateConverter::char_offset_to_units(text, 8, UTF16), 9);
        assert_eq!(
            LspCoordinateConverter::char_offset_to_units(text, 8, PositionEncoding::Utf8),
            5 + 3 + 3 + 4
        );
        assert_eq!(
            LspCoordinateConverter::char_offset_to_units(text, 8, PositionEncoding::Utf32),
            8
        );
    }

    #[test]
    fn test_units_to_char_offset_rounds_forward_inside_char() {
        let text = "a👋b";

        assert_eq!(LspCoordinateConverter::units_to_char_offset(text, 1, UTF16), 1);
        // Unit 2 is the low surrogate of 👋.
        assert_eq!(LspCoordinateConverter::units_to_char_offset(text, 2, UTF16), 2);
        assert_eq!(LspCoordinateConverter::units_to_char_offset(text, 3, UTF16), 2);
        assert_eq!(LspCoordinateConverter::units_to_char_offset(text, 4, UTF16), 3);
        assert_eq!(LspCoordinateConverter::units_to_char_offset(text, 40, UTF16), 3);
    }

    #[test]
    fn test_offset_to_position() {
        let doc = Document::from_text("abc\ndef\n");

        assert_eq!(offset_to_position(&doc, 0, UTF16), LspPosition::new(0, 0));
        assert_eq!(offset_to_position(&doc, 3, UTF16), LspPosition::new(0, 3));
        assert_eq!(offset_to_position(&doc, 4, UTF16), LspPosition::new(1, 0));
        assert_eq!(offset_to_position(&doc, 8, UTF16), LspPosition::new(2, 0));
    }

    #[test]
    fn test_offset_past_end_clamps_to_document_end() {
        let doc = Document::from_text("abc\nde");
        assert_eq!(offset_to_position(&doc, 99, UTF16), LspPosition::new(1, 2));
    }

    #[test]
    fn test_offset_inside_crlf_clamps_to_line_end() {
        let doc = Document::from_text("ab\r\ncd");
        assert_eq!(offset_to_position(&doc, 3, UTF16), LspPosition::new(0, 2));
    }

    #[test]
    fn test_offset_to_position_counts_utf16_units() {
        let doc = Document::from_text("x\nhello 👋 world");
        // "hello 👋" = 7 chars, 8 UTF-16 units
        assert_eq!(offset_to_position(&doc, 2 + 7, UTF16), LspPosition::new(1, 8));
        assert_eq!(
            offset_to_position(&doc, 2 + 7, PositionEncoding::Utf8),
            LspPosition::new(1, 10)
        );
    }

    #[test]
    fn test_position_to_offset() {
        let doc = Document::from_text("abc\ndef\n");

        assert_eq!(position_to_offset(&doc, LspPosition::new(0, 1), UTF16), Ok(1));
        assert_eq!(position_to_offset(&doc, LspPosition::new(1, 2), UTF16), Ok(6));
        assert_eq!(position_to_offset(&doc, LspPosition::new(2, 0), UTF16), Ok(8));
    }

    #[test]
    fn test_position_past_line_end_does_not_spill() {
        let doc = Document::from_text("abc\ndef");
        assert_eq!(position_to_offset(&doc, LspPosition::new(0, 50), UTF16), Ok(3));
    }

    #[test]
    fn test_position_past_last_line() {
        let doc = Document::from_text("abc\n");

        assert_eq!(
            position_to_offset(&doc, LspPosition::new(2, 0), UTF16),
            Err(PositionError::LineOutOfRange {
                line: 2,
                line_count: 2
            })
        );
        assert_eq!(
            position_to_offset_clamped(&doc, LspPosition::new(2, 0), UTF16),
            4
        );
    }

    #[test]
    fn test_position_to_offset_with_emoji() {
        let doc = Document::from_text("a👋b");

        assert_eq!(position_to_offset(&doc, LspPosition::new(0, 3), UTF16), Ok(2));
        assert_eq!(
            position_to_offset(&doc, LspPosition::new(0, 5), PositionEncoding::Utf8),
            Ok(2)
        );
        assert_eq!(
            position_to_offset(&doc, LspPosition::new(0, 2), PositionEncoding::Utf32),
            Ok(2)
        );
    }

    #[test]
    fn test_range_ordering_is_lexicographic() {
        let a = LspRange::new(LspPosition::new(0, 5), LspPosition::new(2, 0));
        let b = LspRange::new(LspPosition::new(1, 0), LspPosition::new(1, 1));
        let c = LspRange::new(LspPosition::new(1, 0), LspPosition::new(1, 3));

        assert!(a < b);
        assert!(b < c);
        assert!(LspRange::new(LspPosition::new(1, 1), LspPosition::new(1, 0)).is_reversed());
    }

    #[test]
    fn test_range_to_offsets_overflow_policy() {
        let doc = Document::from_text("abc");
        let range = LspRange::new(LspPosition::new(0, 1), LspPosition::new(5, 0));

        assert!(range_to_offsets(&doc, &range, UTF16, LineOverflow::Reject).is_err());
        assert_eq!(
            range_to_offsets(&doc, &range, UTF16, LineOverflow::ClampToDocumentEnd),
            Ok((1, 3))
        );
    }

    #[test]
    fn test_encoding_wire_names() {
        assert_eq!(
            serde_json::to_string(&PositionEncoding::Utf16).unwrap(),
            "\"utf-16\""
        );
        assert_eq!(
            serde_json::from_str::<PositionEncoding>("\"utf-8\"").unwrap(),
            PositionEncoding::Utf8
        );
    }
}
