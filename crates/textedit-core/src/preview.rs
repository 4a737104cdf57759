//! Single-line previews with a highlighted span, as shown in reference/search result lists.

use crate::store::DocumentStore;

/// Text of the line containing `start`, with `start..end` wrapped in `open` / `close`.
///
/// `end` is clamped to the end of that line. Returns `None` if `start` lies past the document.
///
/// ```
/// use textedit_core::{Document, preview::mark_range_in_line};
///
/// let doc = Document::from_text("let x = 1;\nlet y = 2;");
/// assert_eq!(
///     mark_range_in_line(&doc, 15, 16, "<b>", "</b>").as_deref(),
///     Some("let <b>y</b> = 2;")
/// );
/// ```
pub fn mark_range_in_line<D: DocumentStore + ?Sized>(
    doc: &D,
    start: usize,
    end: usize,
    open: &str,
    close: &str,
) -> Option<String> {
    if start > doc.len_chars() {
        return None;
    }

    let line = doc.line_of_offset(start);
    let line_start = doc.line_start_offset(line)?;
    let line_end = doc.line_end_offset(line)?;
    let start = start.min(line_end).max(line_start);
    let end = end.min(line_end).max(start);

    let before = doc.substring(line_start, start).ok()?;
    let marked = doc.substring(start, end).ok()?;
    let after = doc.substring(end, line_end).ok()?;

    Some(format!("{before}{open}{marked}{close}{after}"))
}
