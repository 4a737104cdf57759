//! Logical line index.
//!
//! Line table over a [`Rope`]: O(log N) line lookup, insertion and deletion. All offsets are
//! character (Unicode scalar value) offsets into the full text.
//!
//! A line's *end* offset excludes its terminator, so for `"ab\r\ncd"` line 0 spans `0..2`,
//! the terminator occupies `2..4` and line 1 starts at 4.

use ropey::{Rope, RopeSlice};

/// Number of trailing characters in `line` that belong to its terminator.
fn terminator_len(line: RopeSlice<'_>) -> usize {
    let len = line.len_chars();
    if len == 0 {
        return 0;
    }

    match line.char(len - 1) {
        '\n' if len >= 2 && line.char(len - 2) == '\r' => 2,
        '\n' | '\r' => 1,
        _ => 0,
    }
}

/// Logical line index backed by a rope.
///
/// The rope recomputes line boundaries on every mutation; callers never hold on to stale
/// boundaries across an edit.
#[derive(Debug, Clone)]
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// Create an empty line index (one empty line).
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build a line index from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Total line count. N line breaks always give N+1 lines.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total character count.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Character offset where `line` starts, or `None` past the last line.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        (line < self.rope.len_lines()).then(|| self.rope.line_to_char(line))
    }

    /// Character offset where `line`'s content ends (before its terminator), or `None` past the
    /// last line.
    pub fn line_end(&self, line: usize) -> Option<usize> {
        if line >= self.rope.len_lines() {
            return None;
        }

        let slice = self.rope.line(line);
        Some(self.rope.line_to_char(line) + slice.len_chars() - terminator_len(slice))
    }

    /// Line containing `char_offset`. Offsets past the end resolve to the last line.
    pub fn char_to_line(&self, char_offset: usize) -> usize {
        self.rope.char_to_line(char_offset.min(self.rope.len_chars()))
    }

    /// Text between two character offsets. Both are clamped to the text length.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let len = self.rope.len_chars();
        let end = end.min(len);
        let start = start.min(end);
        self.rope.slice(start..end).to_string()
    }

    /// Text of the specified line, excluding its terminator.
    pub fn get_line_text(&self, line: usize) -> Option<String> {
        let start = self.line_start(line)?;
        let end = self.line_end(line)?;
        Some(self.rope.slice(start..end).to_string())
    }

    /// Replace `start..end` (character offsets) with `text`.
    ///
    /// The range is clamped to the text; callers that need strict bounds checking go through
    /// [`crate::Document`].
    pub fn replace(&mut self, start: usize, end: usize, text: &str) {
        let len = self.rope.len_chars();
        let end = end.min(len);
        let start = start.min(end);

        if start < end {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
    }

    /// Get complete text.
    pub fn get_text(&self) -> String {
        self.rope.to_string()
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_line_index() {
        let index = LineIndex::new();
        assert_eq!(index.line_count(), 1); // Rope empty document has 1 line
        assert_eq!(index.char_count(), 0);
        assert_eq!(index.line_start(0), Some(0));
        assert_eq!(index.line_end(0), Some(0));
    }

    #[test]
    fn test_from_text() {
        let text = "Line 1\nLine 2\nLine 3";
        let index = LineIndex::from_text(text);

        assert_eq!(index.line_count(), 3);
        assert_eq!(index.char_count(), text.chars().count());
    }

    #[test]
    fn test_trailing_newline_adds_empty_line() {
        let index = LineIndex::from_text("abc\ndef\n");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_start(2), Some(8));
        assert_eq!(index.line_end(2), Some(8));
        assert_eq!(index.line_start(3), None);
    }

    #[test]
    fn test_line_bounds_exclude_terminators() {
        let index = LineIndex::from_text("ab\r\ncd\ref\ngh");

        assert_eq!(index.line_count(), 4);
        assert_eq!((index.line_start(0), index.line_end(0)), (Some(0), Some(2)));
        assert_eq!((index.line_start(1), index.line_end(1)), (Some(4), Some(6)));
        assert_eq!((index.line_start(2), index.line_end(2)), (Some(7), Some(9)));
        assert_eq!((index.line_start(3), index.line_end(3)), (Some(10), Some(12)));
    }

    #[test]
    fn test_unicode_line_separator_is_not_a_break() {
        let index = LineIndex::from_text("a\u{2028}b\u{85}c");
        assert_eq!(index.line_count(), 1);
    }

    #[test]
    fn test_utf8_cjk() {
        let text = "你好\n世界";
        let index = LineIndex::from_text(text);

        assert_eq!(index.line_count(), 2);
        assert_eq!(index.char_count(), 5); // 5 characters (你好\n世界)

        assert_eq!(index.char_to_line(1), 0);
        assert_eq!(index.char_to_line(3), 1);
        assert_eq!(index.line_start(1), Some(3));
        assert_eq!(index.get_line_text(1).as_deref(), Some("世界"));
    }

    #[test]
    fn test_large_document() {
        let text = (0..10000)
            .map(|i| format!("Line {}", i))
            .collect::<Vec<_>>()
            .join("\n");

        let index = LineIndex::from_text(&text);
        assert_eq!(index.line_count(), 10000);
        assert_eq!(index.get_line_text(5000).as_deref(), Some("Line 5000"));
    }

    #[test]
    fn test_replace_updates_line_table() {
        let mut index = LineIndex::from_text("Hello World");

        index.replace(5, 6, "\n");
        assert_eq!(index.get_text(), "Hello\nWorld");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line_start(1), Some(6));

        index.replace(0, 6, "");
        assert_eq!(index.get_text(), "World");
        assert_eq!(index.line_count(), 1);
    }

    #[test]
    fn test_slice_clamps() {
        let index = LineIndex::from_text("Hello");
        assert_eq!(index.slice(1, 3), "el");
        assert_eq!(index.slice(3, 99), "lo");
        assert_eq!(index.slice(9, 99), "");
    }
}
