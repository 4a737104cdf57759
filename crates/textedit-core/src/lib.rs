#![warn(missing_docs)]
//! `textedit-core` - the document store behind LSP edit application.
//!
//! # Overview
//!
//! A [`Document`] keeps text in a rope and exposes the line table an LSP client needs to map
//! between flat character offsets and `{line, character}` positions:
//!
//! - line start / end offsets (terminators excluded), recomputed on every mutation
//! - `\n`, `\r\n` and `\r` recognized as line breaks; text is stored verbatim
//! - a bounds-checked `replace(start, end, text)` primitive
//!
//! The [`DocumentStore`] trait is the seam consumed by `textedit-lsp`; hosts with their own
//! buffer type can implement it instead of using [`Document`].
//!
//! ```rust
//! use textedit_core::{Document, DocumentStore};
//!
//! let mut doc = Document::from_text("abc\r\ndef");
//! assert_eq!(doc.line_count(), 2);
//! assert_eq!(doc.line_end_offset(0), Some(3));
//! assert_eq!(doc.line_start_offset(1), Some(5));
//!
//! doc.replace(5, 8, "xyz").unwrap();
//! assert_eq!(doc.text(), "abc\r\nxyz");
//! ```

pub mod document;
pub mod line_ending;
pub mod line_index;
pub mod preview;
pub mod store;

pub use document::Document;
pub use line_ending::LineEnding;
pub use line_index::LineIndex;
pub use preview::mark_range_in_line;
pub use store::{DocumentError, DocumentStore, check_range};
