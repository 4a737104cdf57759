#![warn(missing_docs)]
//! `textedit-lsp` - LSP coordinate mapping and `TextEdit` application for `textedit-core`.
//!
//! - [`lsp_position`]: offset <-> `{line, character}` conversion with UTF-8/16/32 encodings,
//!   clamped against stale coordinates
//! - [`lsp_text_edits`]: `TextEdit` wire types and tolerant extraction from `TextEdit[]` and
//!   `WorkspaceEdit` JSON payloads
//! - [`lsp_apply`]: sorted, back-to-front application of an edit batch with skip/fail reporting
//! - [`shared`]: a read/write-locked document handle that applies each batch as one critical
//!   section
//!
//! ```rust
//! use serde_json::json;
//! use textedit_core::{Document, DocumentStore};
//! use textedit_lsp::{ApplyOptions, apply_text_edits, text_edits_from_value};
//!
//! let mut doc = Document::from_text("hello world");
//! let payload = json!([
//!     { "range": { "start": { "line": 0, "character": 6 }, "end": { "line": 0, "character": 11 } },
//!       "newText": "EARTH" },
//!     { "range": { "start": { "line": 0, "character": 0 }, "end": { "line": 0, "character": 5 } },
//!       "newText": "HI" }
//! ]);
//!
//! let edits = text_edits_from_value(&payload);
//! let report = apply_text_edits(&mut doc, &edits, &ApplyOptions::default()).unwrap();
//!
//! assert_eq!(report.applied, 2);
//! assert_eq!(doc.text(), "HI EARTH");
//! ```

pub mod lsp_apply;
pub mod lsp_position;
pub mod lsp_text_edits;
pub mod shared;

pub use lsp_apply::{
    ApplyError, ApplyOptions, ApplyReport, SkippedEdit, apply_lsp_text_edits, apply_text_edits,
};
pub use lsp_position::{
    LineOverflow, LspCoordinateConverter, LspPosition, LspRange, PositionEncoding, PositionError,
    offset_to_position, offsets_to_range, position_to_offset, position_to_offset_clamped,
    range_to_offsets,
};
pub use lsp_text_edits::{
    LspTextEdit, RangeEnd, RawRange, RawTextEdit, SkipReason, text_edits_from_value,
    workspace_edit_text_edits_for_uri,
};
pub use shared::SharedDocument;
