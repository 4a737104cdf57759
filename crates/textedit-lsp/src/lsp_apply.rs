//! Batch application of LSP `TextEdit`s.
//!
//! All ranges in a batch refer to the document *before* the batch. The applicator resolves
//! every range to offsets against that pristine document, then writes from the tail of the
//! document toward its head: a replacement never shifts the offsets of edits located before it,
//! so offsets resolved up front stay valid for the whole batch.
//!
//! Exclusive access is the caller's job. The functions here take `&mut D`; hosts sharing a
//! document across threads go through [`crate::SharedDocument`].

use crate::lsp_position::{LineOverflow, PositionEncoding, range_to_offsets};
use crate::lsp_text_edits::{LspTextEdit, RawTextEdit, SkipReason};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use textedit_core::{DocumentError, DocumentStore};
use thiserror::Error;
use tracing::{debug, warn};

/// How a batch is mapped onto the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplyOptions {
    /// Unit of `character` in incoming positions.
    pub encoding: PositionEncoding,
    /// Handling of positions past the last line.
    pub line_overflow: LineOverflow,
    /// Rewrite line breaks in `newText` to the document's line ending.
    pub normalize_line_endings: bool,
}

/// An edit that was left out of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEdit {
    /// Index of the edit in the input slice.
    pub index: usize,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Outcome of a batch that was written without a fatal error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplyReport {
    /// Number of edits written.
    pub applied: usize,
    /// Malformed or unresolvable edits, ordered by input index.
    pub skipped: Vec<SkippedEdit>,
    /// Replaced `(start, end)` ranges in pre-edit character offsets, ascending.
    pub changed_ranges: Vec<(usize, usize)>,
}

impl ApplyReport {
    /// Every edit in the batch was applied.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// At least one edit was skipped.
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// A batch that could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// Two edits cover the same text. Nothing was written.
    #[error("edits {first} and {second} overlap")]
    OverlappingEdits {
        /// Input index of the edit located first in the document.
        first: usize,
        /// Input index of the edit it overlaps.
        second: usize,
    },
    /// The document rejected a replacement. Edits written before it stay written.
    #[error("failed to apply edit {index} after {applied} successful edits: {source}")]
    Write {
        /// Input index of the rejected edit.
        index: usize,
        /// Edits written before the failure.
        applied: usize,
        /// The document's error.
        #[source]
        source: DocumentError,
    },
}

struct ResolvedEdit<'a> {
    index: usize,
    start: usize,
    end: usize,
    new_text: Cow<'a, str>,
}

fn skip(skipped: &mut Vec<SkippedEdit>, index: usize, reason: SkipReason) {
    warn!(index, %reason, "skipping text edit");
    skipped.push(SkippedEdit { index, reason });
}

/// Apply a batch of edits received from a server.
///
/// Edits with a missing range, a missing start or end, a reversed range, or a position that
/// cannot be mapped are skipped and listed in the report. Overlapping edits reject the whole
/// batch before anything is written; overlap is judged after clamping positions to the
/// document. A failing write aborts the batch with [`ApplyError::Write`].
///
/// ```
/// use textedit_core::{Document, DocumentStore};
/// use textedit_lsp::{ApplyOptions, LspPosition, LspRange, LspTextEdit, apply_lsp_text_edits};
///
/// let mut doc = Document::from_text("abc\ndef\n");
/// let edit = LspTextEdit::new(
///     LspRange::new(LspPosition::new(0, 1), LspPosition::new(0, 2)),
///     "X",
/// );
///
/// let report = apply_lsp_text_edits(&mut doc, &[edit], &ApplyOptions::default()).unwrap();
/// assert!(report.is_complete());
/// assert_eq!(doc.text(), "aXc\ndef\n");
/// ```
pub fn apply_text_edits<D: DocumentStore + ?Sized>(
    doc: &mut D,
    edits: &[RawTextEdit],
    options: &ApplyOptions,
) -> Result<ApplyReport, ApplyError> {
    let mut skipped = Vec::new();
    let mut valid = Vec::with_capacity(edits.len());

    for (index, raw) in edits.iter().enumerate() {
        match raw.validate() {
            Ok(edit) => valid.push((index, Cow::Owned(edit))),
            Err(reason) => skip(&mut skipped, index, reason),
        }
    }

    apply_validated(doc, valid, skipped, options)
}

/// Apply a batch of already well-formed edits.
///
/// Same policy as [`apply_text_edits`]; only reversed ranges and unresolvable positions can be
/// skipped here.
pub fn apply_lsp_text_edits<D: DocumentStore + ?Sized>(
    doc: &mut D,
    edits: &[LspTextEdit],
    options: &ApplyOptions,
) -> Result<ApplyReport, ApplyError> {
    let mut skipped = Vec::new();
    let mut valid = Vec::with_capacity(edits.len());

    for (index, edit) in edits.iter().enumerate() {
        if edit.range.is_reversed() {
            skip(&mut skipped, index, SkipReason::ReversedRange);
        } else {
            valid.push((index, Cow::Borrowed(edit)));
        }
    }

    apply_validated(doc, valid, skipped, options)
}

fn apply_validated<D: DocumentStore + ?Sized>(
    doc: &mut D,
    mut valid: Vec<(usize, Cow<'_, LspTextEdit>)>,
    mut skipped: Vec<SkippedEdit>,
    options: &ApplyOptions,
) -> Result<ApplyReport, ApplyError> {
    // Stable: edits with equal ranges keep their input order, so inserts at one point end up in
    // the text in array order once applied back to front.
    valid.sort_by(|(_, a), (_, b)| a.range.cmp(&b.range));

    let line_ending = doc.line_ending();
    let mut resolved = Vec::with_capacity(valid.len());
    for (index, edit) in valid {
        let (start, end) =
            match range_to_offsets(&*doc, &edit.range, options.encoding, options.line_overflow) {
                Ok(offsets) => offsets,
                Err(err) => {
                    skip(&mut skipped, index, SkipReason::InvalidPosition(err));
                    continue;
                }
            };

        let new_text = match edit {
            Cow::Borrowed(edit) => Cow::Borrowed(edit.new_text.as_str()),
            Cow::Owned(edit) => Cow::Owned(edit.new_text),
        };
        let new_text = if options.normalize_line_endings {
            Cow::Owned(line_ending.apply_to_text(&new_text))
        } else {
            new_text
        };

        resolved.push(ResolvedEdit {
            index,
            start,
            end,
            new_text,
        });
    }

    check_overlaps(&resolved)?;

    let mut applied = 0;
    for edit in resolved.iter().rev() {
        doc.replace(edit.start, edit.end, &edit.new_text)
            .map_err(|source| {
                debug!(index = edit.index, applied, %source, "text edit rejected by document");
                ApplyError::Write {
                    index: edit.index,
                    applied,
                    source,
                }
            })?;
        applied += 1;
    }

    skipped.sort_by_key(|skipped| skipped.index);
    debug!(applied, skipped = skipped.len(), "applied text edit batch");

    Ok(ApplyReport {
        applied,
        skipped,
        changed_ranges: resolved.iter().map(|edit| (edit.start, edit.end)).collect(),
    })
}

/// Reject the batch if two resolved edits share any character.
///
/// Works on clamped document offsets, not on the LSP ranges. A range reaching past its line
/// end shrinks to the line end first, so an insert that falls inside the range's LSP
/// coordinates but past the line's content lands on the shrunk range's boundary and is kept.
fn check_overlaps(resolved: &[ResolvedEdit<'_>]) -> Result<(), ApplyError> {
    let mut furthest: Option<&ResolvedEdit<'_>> = None;
    for edit in resolved {
        if let Some(previous) = furthest
            && edit.start < previous.end
        {
            return Err(ApplyError::OverlappingEdits {
                first: previous.index,
                second: edit.index,
            });
        }
        if furthest.is_none_or(|previous| edit.end >= previous.end) {
            furthest = Some(edit);
        }
    }
    Ok(())
}
