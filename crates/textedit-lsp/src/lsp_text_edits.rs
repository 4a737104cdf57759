//! LSP `TextEdit` values and tolerant extraction from JSON payloads.
//!
//! Servers do not always send well-formed edits. [`RawTextEdit`] keeps every part of an edit
//! optional so that a single broken entry can be skipped without rejecting the whole payload;
//! [`RawTextEdit::validate`] turns it into a [`LspTextEdit`] or a [`SkipReason`].

use crate::lsp_position::{LspPosition, LspRange, PositionError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// A well-formed LSP `TextEdit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LspTextEdit {
    /// The range to replace, against the pre-edit document.
    pub range: LspRange,
    /// Replacement text (may contain newlines).
    pub new_text: String,
}

impl LspTextEdit {
    /// Create a text edit.
    pub fn new(range: LspRange, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }

    /// An insertion of `new_text` at `position`.
    pub fn insert(position: LspPosition, new_text: impl Into<String>) -> Self {
        Self::new(LspRange::new(position, position), new_text)
    }
}

/// One end of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    /// `range.start`
    Start,
    /// `range.end`
    End,
}

impl fmt::Display for RangeEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RangeEnd::Start => "start",
            RangeEnd::End => "end",
        })
    }
}

/// A range as received from the transport; either end may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawRange {
    /// Start position, if present.
    #[serde(default)]
    pub start: Option<LspPosition>,
    /// End position, if present.
    #[serde(default)]
    pub end: Option<LspPosition>,
    /// First end that was sent but is not a position (negative or non-integer fields, values
    /// past `u32::MAX`). Its slot above is `None`.
    #[serde(skip)]
    pub malformed: Option<RangeEnd>,
}

impl RawRange {
    fn position(&self, which: RangeEnd) -> Result<LspPosition, SkipReason> {
        let position = match which {
            RangeEnd::Start => self.start,
            RangeEnd::End => self.end,
        };
        match (position, self.malformed) {
            (Some(position), _) => Ok(position),
            (None, Some(malformed)) if malformed == which => {
                Err(SkipReason::MalformedPosition(which))
            }
            (None, _) => Err(match which {
                RangeEnd::Start => SkipReason::MissingStart,
                RangeEnd::End => SkipReason::MissingEnd,
            }),
        }
    }
}

/// A `TextEdit` as received from the transport.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTextEdit {
    /// Range, if present.
    #[serde(default)]
    pub range: Option<RawRange>,
    /// Replacement text. A missing value means the empty string.
    #[serde(default)]
    pub new_text: Option<String>,
}

/// Why an edit was left out of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// The edit has no range (or is not an object at all).
    #[error("edit has no range")]
    MissingRange,
    /// The range has no start position.
    #[error("range has no start position")]
    MissingStart,
    /// The range has no end position.
    #[error("range has no end position")]
    MissingEnd,
    /// One end of the range is present but is not a valid position.
    #[error("range {0} is not a valid position")]
    MalformedPosition(RangeEnd),
    /// The range starts after it ends.
    #[error("range start is after range end")]
    ReversedRange,
    /// A position of the range could not be mapped onto the document.
    #[error("unresolvable position: {0}")]
    InvalidPosition(#[from] PositionError),
}

impl RawTextEdit {
    /// Validate the edit's shape. Document-dependent checks happen at application time.
    pub fn validate(&self) -> Result<LspTextEdit, SkipReason> {
        let range = self.range.as_ref().ok_or(SkipReason::MissingRange)?;
        let start = range.position(RangeEnd::Start)?;
        let end = range.position(RangeEnd::End)?;

        let range = LspRange::new(start, end);
        if range.is_reversed() {
            return Err(SkipReason::ReversedRange);
        }

        Ok(LspTextEdit {
            range,
            new_text: self.new_text.clone().unwrap_or_default(),
        })
    }

    /// Parse a `TextEdit`-shaped JSON value.
    ///
    /// Returns `None` only if `value` is not an object. An absent or `null` position becomes
    /// `None`; anything else that is not two `u32` fields is also `None` and is recorded in
    /// [`RawRange::malformed`].
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        let range = object
            .get("range")
            .filter(|range| range.is_object())
            .map(|range| {
                let (start, start_malformed) = position_from_value(range.get("start"));
                let (end, end_malformed) = position_from_value(range.get("end"));
                RawRange {
                    start,
                    end,
                    malformed: if start_malformed {
                        Some(RangeEnd::Start)
                    } else if end_malformed {
                        Some(RangeEnd::End)
                    } else {
                        None
                    },
                }
            });

        let new_text = object
            .get("newText")
            .and_then(Value::as_str)
            .map(str::to_string);

        Some(Self { range, new_text })
    }
}

impl From<LspTextEdit> for RawTextEdit {
    fn from(edit: LspTextEdit) -> Self {
        Self {
            range: Some(RawRange {
                start: Some(edit.range.start),
                end: Some(edit.range.end),
                malformed: None,
            }),
            new_text: Some(edit.new_text),
        }
    }
}

/// The position, and whether a non-null value failed to parse as one.
fn position_from_value(value: Option<&Value>) -> (Option<LspPosition>, bool) {
    let Some(value) = value.filter(|value| !value.is_null()) else {
        return (None, false);
    };

    let field = |name| {
        value
            .get(name)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
    };
    match (field("line"), field("character")) {
        (Some(line), Some(character)) => (Some(LspPosition::new(line, character)), false),
        _ => (None, true),
    }
}

/// Parse a JSON array of `TextEdit` values.
///
/// Yields exactly one entry per array element, so indices in an [`ApplyReport`] point back into
/// the payload. Elements that are not objects become an empty edit, which is skipped as
/// [`SkipReason::MissingRange`].
///
/// [`ApplyReport`]: crate::ApplyReport
pub fn text_edits_from_value(value: &Value) -> Vec<RawTextEdit> {
    value
        .as_array()
        .into_iter()
        .flatten()
        .map(|edit| RawTextEdit::from_value(edit).unwrap_or_default())
        .collect()
}

/// Collect the `TextEdit`s a `WorkspaceEdit` makes to `uri`.
///
/// Edits from `changes[uri]` come first, followed by the `edits` of every `TextDocumentEdit` in
/// `documentChanges` whose `textDocument.uri` matches, in payload order. Resource operations
/// (`create`, `rename`, `delete`) carry no `textDocument` and never match.
pub fn workspace_edit_text_edits_for_uri(workspace_edit: &Value, uri: &str) -> Vec<RawTextEdit> {
    let changes = workspace_edit
        .get("changes")
        .and_then(|changes| changes.get(uri));

    let document_changes = workspace_edit
        .get("documentChanges")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|change| {
            change.pointer("/textDocument/uri").and_then(Value::as_str) == Some(uri)
        })
        .filter_map(|change| change.get("edits"));

    changes
        .into_iter()
        .chain(document_changes)
        .flat_map(text_edits_from_value)
        .collect()
}
