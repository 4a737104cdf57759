//! A document shared between threads.
//!
//! Position lookups take a read lock and may run concurrently. A batch of edits holds the write
//! lock from the first range translation to the last replacement, so no reader ever sees a
//! half-applied batch and no other writer can interleave with it. The guard is dropped on every
//! exit path, including skipped edits and write failures.

use crate::lsp_apply::{
    ApplyError, ApplyOptions, ApplyReport, apply_lsp_text_edits, apply_text_edits,
};
use crate::lsp_position::{
    LspPosition, PositionEncoding, PositionError, offset_to_position, position_to_offset,
};
use crate::lsp_text_edits::{LspTextEdit, RawTextEdit};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;
use textedit_core::DocumentStore;

/// A cloneable handle to a document guarded by a single-writer/multi-reader lock.
#[derive(Debug)]
pub struct SharedDocument<D> {
    inner: Arc<RwLock<D>>,
}

impl<D> Clone for SharedDocument<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: DocumentStore> SharedDocument<D> {
    /// Wrap a document.
    pub fn new(document: D) -> Self {
        Self {
            inner: Arc::new(RwLock::new(document)),
        }
    }

    /// Acquire shared read access.
    pub fn read(&self) -> RwLockReadGuard<'_, D> {
        self.inner.read()
    }

    /// Acquire exclusive write access.
    pub fn write(&self) -> RwLockWriteGuard<'_, D> {
        self.inner.write()
    }

    /// Snapshot of the full text.
    pub fn text(&self) -> String {
        self.inner.read().text()
    }

    /// See [`offset_to_position`].
    pub fn offset_to_position(&self, offset: usize, encoding: PositionEncoding) -> LspPosition {
        offset_to_position(&*self.inner.read(), offset, encoding)
    }

    /// See [`position_to_offset`].
    pub fn position_to_offset(
        &self,
        position: LspPosition,
        encoding: PositionEncoding,
    ) -> Result<usize, PositionError> {
        position_to_offset(&*self.inner.read(), position, encoding)
    }

    /// Apply a batch under the write lock. See [`apply_text_edits`].
    pub fn apply_text_edits(
        &self,
        edits: &[RawTextEdit],
        options: &ApplyOptions,
    ) -> Result<ApplyReport, ApplyError> {
        let mut document = self.inner.write();
        apply_text_edits(&mut *document, edits, options)
    }

    /// Apply a batch of well-formed edits under the write lock. See [`apply_lsp_text_edits`].
    pub fn apply_lsp_text_edits(
        &self,
        edits: &[LspTextEdit],
        options: &ApplyOptions,
    ) -> Result<ApplyReport, ApplyError> {
        let mut document = self.inner.write();
        apply_lsp_text_edits(&mut *document, edits, options)
    }

    /// Take the document back if this is the last handle.
    pub fn try_into_inner(self) -> Result<D, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}
