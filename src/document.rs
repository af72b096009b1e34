//! The document-object capabilities the planner needs.
//!
//! Splitting only requires four operations from a PDF library: open a
//! file, count its pages, copy a contiguous page range into a new document
//! and write that document to disk. They are expressed as traits so the
//! planner and batch driver stay independent of the binding in use.
//! [`crate::pipeline::pdfium::PdfiumBackend`] is the production
//! implementation.

use crate::error::PdfSplitError;
use std::path::Path;

/// Opens documents.
pub trait DocumentBackend {
    /// An opened, read-only source document.
    type Document<'a>: PageSource
    where
        Self: 'a;

    /// Open the document at `path`.
    ///
    /// Fails with an error of kind
    /// [`ErrorKind::UnreadableDocument`](crate::error::ErrorKind::UnreadableDocument)
    /// on missing, corrupt, encrypted or unsupported input.
    fn open<'a>(&'a self, path: &Path) -> Result<Self::Document<'a>, PdfSplitError>;
}

/// A read-only sequence of pages.
pub trait PageSource {
    /// In-memory document holding a copied page range.
    type Fragment: FragmentBuilder;

    fn page_count(&self) -> usize;

    /// Copy pages `[start, start + count)` in their original order.
    fn extract_pages(&self, start: usize, count: usize) -> Result<Self::Fragment, PdfSplitError>;
}

/// A not-yet-written part.
pub trait FragmentBuilder {
    /// Write a standalone document to `path`, replacing any existing file.
    ///
    /// Fails with [`PdfSplitError::WriteFailure`].
    fn serialize(self, path: &Path) -> Result<(), PdfSplitError>;
}
