//! Error types for the edgequake-pdfsplit library.
//!
//! A single enum, [`PdfSplitError`], covers every failure. Each variant
//! belongs to one of four kinds ([`ErrorKind`]) that decide how far the
//! failure travels:
//!
//! * **InvalidConfiguration**: fatal; nothing is processed.
//! * **UnreadableDocument** / **WriteFailure**: scoped to one document.
//!   The planner lets them propagate; the batch driver records them in
//!   [`crate::output::DocumentOutcome::Failed`] and moves on to the next
//!   document.
//! * **NoInputFound**: the input resolved to nothing. Reported, not fatal.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the edgequake-pdfsplit library.
#[derive(Debug, Error)]
pub enum PdfSplitError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The input was treated as a glob pattern but is not a valid one.
    #[error("Invalid input pattern '{pattern}': {detail}")]
    InvalidPattern { pattern: String, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Point pdfsplit at an existing copy with one of:\n\
  • --pdfium-lib /path/to/libpdfium\n\
  • PDFIUM_LIB_PATH=/path/to/libpdfium\n\
Prebuilt libraries: https://github.com/bblanchon/pdfium-binaries/releases\n"
    )]
    PdfiumBindingFailed(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Resolution produced zero candidate documents.
    #[error("No PDF files found for '{input}'")]
    NoInputFound { input: String },

    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Document errors ───────────────────────────────────────────────────
    /// The source document cannot be opened or parsed.
    #[error("Cannot read PDF '{path}': {detail}")]
    UnreadableDocument { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    // ── Output errors ─────────────────────────────────────────────────────
    /// A fragment could not be built, written, measured or removed.
    #[error("Failed to write part '{path}': {detail}")]
    WriteFailure { path: PathBuf, detail: String },
}

/// Coarse classification of a [`PdfSplitError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Fatal, detected before any document is touched.
    InvalidConfiguration,
    /// The source document cannot be opened.
    UnreadableDocument,
    /// A fragment cannot be serialized, measured or deleted.
    WriteFailure,
    /// Nothing matched the input specification.
    NoInputFound,
}

impl PdfSplitError {
    /// Map this error onto its [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfig(_) | Self::InvalidPattern { .. } | Self::PdfiumBindingFailed(_) => {
                ErrorKind::InvalidConfiguration
            }
            Self::NoInputFound { .. } => ErrorKind::NoInputFound,
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::NotAPdf { .. }
            | Self::UnreadableDocument { .. }
            | Self::PasswordRequired { .. }
            | Self::WrongPassword { .. } => ErrorKind::UnreadableDocument,
            Self::WriteFailure { .. } => ErrorKind::WriteFailure,
        }
    }

    /// `true` when the batch cannot continue past this error.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::InvalidConfiguration
    }

    pub(crate) fn write_failure(path: impl Into<PathBuf>, detail: impl ToString) -> Self {
        Self::WriteFailure {
            path: path.into(),
            detail: detail.to_string(),
        }
    }

    pub(crate) fn unreadable(path: impl Into<PathBuf>, detail: impl ToString) -> Self {
        Self::UnreadableDocument {
            path: path.into(),
            detail: detail.to_string(),
        }
    }
}
