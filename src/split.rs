//! Split entry points: one document, or a whole batch.
//!
//! [`split_document`] is the per-document contract: check the size, leave
//! small documents alone, otherwise hand the document to the planner.
//! [`split_batch`] resolves an input specification and runs
//! [`split_document`] on every candidate. A failing document is recorded
//! in the report and the batch moves on, unless the error is fatal. This
//! is the only place errors are caught.

use crate::config::{bytes_to_mb, SplitConfig};
use crate::document::{DocumentBackend, PageSource};
use crate::error::PdfSplitError;
use crate::output::{BatchReport, DocumentOutcome, DocumentReport, Fragment};
use crate::pipeline::{discover, pdfium::LazyPdfiumBackend, plan};
use std::path::Path;
use tracing::{error, info};

/// Split one document if it exceeds the ceiling.
///
/// Returns an empty vector when the document already fits; the file is
/// neither opened nor rewritten in that case. Otherwise returns the parts
/// written beside it, in page order.
///
/// # Errors
/// Any error from the backend or the filesystem, unchanged.
pub fn split_document<B: DocumentBackend>(
    backend: &B,
    path: &Path,
    config: &SplitConfig,
) -> Result<Vec<Fragment>, PdfSplitError> {
    match process_document(backend, path, config)? {
        DocumentOutcome::Split { fragments, .. } => Ok(fragments),
        _ => Ok(Vec::new()),
    }
}

fn process_document<B: DocumentBackend>(
    backend: &B,
    path: &Path,
    config: &SplitConfig,
) -> Result<DocumentOutcome, PdfSplitError> {
    let size_bytes = source_size(path)?;

    if config.fits(size_bytes) {
        info!(
            "{} is already under {} MB ({:.2} MB)",
            path.display(),
            config.max_size_mb,
            bytes_to_mb(size_bytes)
        );
        if let Some(ref cb) = config.progress_callback {
            cb.on_under_ceiling(path, size_bytes);
        }
        return Ok(DocumentOutcome::UnderCeiling { size_bytes });
    }

    let document = backend.open(path)?;
    if let Some(ref cb) = config.progress_callback {
        cb.on_split_start(path, size_bytes, document.page_count());
    }
    let fragments = plan::plan_fragments(&document, path, size_bytes, config)?;

    Ok(DocumentOutcome::Split {
        size_bytes,
        fragments,
    })
}

/// Resolve `input` (file, directory or glob pattern) and split every
/// candidate document in enumeration order.
///
/// # Errors
/// * [`PdfSplitError::NoInputFound`] when nothing matched.
/// * [`PdfSplitError::InvalidPattern`] for a malformed glob pattern.
/// * Any fatal error from the backend, such as
///   [`PdfSplitError::PdfiumBindingFailed`]; remaining documents are not
///   attempted.
///
/// Per-document failures are not errors: they are stored as
/// [`DocumentOutcome::Failed`] and the batch continues.
pub fn split_batch<B: DocumentBackend>(
    backend: &B,
    input: &str,
    config: &SplitConfig,
) -> Result<BatchReport, PdfSplitError> {
    let candidates = discover::resolve_inputs(input, config)?;
    if candidates.is_empty() {
        return Err(PdfSplitError::NoInputFound {
            input: input.to_string(),
        });
    }

    let total = candidates.len();
    info!("Found {} PDF file(s) to process", total);
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut report = BatchReport::default();
    for (i, path) in candidates.into_iter().enumerate() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_document_start(&path, i + 1, total);
        }

        let outcome = match process_document(backend, &path, config) {
            Ok(outcome) => outcome,
            Err(e) if e.is_fatal() => {
                error!("Aborting batch at {}: {}", path.display(), e);
                return Err(e);
            }
            Err(e) => {
                error!("Error processing {}: {}", path.display(), e);
                let message = e.to_string();
                if let Some(ref cb) = config.progress_callback {
                    cb.on_document_error(&path, &message);
                }
                DocumentOutcome::Failed { error: message }
            }
        };

        report.documents.push(DocumentReport { path, outcome });
    }

    info!(
        "Processing complete: split {} of {} file(s), {} failed",
        report.split_count(),
        total,
        report.failed_count()
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(report.split_count(), report.failed_count());
    }

    Ok(report)
}

/// Run [`split_batch`] with pdfium, bound on the first document that
/// exceeds the ceiling.
///
/// `library` is an explicit libpdfium path or directory; `None` searches
/// the current directory and then the system library path.
pub fn split_with_pdfium(
    input: &str,
    library: Option<&Path>,
    config: &SplitConfig,
) -> Result<BatchReport, PdfSplitError> {
    let backend = LazyPdfiumBackend::new(library.map(Path::to_path_buf), config.password.clone());
    split_batch(&backend, input, config)
}

fn source_size(path: &Path) -> Result<u64, PdfSplitError> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(meta.len()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(PdfSplitError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(PdfSplitError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(e) => Err(PdfSplitError::unreadable(path, e)),
    }
}
