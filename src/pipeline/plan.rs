//! Part planning: choose page boundaries so every written part fits the
//! size ceiling.
//!
//! The byte cost of a page is unknown until it is written: scanned pages,
//! embedded fonts and images make page sizes vary by orders of magnitude.
//! The planner therefore works in a loop of estimate → write → measure:
//!
//! ```text
//! pages_per_chunk = max(1, ⌊pages × max_size_mb / size_mb⌋)
//!
//! while pages remain:
//!     write next `pages_per_chunk` pages to {stem}_part{n}.{ext}
//!     too big and > 1 page?  delete it, halve pages_per_chunk, retry
//!     otherwise              keep it, n += 1
//! ```
//!
//! `pages_per_chunk` only ever shrinks and is carried from one part to the
//! next. A page that is over the ceiling on its own is kept as a one-page
//! part and flagged [`Fragment::oversized`].
//!
//! Each retry halves the chunk, so one part needs at most
//! `⌈log2(pages_per_chunk)⌉ + 1` candidate writes.

use crate::config::{bytes_to_mb, SplitConfig};
use crate::document::{FragmentBuilder, PageSource};
use crate::error::PdfSplitError;
use crate::output::Fragment;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Linear density estimate of how many pages fit under the ceiling,
/// assuming every page costs the same: `⌊pages × max_size_mb / size_mb⌋`,
/// never less than 1.
///
/// Uses the ceiling as configured, not its whole-byte rounding, so a
/// fractional ceiling such as 0.1 MB does not lose a page.
pub fn initial_pages_per_chunk(total_pages: usize, source_size: u64, max_size_mb: f64) -> usize {
    if source_size == 0 {
        return total_pages.max(1);
    }
    let estimate = (total_pages as f64 * max_size_mb / bytes_to_mb(source_size)).floor();
    (estimate as usize).max(1)
}

/// Output path of part `ordinal`: `{stem}_part{ordinal}.{ext}` beside `source`.
pub fn fragment_path(source: &Path, ordinal: usize) -> Result<PathBuf, PdfSplitError> {
    let stem = source
        .file_stem()
        .ok_or_else(|| PdfSplitError::unreadable(source, "path has no file name"))?;

    let mut name = stem.to_os_string();
    name.push(format!("_part{ordinal}"));
    if let Some(ext) = source.extension() {
        name.push(".");
        name.push(ext);
    }
    Ok(source.with_file_name(name))
}

/// Mutable state threaded through the planning loop of one document.
///
/// Invariants: `current_page <= total_pages`, `pages_per_chunk >= 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanState {
    total_pages: usize,
    current_page: usize,
    pages_per_chunk: usize,
    ordinal: usize,
}

impl PlanState {
    pub fn new(total_pages: usize, source_size: u64, max_size_mb: f64) -> Self {
        Self {
            total_pages,
            current_page: 0,
            pages_per_chunk: initial_pages_per_chunk(total_pages, source_size, max_size_mb),
            ordinal: 1,
        }
    }

    pub fn is_done(&self) -> bool {
        self.current_page >= self.total_pages
    }

    /// `(first_page, page_count)` of the next candidate.
    pub fn next_chunk(&self) -> (usize, usize) {
        let remaining = self.total_pages - self.current_page;
        (self.current_page, self.pages_per_chunk.min(remaining))
    }

    /// Halve the chunk size after an oversized candidate. The start page
    /// and ordinal stay put.
    pub fn shrink(&mut self) -> usize {
        self.pages_per_chunk = (self.pages_per_chunk / 2).max(1);
        self.pages_per_chunk
    }

    /// Consume `page_count` pages and move to the next ordinal.
    pub fn accept(&mut self, page_count: usize) {
        debug_assert!(page_count >= 1);
        self.current_page = (self.current_page + page_count).min(self.total_pages);
        self.ordinal += 1;
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn pages_per_chunk(&self) -> usize {
        self.pages_per_chunk
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

/// Split `source` into parts written beside `source_path`.
///
/// `source_size` is the size of the source file on disk and only seeds the
/// first estimate. Callers are expected to have checked that the document
/// exceeds the ceiling; see [`crate::split::split_document`].
///
/// Errors from the backend or the filesystem propagate unchanged. A
/// candidate that fails to write, or that is rejected as too large, is
/// removed before returning or retrying. Parts accepted before a failure
/// stay on disk.
pub fn plan_fragments<S: PageSource>(
    source: &S,
    source_path: &Path,
    source_size: u64,
    config: &SplitConfig,
) -> Result<Vec<Fragment>, PdfSplitError> {
    let total_pages = source.page_count();
    if total_pages == 0 {
        return Err(PdfSplitError::unreadable(source_path, "document has no pages"));
    }

    let ceiling = config.ceiling_bytes();
    let mut state = PlanState::new(total_pages, source_size, config.max_size_mb);
    info!(
        "Splitting {} ({:.2} MB, {} pages), starting at {} pages per part",
        source_path.display(),
        bytes_to_mb(source_size),
        total_pages,
        state.pages_per_chunk()
    );

    let mut fragments = Vec::new();
    let mut attempts: u32 = 0;

    while !state.is_done() {
        let (first_page, page_count) = state.next_chunk();
        let path = fragment_path(source_path, state.ordinal())?;
        attempts += 1;

        let builder = source.extract_pages(first_page, page_count)?;
        let size_bytes = write_candidate(builder, &path)?;

        if size_bytes > ceiling && page_count > 1 {
            discard(&path)?;
            let next = state.shrink();
            debug!(
                "{} too large ({} pages, {:.2} MB), retrying with {} pages",
                path.display(),
                page_count,
                bytes_to_mb(size_bytes),
                next
            );
            if let Some(ref cb) = config.progress_callback {
                cb.on_fragment_rejected(&path, page_count, size_bytes, next);
            }
            continue;
        }

        let fragment = Fragment {
            ordinal: state.ordinal(),
            path,
            first_page,
            page_count,
            size_bytes,
            attempts,
            oversized: size_bytes > ceiling,
        };

        if fragment.oversized {
            warn!(
                "Page {} of {} is {:.2} MB on its own, over the {:.2} MB ceiling; keeping it as {}",
                first_page + 1,
                source_path.display(),
                fragment.size_mb(),
                config.max_size_mb,
                fragment.path.display()
            );
        } else {
            debug!(
                "Accepted {} (pages {}-{}, {:.2} MB)",
                fragment.path.display(),
                first_page + 1,
                first_page + page_count,
                fragment.size_mb()
            );
        }

        if let Some(ref cb) = config.progress_callback {
            cb.on_fragment_accepted(&fragment);
            if fragment.oversized {
                cb.on_oversized_page(&fragment);
            }
        }

        state.accept(page_count);
        attempts = 0;
        fragments.push(fragment);
    }

    info!(
        "Split {} into {} parts",
        source_path.display(),
        fragments.len()
    );
    Ok(fragments)
}

/// Serialize `builder` to `path` and return the written size.
fn write_candidate<F: FragmentBuilder>(builder: F, path: &Path) -> Result<u64, PdfSplitError> {
    if let Err(e) = builder.serialize(path) {
        if let Err(cleanup) = discard(path) {
            warn!("{}", cleanup);
        }
        return Err(e);
    }

    match fs::metadata(path) {
        Ok(meta) => Ok(meta.len()),
        Err(e) => {
            if let Err(cleanup) = discard(path) {
                warn!("{}", cleanup);
            }
            Err(PdfSplitError::write_failure(path, format!("cannot measure part: {e}")))
        }
    }
}

/// Remove a candidate. A candidate that was never created is not an error.
fn discard(path: &Path) -> Result<(), PdfSplitError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PdfSplitError::write_failure(
            path,
            format!("cannot remove rejected part: {e}"),
        )),
    }
}
