//! Progress-callback trait for per-document and per-part split events.
//!
//! Inject an [`Arc<dyn SplitProgressCallback>`] via
//! [`crate::config::SplitConfigBuilder::progress_callback`] to receive
//! events as the batch driver walks documents and the planner writes parts.
//! The library itself never prints; the `pdfsplit` binary renders these
//! events on the terminal.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdfsplit::{Fragment, SplitConfig, SplitProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     parts: AtomicUsize,
//! }
//!
//! impl SplitProgressCallback for CountingCallback {
//!     fn on_fragment_accepted(&self, fragment: &Fragment) {
//!         self.parts.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("wrote {}", fragment.path.display());
//!     }
//! }
//!
//! let config = SplitConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { parts: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::output::Fragment;
use std::path::Path;
use std::sync::Arc;

/// Called by the batch driver and the planner as a run progresses.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events are delivered from the calling thread, in
/// order.
pub trait SplitProgressCallback: Send + Sync {
    /// Called once after input resolution.
    fn on_batch_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called before a document is examined.
    ///
    /// # Arguments
    /// * `index`: 1-indexed position within the batch
    fn on_document_start(&self, path: &Path, index: usize, total_documents: usize) {
        let _ = (path, index, total_documents);
    }

    /// Called when a document already fits and is left untouched.
    fn on_under_ceiling(&self, path: &Path, size_bytes: u64) {
        let _ = (path, size_bytes);
    }

    /// Called when a document exceeds the ceiling and is about to be split.
    fn on_split_start(&self, path: &Path, size_bytes: u64, total_pages: usize) {
        let _ = (path, size_bytes, total_pages);
    }

    /// Called when a candidate part is too large and has been deleted.
    ///
    /// # Arguments
    /// * `page_count`: pages in the rejected candidate
    /// * `next_page_count`: pages the retry will use
    fn on_fragment_rejected(
        &self,
        path: &Path,
        page_count: usize,
        size_bytes: u64,
        next_page_count: usize,
    ) {
        let _ = (path, page_count, size_bytes, next_page_count);
    }

    /// Called for every accepted part.
    fn on_fragment_accepted(&self, fragment: &Fragment) {
        let _ = fragment;
    }

    /// Called, in addition to `on_fragment_accepted`, when a single page on
    /// its own exceeds the ceiling and is kept anyway.
    fn on_oversized_page(&self, fragment: &Fragment) {
        let _ = fragment;
    }

    /// Called when a document fails; the batch continues.
    fn on_document_error(&self, path: &Path, error: &str) {
        let _ = (path, error);
    }

    /// Called once after every document has been attempted.
    fn on_batch_complete(&self, split_count: usize, failed_count: usize) {
        let _ = (split_count, failed_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SplitProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SplitConfig`].
pub type ProgressCallback = Arc<dyn SplitProgressCallback>;
