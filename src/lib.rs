//! # edgequake-pdfsplit
//!
//! Split PDF documents into parts that stay under a size ceiling.
//!
//! ## Why this crate?
//!
//! Upload endpoints, mail gateways and LLM file APIs reject files above a
//! fixed size. Splitting by a fixed page count does not help: a 40-page
//! report may be 300 KB of text or 80 MB of scanned images, and one chapter
//! can weigh ten times another. This crate estimates how many pages fit,
//! writes the part, measures it on disk, and retries with fewer pages when
//! the estimate was wrong.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input (file / directory / glob)
//!  │
//!  ├─ 1. Discover  candidate PDFs, skipping companion files
//!  ├─ 2. Check     size ≤ ceiling? leave the file untouched
//!  ├─ 3. Plan      estimate pages per part from average page weight
//!  ├─ 4. Write     copy the page range via pdfium, save {stem}_partN.pdf
//!  ├─ 5. Measure   too big? delete it, halve the page count, retry
//!  └─ 6. Report    per-document outcome + batch summary
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdfsplit::{split_with_pdfium, SplitConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SplitConfig::builder().max_size_mb(4.0).build()?;
//!     let report = split_with_pdfium("scans/*.pdf", None, &config)?;
//!     println!("split {} file(s)", report.split_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Guarantees
//!
//! * Pages are never divided, reordered, dropped or duplicated: the parts of
//!   a document cover its pages exactly once, in order.
//! * Every part with more than one page fits the ceiling. A single page
//!   larger than the ceiling becomes its own part and is flagged
//!   [`Fragment::oversized`].
//! * A rejected or half-written candidate is deleted before the next
//!   attempt; no oversized multi-page part is left behind.
//! * A failing document does not stop the batch.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfsplit` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-pdfsplit = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod split;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{SplitConfig, SplitConfigBuilder, DEFAULT_MAX_SIZE_MB};
pub use document::{DocumentBackend, FragmentBuilder, PageSource};
pub use error::{ErrorKind, PdfSplitError};
pub use output::{BatchReport, DocumentOutcome, DocumentReport, Fragment};
pub use pipeline::pdfium::{LazyPdfiumBackend, PdfiumBackend};
pub use progress::{NoopProgressCallback, ProgressCallback, SplitProgressCallback};
pub use split::{split_batch, split_document, split_with_pdfium};
