//! Pipeline stages for PDF splitting.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ discover ──▶ plan ──▶ pdfium
//! (path/dir/glob)  (candidates)  (estimate/write/measure)  (copy + save)
//! ```
//!
//! 1. [`discover`]: resolve the user-supplied file, directory or glob
//!    pattern into candidate documents
//! 2. [`plan`]: choose page boundaries for each part, write it,
//!    measure it, retry smaller when it overshoots the ceiling
//! 3. [`pdfium`]: the pdfium-render backend that copies page ranges
//!    into new documents and saves them

pub mod discover;
pub mod pdfium;
pub mod plan;
