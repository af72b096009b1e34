//! Input resolution: turn the user-supplied file, directory or glob pattern
//! into the ordered list of documents to process.
//!
//! Resolution is tried in order:
//!
//! 1. an existing file is used as-is if it carries the document extension;
//! 2. an existing directory contributes its immediate document entries;
//! 3. anything else is a glob pattern, relative to the current directory.
//!
//! Directory and pattern discovery skip companion files ending with the
//! configured excluded suffix (`.Identifier` by default). Those are the
//! zone-identifier streams some sandboxes leave next to downloaded files.

use crate::config::SplitConfig;
use crate::error::PdfSplitError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// How the input specification was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    File,
    Directory,
    Pattern,
}

/// Classify `input` against the filesystem.
pub fn classify_input(input: &str) -> InputKind {
    let path = Path::new(input);
    if path.is_file() {
        InputKind::File
    } else if path.is_dir() {
        InputKind::Directory
    } else {
        InputKind::Pattern
    }
}

/// Resolve `input` to candidate documents, in enumeration order.
///
/// An empty result is not an error here; the batch driver turns it into
/// [`PdfSplitError::NoInputFound`].
pub fn resolve_inputs(input: &str, config: &SplitConfig) -> Result<Vec<PathBuf>, PdfSplitError> {
    let kind = classify_input(input);
    debug!("Resolving input '{}' as {:?}", input, kind);

    let candidates = match kind {
        InputKind::File => {
            let path = PathBuf::from(input);
            if config.has_document_extension(&path) {
                vec![path]
            } else {
                Vec::new()
            }
        }
        InputKind::Directory => list_directory(Path::new(input), config),
        InputKind::Pattern => expand_pattern(input, config)?,
    };

    debug!("Resolved {} candidate documents", candidates.len());
    Ok(candidates)
}

fn is_candidate(path: &Path, config: &SplitConfig) -> bool {
    path.is_file() && config.has_document_extension(path) && !config.is_excluded(path)
}

/// Immediate entries of `dir`, sorted by file name.
fn list_directory(dir: &Path, config: &SplitConfig) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e.into_path()),
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|p| is_candidate(p, config))
        .collect()
}

fn expand_pattern(pattern: &str, config: &SplitConfig) -> Result<Vec<PathBuf>, PdfSplitError> {
    let paths = glob::glob(pattern).map_err(|e| PdfSplitError::InvalidPattern {
        pattern: pattern.to_string(),
        detail: e.to_string(),
    })?;

    Ok(paths
        .filter_map(|entry| match entry {
            Ok(p) => Some(p),
            Err(e) => {
                warn!("Skipping unreadable match for '{}': {}", pattern, e);
                None
            }
        })
        .filter(|p| is_candidate(p, config))
        .collect())
}
