//! Result types produced by a split run.

use crate::config::bytes_to_mb;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An accepted part written next to its source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// 1-indexed position among the parts of the source.
    pub ordinal: usize,
    /// Where the part was written: `{stem}_part{ordinal}.{ext}`.
    pub path: PathBuf,
    /// 0-indexed first source page held by this part.
    pub first_page: usize,
    /// Number of consecutive source pages held by this part.
    pub page_count: usize,
    /// Measured size on disk.
    pub size_bytes: u64,
    /// Candidate writes needed for this part (1 when the first estimate fit).
    pub attempts: u32,
    /// A single page that exceeds the ceiling on its own.
    pub oversized: bool,
}

impl Fragment {
    /// Half-open source page range `[first_page, first_page + page_count)`.
    pub fn page_range(&self) -> std::ops::Range<usize> {
        self.first_page..self.first_page + self.page_count
    }

    pub fn size_mb(&self) -> f64 {
        bytes_to_mb(self.size_bytes)
    }
}

/// What happened to one document of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentOutcome {
    /// The document fits the ceiling and was left untouched.
    UnderCeiling { size_bytes: u64 },
    /// The document was split into the listed parts.
    Split {
        size_bytes: u64,
        fragments: Vec<Fragment>,
    },
    /// The document could not be processed.
    Failed { error: String },
}

/// Per-document entry of a [`BatchReport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: DocumentOutcome,
}

impl DocumentReport {
    /// `true` when at least one part was written.
    pub fn was_split(&self) -> bool {
        matches!(&self.outcome, DocumentOutcome::Split { fragments, .. } if !fragments.is_empty())
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, DocumentOutcome::Failed { .. })
    }
}

/// Aggregated outcome of a batch, in enumeration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub documents: Vec<DocumentReport>,
}

impl BatchReport {
    /// Documents that produced at least one part.
    pub fn split_count(&self) -> usize {
        self.documents.iter().filter(|d| d.was_split()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.documents.iter().filter(|d| d.is_failed()).count()
    }

    /// Total parts written across the batch.
    pub fn fragment_count(&self) -> usize {
        self.documents
            .iter()
            .map(|d| match &d.outcome {
                DocumentOutcome::Split { fragments, .. } => fragments.len(),
                _ => 0,
            })
            .sum()
    }
}
