//! Configuration types for PDF splitting.
//!
//! All splitting behaviour is controlled through [`SplitConfig`], built via
//! its [`SplitConfigBuilder`]. The same config is applied to every document
//! of a batch and to every part of each document.

use crate::error::PdfSplitError;
use crate::progress::ProgressCallback;
use std::fmt;

/// Bytes in one megabyte, as used for the size ceiling.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Default size ceiling in megabytes.
pub const DEFAULT_MAX_SIZE_MB: f64 = 4.0;

/// Configuration for a split run.
///
/// Built via [`SplitConfig::builder()`] or using [`SplitConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_pdfsplit::SplitConfig;
///
/// let config = SplitConfig::builder()
///     .max_size_mb(2.5)
///     .build()
///     .unwrap();
/// assert_eq!(config.ceiling_bytes(), 2_621_440);
/// ```
#[derive(Clone)]
pub struct SplitConfig {
    /// Maximum size of a written part in megabytes (1 MB = 1 048 576 bytes).
    /// Must be positive. Default: 4.0.
    ///
    /// Documents at or under this size are left untouched. A part holding a
    /// single page may still exceed it, since pages are never divided.
    pub max_size_mb: f64,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// File extension recognised as a document, compared case-insensitively.
    /// Default: `"pdf"`.
    pub extension: String,

    /// Companion files whose name ends with this suffix are skipped during
    /// directory and pattern discovery. Default: `".Identifier"`.
    pub excluded_suffix: String,

    /// Optional progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_size_mb: DEFAULT_MAX_SIZE_MB,
            password: None,
            extension: "pdf".to_string(),
            excluded_suffix: ".Identifier".to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SplitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitConfig")
            .field("max_size_mb", &self.max_size_mb)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("extension", &self.extension)
            .field("excluded_suffix", &self.excluded_suffix)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn SplitProgressCallback>"),
            )
            .finish()
    }
}

impl SplitConfig {
    /// Create a new builder for `SplitConfig`.
    pub fn builder() -> SplitConfigBuilder {
        SplitConfigBuilder {
            config: Self::default(),
        }
    }

    /// The size ceiling in bytes: `floor(max_size_mb × 1 048 576)`.
    ///
    /// Sizes on disk are whole bytes, so rounding down does not change
    /// which sizes fit. A ceiling below one byte yields 0.
    pub fn ceiling_bytes(&self) -> u64 {
        (self.max_size_mb * BYTES_PER_MB).floor() as u64
    }

    /// `true` if a file of `size_bytes` is within the ceiling.
    pub fn fits(&self, size_bytes: u64) -> bool {
        size_bytes <= self.ceiling_bytes()
    }

    /// `true` if `path` has the recognised document extension.
    pub fn has_document_extension(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension))
    }

    /// `true` if `path` is a companion file that discovery must skip.
    pub fn is_excluded(&self, path: &std::path::Path) -> bool {
        !self.excluded_suffix.is_empty()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(&self.excluded_suffix))
    }
}

/// Convert a byte count to megabytes for display.
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Builder for [`SplitConfig`].
#[derive(Debug)]
pub struct SplitConfigBuilder {
    config: SplitConfig,
}

impl SplitConfigBuilder {
    pub fn max_size_mb(mut self, mb: f64) -> Self {
        self.config.max_size_mb = mb;
        self
    }

    /// Set the ceiling directly in bytes.
    pub fn max_size_bytes(mut self, bytes: u64) -> Self {
        self.config.max_size_mb = bytes as f64 / BYTES_PER_MB;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        self.config.extension = ext.into().trim_start_matches('.').to_string();
        self
    }

    pub fn excluded_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.excluded_suffix = suffix.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SplitConfig, PdfSplitError> {
        let c = &self.config;
        if !c.max_size_mb.is_finite() || c.max_size_mb <= 0.0 {
            return Err(PdfSplitError::InvalidConfig(format!(
                "Maximum size must be greater than 0 MB, got {}",
                c.max_size_mb
            )));
        }
        if c.extension.is_empty() {
            return Err(PdfSplitError::InvalidConfig(
                "Document extension must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
