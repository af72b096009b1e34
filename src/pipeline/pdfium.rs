//! pdfium-render backend: open PDFs, copy page ranges into new documents,
//! save them.
//!
//! pdfium copies pages at the object level, so a part keeps the fonts,
//! images and vector content of its pages without re-encoding them. Shared
//! resources (a font used on every page) are duplicated into every part,
//! which is why part sizes rarely add up to the source size and the
//! planner has to measure instead of predict.
//!
//! ## Library resolution
//!
//! [`PdfiumBackend::bind`] looks for libpdfium in this order:
//!
//! 1. an explicit path (`--pdfium-lib` / `PDFIUM_LIB_PATH`), either the
//!    library file itself or the directory holding it;
//! 2. the current directory;
//! 3. the system library search path.
//!
//! [`LazyPdfiumBackend`] defers that search until the first document that
//! actually has to be opened, so a batch whose documents all fit the
//! ceiling never needs libpdfium.

use crate::document::{DocumentBackend, FragmentBuilder, PageSource};
use crate::error::PdfSplitError;
use once_cell::unsync::OnceCell;
use pdfium_render::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Platform file name of the pdfium shared library, e.g. `libpdfium.so`.
pub fn library_file_name() -> String {
    format!(
        "{}pdfium{}",
        std::env::consts::DLL_PREFIX,
        std::env::consts::DLL_SUFFIX
    )
}

/// A bound pdfium library plus the options used to open documents.
pub struct PdfiumBackend {
    pdfium: Pdfium,
    password: Option<String>,
}

impl PdfiumBackend {
    /// Bind libpdfium; see the module docs for the search order.
    pub fn bind(library: Option<&Path>) -> Result<Self, PdfSplitError> {
        let bindings = match library {
            Some(path) => {
                let lib = if path.is_dir() {
                    path.join(library_file_name())
                } else {
                    path.to_path_buf()
                };
                debug!("Binding pdfium from {}", lib.display());
                Pdfium::bind_to_library(&lib).map_err(|e| {
                    PdfSplitError::PdfiumBindingFailed(format!("{}: {e}", lib.display()))
                })?
            }
            None => {
                let local = PathBuf::from(".").join(library_file_name());
                Pdfium::bind_to_library(&local)
                    .or_else(|_| Pdfium::bind_to_system_library())
                    .map_err(|e| PdfSplitError::PdfiumBindingFailed(e.to_string()))?
            }
        };
        info!("pdfium library bound");

        Ok(Self {
            pdfium: Pdfium::new(bindings),
            password: None,
        })
    }

    /// The bound library, for callers that need to build or inspect PDFs
    /// themselves.
    pub fn pdfium(&self) -> &Pdfium {
        &self.pdfium
    }

    /// Use `password` when opening encrypted documents.
    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }
}

impl DocumentBackend for PdfiumBackend {
    type Document<'a>
        = PdfiumDocument<'a>
    where
        Self: 'a;

    fn open<'a>(&'a self, path: &Path) -> Result<PdfiumDocument<'a>, PdfSplitError> {
        check_pdf_header(path)?;

        let password = self.password.as_deref();
        let document = self
            .pdfium
            .load_pdf_from_file(path, password)
            .map_err(|e| {
                let err_str = format!("{:?}", e);
                if err_str.contains("Password") || err_str.contains("password") {
                    if password.is_some() {
                        PdfSplitError::WrongPassword {
                            path: path.to_path_buf(),
                        }
                    } else {
                        PdfSplitError::PasswordRequired {
                            path: path.to_path_buf(),
                        }
                    }
                } else {
                    PdfSplitError::unreadable(path, err_str)
                }
            })?;

        debug!(
            "Opened {} ({} pages)",
            path.display(),
            document.pages().len()
        );

        Ok(PdfiumDocument {
            pdfium: &self.pdfium,
            document,
            path: path.to_path_buf(),
        })
    }
}

/// A [`PdfiumBackend`] bound on first use.
///
/// A binding failure is returned from the first `open` as
/// [`PdfSplitError::PdfiumBindingFailed`], which is fatal to the batch.
pub struct LazyPdfiumBackend {
    library: Option<PathBuf>,
    password: Option<String>,
    backend: OnceCell<PdfiumBackend>,
}

impl LazyPdfiumBackend {
    pub fn new(library: Option<PathBuf>, password: Option<String>) -> Self {
        Self {
            library,
            password,
            backend: OnceCell::new(),
        }
    }

    /// `true` once libpdfium has been bound.
    pub fn is_bound(&self) -> bool {
        self.backend.get().is_some()
    }

    fn backend(&self) -> Result<&PdfiumBackend, PdfSplitError> {
        self.backend.get_or_try_init(|| {
            Ok(PdfiumBackend::bind(self.library.as_deref())?.with_password(self.password.clone()))
        })
    }
}

impl DocumentBackend for LazyPdfiumBackend {
    type Document<'a>
        = PdfiumDocument<'a>
    where
        Self: 'a;

    fn open<'a>(&'a self, path: &Path) -> Result<PdfiumDocument<'a>, PdfSplitError> {
        self.backend()?.open(path)
    }
}

/// An opened source PDF.
pub struct PdfiumDocument<'a> {
    pdfium: &'a Pdfium,
    document: PdfDocument<'a>,
    path: PathBuf,
}

impl<'a> PageSource for PdfiumDocument<'a> {
    type Fragment = PdfiumFragment<'a>;

    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn extract_pages(&self, start: usize, count: usize) -> Result<PdfiumFragment<'a>, PdfSplitError> {
        let last = start + count.max(1) - 1;
        let first_idx = page_index(&self.path, start)?;
        let last_idx = page_index(&self.path, last)?;

        let mut document = self
            .pdfium
            .create_new_pdf()
            .map_err(|e| PdfSplitError::write_failure(&self.path, format!("{:?}", e)))?;

        document
            .pages_mut()
            .copy_page_range_from_document(&self.document, first_idx..=last_idx, 0)
            .map_err(|e| {
                PdfSplitError::unreadable(
                    &self.path,
                    format!("cannot copy pages {}-{}: {:?}", start + 1, last + 1, e),
                )
            })?;

        Ok(PdfiumFragment { document })
    }
}

/// A new in-memory PDF holding a copied page range.
pub struct PdfiumFragment<'a> {
    document: PdfDocument<'a>,
}

impl FragmentBuilder for PdfiumFragment<'_> {
    fn serialize(self, path: &Path) -> Result<(), PdfSplitError> {
        self.document
            .save_to_file(path)
            .map_err(|e| PdfSplitError::write_failure(path, format!("{:?}", e)))
    }
}

fn page_index(path: &Path, index: usize) -> Result<PdfPageIndex, PdfSplitError> {
    PdfPageIndex::try_from(index).map_err(|_| {
        PdfSplitError::unreadable(path, format!("page {} is beyond pdfium's page index range", index + 1))
    })
}

/// Validate that `path` is readable and starts with the `%PDF` magic bytes.
///
/// Files shorter than four bytes are left for pdfium to reject.
pub fn check_pdf_header(path: &Path) -> Result<(), PdfSplitError> {
    match std::fs::File::open(path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(PdfSplitError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(PdfSplitError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(PdfSplitError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(PdfSplitError::unreadable(path, e)),
    }
}
