//! Batch-level tests for edgequake-pdfsplit.
//!
//! These run the real planner and batch driver against a file-backed fake
//! backend, so they need neither libpdfium nor sample PDFs:
//!
//! * a source file is `%FAKE` + one line of per-page byte costs + padding
//!   up to the size the test wants on disk;
//! * a written part is a `"{first} {count}"` line padded to the sum of its
//!   pages' costs, so tests can read back which pages went where.

use edgequake_pdfsplit::{
    split_batch, split_document, DocumentBackend, DocumentOutcome, ErrorKind, Fragment,
    FragmentBuilder, PageSource, PdfSplitError, SplitConfig, SplitProgressCallback,
};
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ── Fake backend ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct FakeBackend {
    opened: Cell<usize>,
    /// Fail every open as if the PDF library could not be loaded.
    unbound: bool,
}

struct FakeDocument {
    page_sizes: Vec<u64>,
}

struct FakePart {
    first: usize,
    sizes: Vec<u64>,
}

impl DocumentBackend for FakeBackend {
    type Document<'a>
        = FakeDocument
    where
        Self: 'a;

    fn open<'a>(&'a self, path: &Path) -> Result<FakeDocument, PdfSplitError> {
        self.opened.set(self.opened.get() + 1);
        if self.unbound {
            return Err(PdfSplitError::PdfiumBindingFailed("library not found".into()));
        }
        let bytes = fs::read(path).map_err(|e| PdfSplitError::UnreadableDocument {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        let text = String::from_utf8_lossy(&bytes);
        let mut lines = text.lines();
        if lines.next() != Some("%FAKE") {
            return Err(PdfSplitError::UnreadableDocument {
                path: path.to_path_buf(),
                detail: "missing header".into(),
            });
        }
        let page_sizes = lines
            .next()
            .unwrap_or_default()
            .split_whitespace()
            .map(|s| s.parse().unwrap())
            .collect();
        Ok(FakeDocument { page_sizes })
    }
}

impl PageSource for FakeDocument {
    type Fragment = FakePart;

    fn page_count(&self) -> usize {
        self.page_sizes.len()
    }

    fn extract_pages(&self, start: usize, count: usize) -> Result<FakePart, PdfSplitError> {
        Ok(FakePart {
            first: start,
            sizes: self.page_sizes[start..start + count].to_vec(),
        })
    }
}

impl FragmentBuilder for FakePart {
    fn serialize(self, path: &Path) -> Result<(), PdfSplitError> {
        let total: u64 = self.sizes.iter().sum();
        let mut bytes = format!("{} {}\n", self.first, self.sizes.len()).into_bytes();
        bytes.resize(total.max(bytes.len() as u64) as usize, b'.');
        fs::write(path, bytes).map_err(|e| PdfSplitError::WriteFailure {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Write a fake source of `disk_size` bytes with the given page costs.
fn fake_pdf(dir: &Path, name: &str, page_sizes: &[u64], disk_size: usize) -> PathBuf {
    let sizes: Vec<String> = page_sizes.iter().map(|s| s.to_string()).collect();
    let mut bytes = format!("%FAKE\n{}\n", sizes.join(" ")).into_bytes();
    bytes.resize(disk_size.max(bytes.len()), b' ');
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn config(ceiling: u64) -> SplitConfig {
    SplitConfig::builder().max_size_bytes(ceiling).build().unwrap()
}

/// `(first_page, page_count)` read back from a written part.
fn read_range(path: &Path) -> (usize, usize) {
    let text = fs::read_to_string(path).unwrap();
    let mut it = text.lines().next().unwrap().split(' ');
    let first = it.next().unwrap().parse().unwrap();
    let count = it.next().unwrap().parse().unwrap();
    (first, count)
}

fn part_files(dir: &Path) -> Vec<PathBuf> {
    let mut parts: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.file_name().unwrap().to_string_lossy().contains("_part"))
        .collect();
    parts.sort();
    parts
}

// ── Planner contract ─────────────────────────────────────────────────────────

#[test]
fn document_under_ceiling_is_left_alone() {
    let dir = TempDir::new().unwrap();
    let src = fake_pdf(dir.path(), "small.pdf", &[100, 100], 2048);
    let before = fs::read(&src).unwrap();
    let backend = FakeBackend::default();

    let parts = split_document(&backend, &src, &config(2048)).unwrap();

    assert!(parts.is_empty());
    assert_eq!(backend.opened.get(), 0, "a fitting document is never opened");
    assert_eq!(fs::read(&src).unwrap(), before);
    assert!(part_files(dir.path()).is_empty());
}

#[test]
fn ten_page_example_halves_then_carries_the_estimate() {
    let dir = TempDir::new().unwrap();
    // 10 pages, 10 KiB on disk, 4 KiB ceiling → 4 pages per part at first.
    // Pages 0-3 weigh 5000 bytes together, so the first attempt is rejected
    // and every later part is built from 2 pages.
    let src = fake_pdf(
        dir.path(),
        "book.pdf",
        &[1300, 800, 1500, 1400, 300, 300, 300, 300, 300, 300],
        10 * 1024,
    );

    let parts = split_document(&FakeBackend::default(), &src, &config(4096)).unwrap();

    let ranges: Vec<(usize, usize)> = parts.iter().map(|f| (f.first_page, f.page_count)).collect();
    assert_eq!(ranges, vec![(0, 2), (2, 2), (4, 2), (6, 2), (8, 2)]);
    assert_eq!(parts[0].attempts, 2);
    assert_eq!(parts[0].path, dir.path().join("book_part1.pdf"));
    assert_eq!(parts[4].path, dir.path().join("book_part5.pdf"));
}

#[test]
fn parts_cover_every_page_and_respect_the_ceiling() {
    let dir = TempDir::new().unwrap();
    let sizes = [
        400, 2500, 90, 90, 90, 90, 3900, 1200, 1200, 50, 5000, 700, 700, 700, 10, 10,
    ];
    let src = fake_pdf(dir.path(), "mixed.pdf", &sizes, 20_000);
    let ceiling = 3000;

    let parts = split_document(&FakeBackend::default(), &src, &config(ceiling)).unwrap();

    let mut next = 0;
    for (i, part) in parts.iter().enumerate() {
        assert_eq!(part.ordinal, i + 1);
        assert_eq!(read_range(&part.path), (part.first_page, part.page_count));
        assert_eq!(part.first_page, next);
        if part.page_count > 1 {
            assert!(part.size_bytes <= ceiling);
        }
        assert_eq!(part.oversized, part.size_bytes > ceiling);
        next += part.page_count;
    }
    assert_eq!(next, sizes.len());
    assert!(parts.iter().any(|p| p.oversized), "page 10 is 5000 bytes alone");

    // Nothing else is left on disk: no rejected candidates.
    let on_disk = part_files(dir.path());
    let accepted: Vec<PathBuf> = parts.iter().map(|p| p.path.clone()).collect();
    assert_eq!(on_disk, {
        let mut a = accepted;
        a.sort();
        a
    });
    for path in on_disk {
        let (_, count) = read_range(&path);
        let size = fs::metadata(&path).unwrap().len();
        assert!(count == 1 || size <= ceiling, "{} is oversized", path.display());
    }
}

// ── Batch driver ─────────────────────────────────────────────────────────────

#[test]
fn batch_continues_after_an_unreadable_document() {
    let dir = TempDir::new().unwrap();
    fake_pdf(dir.path(), "a.pdf", &[3000, 3000, 3000], 9000);
    fs::write(dir.path().join("b.pdf"), vec![b'x'; 9000]).unwrap();
    fake_pdf(dir.path(), "c.pdf", &[2000, 2000, 2000, 2000], 8000);

    let report = split_batch(
        &FakeBackend::default(),
        dir.path().to_str().unwrap(),
        &config(4096),
    )
    .unwrap();

    let names: Vec<String> = report
        .documents
        .iter()
        .map(|d| d.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.pdf", "b.pdf", "c.pdf"]);

    assert!(report.documents[0].was_split());
    match &report.documents[1].outcome {
        DocumentOutcome::Failed { error } => assert!(error.contains("b.pdf"), "got: {error}"),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(report.documents[2].was_split());

    assert_eq!(report.split_count(), 2);
    assert_eq!(report.failed_count(), 1);
    assert!(dir.path().join("a_part1.pdf").exists());
    assert!(dir.path().join("c_part1.pdf").exists());
    assert!(!dir.path().join("b_part1.pdf").exists());
}

#[test]
fn fatal_backend_error_stops_the_batch() {
    let dir = TempDir::new().unwrap();
    fake_pdf(dir.path(), "a.pdf", &[100], 100);
    fake_pdf(dir.path(), "b.pdf", &[3000, 3000], 6000);
    fake_pdf(dir.path(), "c.pdf", &[3000, 3000], 6000);
    let backend = FakeBackend {
        unbound: true,
        ..FakeBackend::default()
    };

    let err = split_batch(&backend, dir.path().to_str().unwrap(), &config(4096)).unwrap_err();

    assert!(matches!(err, PdfSplitError::PdfiumBindingFailed(_)));
    assert_eq!(backend.opened.get(), 1, "c.pdf is never attempted");
    assert!(part_files(dir.path()).is_empty());
}

#[test]
fn documents_under_ceiling_are_not_counted_as_split() {
    let dir = TempDir::new().unwrap();
    fake_pdf(dir.path(), "big.pdf", &[3000, 3000], 6000);
    fake_pdf(dir.path(), "small.pdf", &[100], 1000);

    let report = split_batch(
        &FakeBackend::default(),
        dir.path().to_str().unwrap(),
        &config(4096),
    )
    .unwrap();

    assert_eq!(report.documents.len(), 2);
    assert_eq!(report.split_count(), 1);
    assert!(matches!(
        report.documents[1].outcome,
        DocumentOutcome::UnderCeiling { size_bytes: 1000 }
    ));
}

#[test]
fn empty_input_reports_no_input_found() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("readme.txt"), b"not a pdf").unwrap();

    let err = split_batch(
        &FakeBackend::default(),
        dir.path().to_str().unwrap(),
        &config(4096),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NoInputFound);
    assert!(!err.is_fatal());
}

#[test]
fn glob_pattern_selects_matching_documents() {
    let dir = TempDir::new().unwrap();
    fake_pdf(dir.path(), "scan-1.pdf", &[3000, 3000], 6000);
    fake_pdf(dir.path(), "scan-2.pdf", &[3000, 3000], 6000);
    fake_pdf(dir.path(), "memo.pdf", &[3000, 3000], 6000);

    let pattern = format!("{}/scan-*.pdf", dir.path().display());
    let report = split_batch(&FakeBackend::default(), &pattern, &config(4096)).unwrap();

    assert_eq!(report.documents.len(), 2);
    assert_eq!(report.split_count(), 2);
    assert!(!dir.path().join("memo_part1.pdf").exists());
}

// ── Progress events ──────────────────────────────────────────────────────────

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn push(&self, e: String) {
        self.events.lock().unwrap().push(e);
    }
}

impl SplitProgressCallback for Recorder {
    fn on_batch_start(&self, total: usize) {
        self.push(format!("batch {total}"));
    }
    fn on_under_ceiling(&self, path: &Path, _size: u64) {
        self.push(format!("under {}", path.file_name().unwrap().to_string_lossy()));
    }
    fn on_split_start(&self, _path: &Path, _size: u64, pages: usize) {
        self.push(format!("split {pages}"));
    }
    fn on_fragment_rejected(&self, _path: &Path, pages: usize, _size: u64, next: usize) {
        self.push(format!("reject {pages}->{next}"));
    }
    fn on_fragment_accepted(&self, f: &Fragment) {
        self.push(format!("part {} {}", f.ordinal, f.page_count));
    }
    fn on_oversized_page(&self, f: &Fragment) {
        self.push(format!("oversized {}", f.first_page));
    }
    fn on_document_error(&self, _path: &Path, _error: &str) {
        self.push("error".into());
    }
    fn on_batch_complete(&self, split: usize, failed: usize) {
        self.push(format!("done {split} {failed}"));
    }
}

#[test]
fn progress_events_follow_the_planner() {
    let dir = TempDir::new().unwrap();
    // 4 pages, 8 KiB, 4 KiB ceiling → 2 pages per part; pages 0-1 are too
    // heavy together and page 1 is too heavy alone.
    fake_pdf(dir.path(), "a.pdf", &[1000, 5000, 1000, 1000], 8192);
    fake_pdf(dir.path(), "b.pdf", &[10], 100);

    let recorder = Arc::new(Recorder::default());
    let config = SplitConfig::builder()
        .max_size_bytes(4096)
        .progress_callback(recorder.clone())
        .build()
        .unwrap();

    split_batch(
        &FakeBackend::default(),
        dir.path().to_str().unwrap(),
        &config,
    )
    .unwrap();

    let events = recorder.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "batch 2",
            "split 4",
            "reject 2->1",
            "part 1 1",
            "part 2 1",
            "oversized 1",
            "part 3 1",
            "part 4 1",
            "under b.pdf",
            "done 1 0",
        ]
    );
}
